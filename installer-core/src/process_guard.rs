use crate::error::{InstallError, Result};

pub const GAME_PROCESS_NAME: &str = "isaac-ng.exe";

pub trait ProcessLister {
  /// Executable file names of every running process.
  fn executable_names(&self) -> Result<Vec<String>>;
}

pub struct SystemProcesses;

impl ProcessLister for SystemProcesses {
  fn executable_names(&self) -> Result<Vec<String>> {
    list_executables()
  }
}

/// Fails with `GameRunning` if `process_name` is in the process list.
pub fn ensure_not_running(lister: &dyn ProcessLister, process_name: &str) -> Result<()> {
  let names = lister.executable_names()?;
  tracing::debug!(count = names.len(), "enumerated running processes");

  if names.iter().any(|n| n.eq_ignore_ascii_case(process_name)) {
    tracing::warn!(process = process_name, "game is running; refusing to touch save files");
    return Err(InstallError::GameRunning {
      process: process_name.to_string(),
    });
  }
  Ok(())
}

#[cfg(windows)]
fn list_executables() -> Result<Vec<String>> {
  use windows::Win32::Foundation::CloseHandle;
  use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W, TH32CS_SNAPPROCESS,
  };

  // SAFETY: the snapshot handle is owned here and closed before returning;
  // `entry.dwSize` is set as Process32FirstW requires.
  unsafe {
    let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)
      .map_err(|e| InstallError::ProcessQuery(e.to_string()))?;

    let mut entry = PROCESSENTRY32W {
      dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
      ..Default::default()
    };

    let mut names = Vec::new();
    let mut more = Process32FirstW(snapshot, &mut entry).is_ok();
    while more {
      let len = entry
        .szExeFile
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(entry.szExeFile.len());
      names.push(String::from_utf16_lossy(&entry.szExeFile[..len]));
      more = Process32NextW(snapshot, &mut entry).is_ok();
    }

    let _ = CloseHandle(snapshot);
    Ok(names)
  }
}

#[cfg(not(windows))]
fn list_executables() -> Result<Vec<String>> {
  Err(InstallError::ProcessQuery("unsupported platform".to_string()))
}
