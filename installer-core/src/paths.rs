use std::path::{Path, PathBuf};

pub const OPTIONS_INI: &str = "options.ini";
pub const LOG_TXT: &str = "log.txt";
pub const MY_GAMES: &str = "My Games";

pub fn base_dir() -> anyhow::Result<PathBuf> {
  let local = std::env::var("LOCALAPPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(|_| std::env::temp_dir());
  Ok(local.join("Isaac Save Installer"))
}

pub fn config_path(base: &Path) -> PathBuf {
  base.join("config.toml")
}

pub fn logs_dir(base: &Path) -> PathBuf {
  base.join("logs")
}

pub fn backups_dir(base: &Path) -> PathBuf {
  base.join("backups")
}

pub fn default_users_root() -> PathBuf {
  PathBuf::from("C:\\").join("Users")
}

/// `saves` next to the running executable.
pub fn default_payload_dir() -> anyhow::Result<PathBuf> {
  let exe = std::env::current_exe()?;
  let dir = exe
    .parent()
    .ok_or_else(|| anyhow::anyhow!("executable path has no parent: {}", exe.display()))?;
  Ok(dir.join("saves"))
}

pub fn options_ini_path(save_dir: &Path) -> PathBuf {
  save_dir.join(OPTIONS_INI)
}

pub fn log_marker_path(save_dir: &Path) -> PathBuf {
  save_dir.join(LOG_TXT)
}

/// e.g. `C:\Users\Alice\Documents\My Games\Binding of Isaac Repentance`
pub fn standard_save_dir(users_root: &Path, username: &str, folder_name: &str) -> PathBuf {
  users_root
    .join(username)
    .join("Documents")
    .join(MY_GAMES)
    .join(folder_name)
}

pub fn documents_save_dir(documents: &Path, folder_name: &str) -> PathBuf {
  documents.join(MY_GAMES).join(folder_name)
}
