use crate::error::{InstallError, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SaveSlot(u8);

impl SaveSlot {
  pub const ALL: [SaveSlot; 3] = [SaveSlot(1), SaveSlot(2), SaveSlot(3)];

  pub fn new(n: u8) -> Option<Self> {
    (1..=3).contains(&n).then_some(Self(n))
  }

  pub fn number(self) -> u8 {
    self.0
  }

  pub fn file_name(self) -> String {
    format!("persistentgamedata{}.dat", self.0)
  }

  pub fn path_in(self, save_dir: &Path) -> PathBuf {
    save_dir.join(self.file_name())
  }
}

impl fmt::Display for SaveSlot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "slot {}", self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotStatus {
  pub slot: SaveSlot,
  pub path: PathBuf,
  pub exists: bool,
}

pub fn slot_statuses(save_dir: &Path) -> Vec<SlotStatus> {
  SaveSlot::ALL
    .iter()
    .map(|&slot| {
      let path = slot.path_in(save_dir);
      let exists = path.is_file();
      SlotStatus { slot, path, exists }
    })
    .collect()
}

/// Copies every existing slot file into `dest_dir`. Nothing is copied in
/// dry-run mode; the would-be destinations are still returned.
pub fn backup_existing(save_dir: &Path, dest_dir: &Path, dry_run: bool) -> Result<Vec<PathBuf>> {
  let existing: Vec<SlotStatus> = slot_statuses(save_dir).into_iter().filter(|s| s.exists).collect();
  if existing.is_empty() {
    return Ok(Vec::new());
  }

  if !dry_run {
    fs::create_dir_all(dest_dir).map_err(|e| InstallError::io("create", dest_dir, e))?;
  }

  let mut copied = Vec::with_capacity(existing.len());
  for status in existing {
    let dest = dest_dir.join(status.slot.file_name());
    if dry_run {
      tracing::warn!(from = %status.path.display(), to = %dest.display(), "DRY-RUN: would back up save file");
    } else {
      fs::copy(&status.path, &dest).map_err(|e| InstallError::io("back up", &status.path, e))?;
      tracing::info!(from = %status.path.display(), to = %dest.display(), "save file backed up");
    }
    copied.push(dest);
  }
  Ok(copied)
}

/// Deletes whichever of the three slot files exist.
pub fn remove_existing(save_dir: &Path, dry_run: bool) -> Result<Vec<SaveSlot>> {
  let mut removed = Vec::new();
  for status in slot_statuses(save_dir) {
    if !status.exists {
      continue;
    }
    if dry_run {
      tracing::warn!(path = %status.path.display(), "DRY-RUN: would delete save file");
    } else {
      fs::remove_file(&status.path).map_err(|e| InstallError::io("delete", &status.path, e))?;
      tracing::info!(path = %status.path.display(), "save file deleted");
    }
    removed.push(status.slot);
  }
  Ok(removed)
}

/// Writes `data` to every slot, replacing whatever is there.
pub fn write_all(save_dir: &Path, data: &[u8], dry_run: bool) -> Result<Vec<PathBuf>> {
  let mut written = Vec::with_capacity(SaveSlot::ALL.len());
  for slot in SaveSlot::ALL {
    let path = slot.path_in(save_dir);
    if dry_run {
      tracing::warn!(path = %path.display(), bytes = data.len(), "DRY-RUN: would write save file");
    } else {
      fs::write(&path, data).map_err(|e| InstallError::io("write", &path, e))?;
      tracing::info!(path = %path.display(), bytes = data.len(), "save file written");
    }
    written.push(path);
  }
  Ok(written)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slot_numbers_are_one_to_three() {
    assert_eq!(SaveSlot::new(0), None);
    assert_eq!(SaveSlot::new(4), None);
    assert_eq!(SaveSlot::new(2).unwrap().file_name(), "persistentgamedata2.dat");
    let names: Vec<String> = SaveSlot::ALL.iter().map(|s| s.file_name()).collect();
    assert_eq!(
      names,
      ["persistentgamedata1.dat", "persistentgamedata2.dat", "persistentgamedata3.dat"]
    );
  }

  #[test]
  fn remove_existing_skips_empty_slots() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("persistentgamedata1.dat"), b"one").unwrap();
    fs::write(tmp.path().join("persistentgamedata3.dat"), b"three").unwrap();
    fs::write(tmp.path().join("options.ini"), b"SteamCloud=0").unwrap();

    let removed = remove_existing(tmp.path(), false).unwrap();
    assert_eq!(removed, vec![SaveSlot(1), SaveSlot(3)]);
    assert!(slot_statuses(tmp.path()).iter().all(|s| !s.exists));
    assert!(tmp.path().join("options.ini").exists());
  }

  #[test]
  fn dry_run_deletes_and_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("persistentgamedata2.dat"), b"two").unwrap();

    assert_eq!(remove_existing(tmp.path(), true).unwrap(), vec![SaveSlot(2)]);
    assert_eq!(write_all(tmp.path(), b"new", true).unwrap().len(), 3);

    let statuses = slot_statuses(tmp.path());
    assert_eq!(statuses.iter().filter(|s| s.exists).count(), 1);
    assert_eq!(fs::read(tmp.path().join("persistentgamedata2.dat")).unwrap(), b"two");
  }

  #[test]
  fn backup_copies_existing_slots_only() {
    let tmp = tempfile::tempdir().unwrap();
    let saves = tmp.path().join("saves");
    let dest = tmp.path().join("backup");
    fs::create_dir_all(&saves).unwrap();
    fs::write(saves.join("persistentgamedata2.dat"), b"progress").unwrap();

    let copied = backup_existing(&saves, &dest, false).unwrap();
    assert_eq!(copied, vec![dest.join("persistentgamedata2.dat")]);
    assert_eq!(fs::read(&copied[0]).unwrap(), b"progress");
    assert!(!dest.join("persistentgamedata1.dat").exists());
  }

  #[test]
  fn backup_with_nothing_to_copy_creates_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let dest = tmp.path().join("backup");
    assert!(backup_existing(tmp.path(), &dest, false).unwrap().is_empty());
    assert!(!dest.exists());
  }
}
