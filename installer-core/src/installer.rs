use crate::edition::GameEdition;
use crate::error::Result;
use crate::payloads::{self, PayloadSource};
use crate::process_guard::{self, ProcessLister};
use crate::save_dir::{DocumentsLocator, SaveDirResolver};
use crate::slots::{self, SaveSlot, SlotStatus};
use crate::steam_cloud::{self, CloudChange};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
  pub dry_run: bool,
  /// Existing slot files are copied here before deletion.
  pub backup_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct InstallReport {
  pub edition: GameEdition,
  pub save_dir: PathBuf,
  pub steam_cloud: CloudChange,
  pub backed_up: Vec<PathBuf>,
  pub removed: Vec<SaveSlot>,
  pub written: Vec<PathBuf>,
}

pub struct Installer<'a> {
  pub processes: &'a dyn ProcessLister,
  pub documents: &'a dyn DocumentsLocator,
  pub payloads: &'a dyn PayloadSource,
  pub process_name: String,
  pub users_root: PathBuf,
  pub username: Option<String>,
  pub options: InstallOptions,
}

impl<'a> Installer<'a> {
  /// Refuses to go on while the game holds its save files open.
  pub fn preflight(&self) -> Result<()> {
    process_guard::ensure_not_running(self.processes, &self.process_name)
  }

  pub fn resolve_save_dir(&self, edition: GameEdition) -> Result<PathBuf> {
    SaveDirResolver::new(self.users_root.clone(), self.username.clone(), self.documents).resolve(edition)
  }

  pub fn slot_statuses(&self, save_dir: &Path) -> Vec<SlotStatus> {
    slots::slot_statuses(save_dir)
  }

  /// Cloud toggle, cleanup and install against an already resolved directory.
  pub fn install_into(&self, edition: GameEdition, save_dir: &Path) -> Result<InstallReport> {
    let dry_run = self.options.dry_run;

    // Decode before anything is deleted so a bad package leaves saves intact.
    let data = payloads::decode_payload(self.payloads, edition)?;

    let steam_cloud = steam_cloud::disable_steam_cloud(save_dir, dry_run)?;

    let backed_up = match self.options.backup_dir.as_deref() {
      Some(dest) => slots::backup_existing(save_dir, dest, dry_run)?,
      None => Vec::new(),
    };

    let removed = slots::remove_existing(save_dir, dry_run)?;
    let written = slots::write_all(save_dir, &data, dry_run)?;

    tracing::info!(
      edition = %edition,
      save_dir = %save_dir.display(),
      removed = removed.len(),
      written = written.len(),
      dry_run,
      "fully unlocked save installed"
    );

    Ok(InstallReport {
      edition,
      save_dir: save_dir.to_path_buf(),
      steam_cloud,
      backed_up,
      removed,
      written,
    })
  }

  /// The whole non-interactive sequence: guard, resolve, then install.
  pub fn run(&self, edition: GameEdition) -> Result<InstallReport> {
    self.preflight()?;
    let save_dir = self.resolve_save_dir(edition)?;
    self.install_into(edition, &save_dir)
  }
}
