use crate::error::{InstallError, Result};
use crate::paths;
use std::fs;
use std::path::Path;

pub const STEAM_CLOUD_ENABLED: &str = "SteamCloud=1";
pub const STEAM_CLOUD_DISABLED: &str = "SteamCloud=0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudChange {
  Disabled,
  AlreadyDisabled,
}

/// Rewritten text when the flag needs flipping, `None` when it is already off.
/// Errors if neither flag state appears.
pub fn disable_in_text(options_ini: &str, path: &Path) -> Result<Option<String>> {
  if options_ini.contains(STEAM_CLOUD_ENABLED) {
    return Ok(Some(options_ini.replace(STEAM_CLOUD_ENABLED, STEAM_CLOUD_DISABLED)));
  }
  if options_ini.contains(STEAM_CLOUD_DISABLED) {
    return Ok(None);
  }
  Err(InstallError::OptionsFormat(path.to_path_buf()))
}

/// Turns off Steam Cloud in `<save_dir>/options.ini`. The file is only
/// written when the flag was on.
pub fn disable_steam_cloud(save_dir: &Path, dry_run: bool) -> Result<CloudChange> {
  let path = paths::options_ini_path(save_dir);
  if !path.is_file() {
    return Err(InstallError::OptionsMissing(path));
  }

  let raw = fs::read_to_string(&path).map_err(|e| InstallError::io("read", &path, e))?;
  let Some(updated) = disable_in_text(&raw, &path)? else {
    tracing::info!(path = %path.display(), "SteamCloud already disabled");
    return Ok(CloudChange::AlreadyDisabled);
  };

  if dry_run {
    tracing::warn!(path = %path.display(), "DRY-RUN: would set SteamCloud=0");
    return Ok(CloudChange::Disabled);
  }

  fs::write(&path, updated).map_err(|e| InstallError::io("write", &path, e))?;
  tracing::info!(path = %path.display(), "SteamCloud disabled");
  Ok(CloudChange::Disabled)
}
