use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
  #[error("You are currently running The Binding of Isaac ({process}).\nClose the game before you run this installer.")]
  GameRunning { process: String },

  #[error("Ok then. Manually back up your save files and then run this installer again.")]
  ConsentDeclined,

  #[error("That is not a valid selection: {0}")]
  InvalidSelection(String),

  #[error("failed to get the list of running processes: {0}")]
  ProcessQuery(String),

  #[error("failed to get the path of your \"Documents\" directory: {0}")]
  DocumentsQuery(String),

  #[error("Failed to find your save data directory at:\n{}\n\nDo you have the selected version of the game installed?", .0.display())]
  SaveDirNotFound(PathBuf),

  #[error("Failed to find your \"options.ini\" file at:\n{}", .0.display())]
  OptionsMissing(PathBuf),

  #[error("Failed to parse your \"options.ini\" file (no SteamCloud setting found):\n{}", .0.display())]
  OptionsFormat(PathBuf),

  #[error("failed to {action} {}", .path.display())]
  Io {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("the save file bundle has no \"{payload}\" payload (looked for {})", .path.display())]
  PayloadMissing { payload: &'static str, path: PathBuf },

  #[error("the \"{payload}\" save file payload is corrupt; this installer was packaged incorrectly")]
  PayloadDecode {
    payload: &'static str,
    #[source]
    source: base64::DecodeError,
  },
}

impl InstallError {
  pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      action,
      path: path.into(),
      source,
    }
  }
}

pub type Result<T> = std::result::Result<T, InstallError>;
