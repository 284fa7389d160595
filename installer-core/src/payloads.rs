use crate::edition::GameEdition;
use crate::error::{InstallError, Result};
use base64::Engine as _;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Base64 save files keyed by payload id.
pub trait PayloadSource {
  fn base64(&self, payload_id: &'static str) -> Result<String>;
}

/// Reads `<dir>/<payload id>.b64`.
pub struct DirectoryPayloads {
  dir: PathBuf,
}

impl DirectoryPayloads {
  pub fn new(dir: PathBuf) -> Self {
    Self { dir }
  }
}

impl PayloadSource for DirectoryPayloads {
  fn base64(&self, payload_id: &'static str) -> Result<String> {
    let path = self.dir.join(format!("{payload_id}.b64"));
    if !path.is_file() {
      return Err(InstallError::PayloadMissing {
        payload: payload_id,
        path,
      });
    }
    fs::read_to_string(&path).map_err(|e| InstallError::io("read", path, e))
  }
}

#[derive(Debug, Clone, Default)]
pub struct StaticPayloads {
  entries: HashMap<&'static str, &'static str>,
}

impl StaticPayloads {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, payload_id: &'static str, base64: &'static str) -> Self {
    self.entries.insert(payload_id, base64);
    self
  }
}

impl PayloadSource for StaticPayloads {
  fn base64(&self, payload_id: &'static str) -> Result<String> {
    self
      .entries
      .get(payload_id)
      .map(|s| s.to_string())
      .ok_or_else(|| InstallError::PayloadMissing {
        payload: payload_id,
        path: PathBuf::from("<static>"),
      })
  }
}

/// Raw save file bytes for `edition`.
pub fn decode_payload(source: &dyn PayloadSource, edition: GameEdition) -> Result<Vec<u8>> {
  let payload = edition.payload_id();
  let text = source.base64(payload)?;
  let bytes = base64::engine::general_purpose::STANDARD
    .decode(text.trim())
    .map_err(|source| InstallError::PayloadDecode { payload, source })?;
  tracing::debug!(payload, bytes = bytes.len(), "decoded save file payload");
  Ok(bytes)
}
