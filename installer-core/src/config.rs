use crate::process_guard::GAME_PROCESS_NAME;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct Config {
  pub logging: LoggingConfig,
  pub guard: GuardConfig,
  pub payloads: PayloadsConfig,
  pub backup: BackupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
  #[serde(default = "default_log_level")]
  pub level: String,

  #[serde(default = "default_retention_days")]
  pub retention_days: u64,
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_retention_days() -> u64 {
  14
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: default_log_level(),
      retention_days: default_retention_days(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
  #[serde(default = "default_process_name")]
  pub process_name: String,
}

fn default_process_name() -> String {
  GAME_PROCESS_NAME.to_string()
}

impl Default for GuardConfig {
  fn default() -> Self {
    Self {
      process_name: default_process_name(),
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayloadsConfig {
  /// Directory holding `<payload id>.b64` files. Defaults to `saves`
  /// next to the executable.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupConfig {
  #[serde(default)]
  pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
  #[serde(default)]
  pub logging: Option<LoggingConfig>,

  #[serde(default)]
  pub guard: Option<GuardConfig>,

  #[serde(default)]
  pub payloads: Option<PayloadsConfig>,

  #[serde(default)]
  pub backup: Option<BackupConfig>,
}

impl ConfigFile {
  fn normalize(self, notices: &mut Vec<String>) -> Config {
    let mut cfg = Config::default();
    if let Some(l) = self.logging {
      cfg.logging = l;
    }
    if let Some(g) = self.guard {
      cfg.guard = g;
    }
    if let Some(p) = self.payloads {
      cfg.payloads = p;
    }
    if let Some(b) = self.backup {
      cfg.backup = b;
    }

    if cfg.guard.process_name.trim().is_empty() {
      notices.push(format!("guard.process_name is empty; using default {GAME_PROCESS_NAME}"));
      cfg.guard.process_name = default_process_name();
    }

    cfg
  }

  fn needs_upgrade(&self) -> bool {
    self.logging.is_none() || self.guard.is_none() || self.payloads.is_none() || self.backup.is_none()
  }
}

pub fn load_or_create_default(path: &Path) -> anyhow::Result<Config> {
  load_and_report(path, true)
}

pub fn load_or_default_readonly(path: &Path) -> anyhow::Result<Config> {
  load_and_report(path, false)
}

// Config loads before logging exists, so notices go straight to stderr.
fn load_and_report(path: &Path, allow_writes: bool) -> anyhow::Result<Config> {
  let mut notices = Vec::new();
  let cfg = load_impl(path, allow_writes, &mut notices)?;
  for notice in &notices {
    eprintln!("Isaac Save Installer: {notice}");
  }
  Ok(cfg)
}

fn load_impl(path: &Path, allow_writes: bool, notices: &mut Vec<String>) -> anyhow::Result<Config> {
  let parent = path
    .parent()
    .ok_or_else(|| anyhow::anyhow!("config path has no parent: {}", path.display()))?;
  if allow_writes {
    fs::create_dir_all(parent)?;
  }

  if !path.exists() {
    let cfg = Config::default();
    if allow_writes {
      write_atomic(path, &toml::to_string_pretty(&to_config_file(&cfg))?)?;
    }
    return Ok(cfg);
  }

  let raw = fs::read_to_string(path)?;
  match toml::from_str::<ConfigFile>(&raw) {
    Ok(file) => {
      let upgrade = file.needs_upgrade();
      let cfg = file.normalize(notices);
      if allow_writes && upgrade {
        let backup = parent.join(format!("config.toml.bak-{}", now_unix_s()));
        let _ = fs::copy(path, &backup);
        write_atomic(path, &toml::to_string_pretty(&to_config_file(&cfg))?)?;
        notices.push(format!(
          "config at {} upgraded with defaults (backup: {})",
          path.display(),
          backup.display()
        ));
      }
      Ok(cfg)
    }
    Err(e) => {
      let cfg = Config::default();
      if allow_writes {
        let backup = parent.join(format!("config.toml.bad-{}", now_unix_s()));
        let _ = fs::rename(path, &backup);
        write_atomic(path, &toml::to_string_pretty(&to_config_file(&cfg))?)?;
        notices.push(format!(
          "invalid config at {} (backed up to {}): {e}",
          path.display(),
          backup.display()
        ));
      } else {
        notices.push(format!(
          "invalid config at {}; using defaults (--dry-run): {e}",
          path.display()
        ));
      }
      Ok(cfg)
    }
  }
}

fn to_config_file(cfg: &Config) -> ConfigFile {
  ConfigFile {
    logging: Some(cfg.logging.clone()),
    guard: Some(cfg.guard.clone()),
    payloads: Some(cfg.payloads.clone()),
    backup: Some(cfg.backup.clone()),
  }
}

fn write_atomic(path: &Path, contents: &str) -> anyhow::Result<()> {
  let parent = path
    .parent()
    .ok_or_else(|| anyhow::anyhow!("file path has no parent: {}", path.display()))?;
  let tmp = parent.join(format!(
    ".{}.tmp",
    path.file_name().unwrap_or_default().to_string_lossy()
  ));

  fs::write(&tmp, contents)?;
  fs::rename(&tmp, path)?;
  Ok(())
}

pub(crate) fn now_unix_s() -> u64 {
  std::time::SystemTime::now()
    .duration_since(std::time::UNIX_EPOCH)
    .unwrap_or_default()
    .as_secs()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_config_writes_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("nested").join("config.toml");

    let cfg = load_or_create_default(&path).unwrap();
    assert_eq!(cfg.guard.process_name, "isaac-ng.exe");
    assert!(!cfg.backup.enabled);

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("[guard]"));
    assert!(raw.contains("process_name = \"isaac-ng.exe\""));
  }

  #[test]
  fn readonly_load_never_writes() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    load_or_default_readonly(&path).unwrap();
    assert!(!path.exists());
  }

  #[test]
  fn partial_config_is_merged_and_upgraded() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(&path, "[backup]\nenabled = true\n\n[payloads]\ndir = \"D:/saves\"\n").unwrap();

    let cfg = load_or_create_default(&path).unwrap();
    assert!(cfg.backup.enabled);
    assert_eq!(cfg.payloads.dir, Some(PathBuf::from("D:/saves")));
    assert_eq!(cfg.logging.level, "info");

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("[logging]"));
    let backups = fs::read_dir(tmp.path())
      .unwrap()
      .flatten()
      .filter(|e| e.file_name().to_string_lossy().starts_with("config.toml.bak-"))
      .count();
    assert_eq!(backups, 1);
  }

  #[test]
  fn invalid_config_is_set_aside() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(&path, "this is [not toml").unwrap();

    let cfg = load_or_create_default(&path).unwrap();
    assert_eq!(cfg.logging.retention_days, 14);
    assert!(toml::from_str::<toml::Value>(&fs::read_to_string(&path).unwrap()).is_ok());
  }

  #[test]
  fn empty_process_name_falls_back_to_default() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(&path, "[guard]\nprocess_name = \"  \"\n").unwrap();

    let mut notices = Vec::new();
    let cfg = load_impl(&path, false, &mut notices).unwrap();
    assert_eq!(cfg.guard.process_name, GAME_PROCESS_NAME);
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("guard.process_name is empty"));
  }

  #[test]
  fn upgrade_is_reported_but_readonly_load_is_quiet() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("config.toml");
    fs::write(&path, "[backup]\nenabled = false\n").unwrap();

    let mut notices = Vec::new();
    load_impl(&path, false, &mut notices).unwrap();
    assert!(notices.is_empty());

    load_impl(&path, true, &mut notices).unwrap();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("upgraded with defaults"));
  }
}
