use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_NAME: &str = "isaac-save-installer.log";

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logs go to a daily file under `log_dir`; `mirror_stderr` also prints
/// them to the console (`--verbose`).
pub fn init(log_dir: &Path, level: &str, retention_days: u64, mirror_stderr: bool) -> anyhow::Result<()> {
  fs::create_dir_all(log_dir)?;
  let removed = cleanup_old_logs(log_dir, retention_days);

  let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
  let _ = FILE_GUARD.set(guard);

  let filter = tracing_subscriber::EnvFilter::try_new(level)
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

  let file_layer = tracing_subscriber::fmt::layer()
    .with_ansi(false)
    .with_writer(file_writer)
    .with_target(true);

  let stderr_layer = mirror_stderr.then(|| {
    tracing_subscriber::fmt::layer()
      .with_ansi(false)
      .with_writer(std::io::stderr)
      .with_target(false)
  });

  tracing_subscriber::registry()
    .with(filter)
    .with(file_layer)
    .with(stderr_layer)
    .try_init()?;

  if removed > 0 {
    tracing::info!(removed, retention_days, "old log files deleted");
  }
  Ok(())
}

/// Console-only logging for runs that must not create files (`--dry-run`).
pub fn init_stderr_only(level: &str) -> anyhow::Result<()> {
  let filter = tracing_subscriber::EnvFilter::try_new(level)
    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

  tracing_subscriber::registry()
    .with(filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .with_target(false),
    )
    .try_init()?;
  Ok(())
}

/// Deletes rotated installer logs last modified before the retention
/// window and returns how many went. `retention_days == 0` keeps all.
fn cleanup_old_logs(log_dir: &Path, retention_days: u64) -> usize {
  if retention_days == 0 {
    return 0;
  }
  let cutoff = SystemTime::now()
    .checked_sub(Duration::from_secs(retention_days.saturating_mul(24 * 60 * 60)))
    .unwrap_or(SystemTime::UNIX_EPOCH);

  let Ok(entries) = fs::read_dir(log_dir) else {
    return 0;
  };

  entries
    .flatten()
    .filter(|entry| is_installer_log_file(&entry.path()))
    .filter(|entry| {
      entry
        .metadata()
        .and_then(|m| m.modified())
        .is_ok_and(|modified| modified < cutoff)
    })
    .filter(|entry| fs::remove_file(entry.path()).is_ok())
    .count()
}

// Matches the live file and its dated rotations (`<LOG_FILE_NAME>.<date>`).
fn is_installer_log_file(path: &Path) -> bool {
  let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
    return false;
  };
  match name.strip_prefix(LOG_FILE_NAME) {
    Some(rest) => rest.is_empty() || rest.starts_with('.'),
    None => false,
  }
}
