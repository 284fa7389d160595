pub mod config;
pub mod console;
pub mod edition;
pub mod error;
pub mod installer;
pub mod logging;
pub mod paths;
pub mod payloads;
pub mod process_guard;
pub mod prompt;
pub mod save_dir;
pub mod slots;
pub mod steam_cloud;

use anyhow::Context;
use std::io;

pub enum Outcome {
  Installed(installer::InstallReport),
  Exited,
}

pub fn run_console(args: &[String]) -> anyhow::Result<Outcome> {
  let opts = match console::parse_args(args)? {
    console::ConsoleAction::ExitOk => return Ok(Outcome::Exited),
    console::ConsoleAction::Install(opts) => opts,
  };

  let base = paths::base_dir()?;
  let config_path = paths::config_path(&base);
  let cfg = if opts.dry_run {
    config::load_or_default_readonly(&config_path)?
  } else {
    config::load_or_create_default(&config_path)?
  };

  if opts.dry_run {
    logging::init_stderr_only(&cfg.logging.level)?;
  } else {
    logging::init(
      &paths::logs_dir(&base),
      &cfg.logging.level,
      cfg.logging.retention_days,
      opts.verbose,
    )
    .context("initialize logging")?;
  }
  tracing::info!(version = env!("CARGO_PKG_VERSION"), dry_run = opts.dry_run, "installer started");

  let payload_dir = match cfg.payloads.dir.clone() {
    Some(dir) => dir,
    None => paths::default_payload_dir()?,
  };
  let payload_source = payloads::DirectoryPayloads::new(payload_dir);

  let backup_dir = (opts.backup || cfg.backup.enabled)
    .then(|| paths::backups_dir(&base).join(config::now_unix_s().to_string()));

  let installer = installer::Installer {
    processes: &process_guard::SystemProcesses,
    documents: &save_dir::PowerShellDocuments,
    payloads: &payload_source,
    process_name: cfg.guard.process_name.clone(),
    users_root: paths::default_users_root(),
    username: save_dir::current_username(),
    options: installer::InstallOptions {
      dry_run: opts.dry_run,
      backup_dir,
    },
  };

  let mut prompter = prompt::Prompter::new(io::stdin().lock(), io::stdout());
  let report = console::run_session(&mut prompter, &installer, &opts)?;
  Ok(Outcome::Installed(report))
}
