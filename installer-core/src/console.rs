use crate::edition::GameEdition;
use crate::error::{InstallError, Result};
use crate::installer::{InstallReport, Installer};
use crate::prompt::Prompter;
use crate::steam_cloud::CloudChange;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleOptions {
  pub yes: bool,
  pub edition: Option<GameEdition>,
  pub backup: bool,
  pub dry_run: bool,
  pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
  Install(ConsoleOptions),
  ExitOk,
}

/// `args` is the full argv, program name included.
pub fn parse_args(args: &[String]) -> Result<ConsoleAction> {
  let mut opts = ConsoleOptions::default();
  let mut rest = args.iter().skip(1);

  while let Some(arg) = rest.next() {
    match arg.as_str() {
      "--help" | "-h" => {
        print_help();
        return Ok(ConsoleAction::ExitOk);
      }
      "--version" => {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(ConsoleAction::ExitOk);
      }
      "--yes" | "-y" => opts.yes = true,
      "--backup" => opts.backup = true,
      "--dry-run" => opts.dry_run = true,
      "--verbose" => opts.verbose = true,
      "--edition" => {
        let value = rest
          .next()
          .ok_or_else(|| InstallError::InvalidSelection("--edition needs a value".to_string()))?;
        opts.edition = Some(GameEdition::parse(value)?);
      }
      other => {
        if let Some(value) = other.strip_prefix("--edition=") {
          opts.edition = Some(GameEdition::parse(value)?);
        } else {
          return Err(InstallError::InvalidSelection(format!("unknown argument `{other}`")));
        }
      }
    }
  }

  Ok(ConsoleAction::Install(opts))
}

/// Guard, consent, edition choice, then the install itself.
pub fn run_session<R: BufRead, W: Write>(
  prompter: &mut Prompter<R, W>,
  installer: &Installer<'_>,
  opts: &ConsoleOptions,
) -> Result<InstallReport> {
  prompter.banner(env!("CARGO_PKG_VERSION"));
  installer.preflight()?;

  if opts.yes {
    tracing::info!("consent prompt skipped (--yes)");
  } else {
    prompter.confirm_deletion()?;
  }

  let edition = match opts.edition {
    Some(e) => e,
    None => prompter.select_edition()?,
  };
  tracing::info!(edition = %edition, "edition selected");

  let save_dir = installer.resolve_save_dir(edition)?;
  prompter.say(&format!("Found your save data directory at:\n{}", save_dir.display()));
  prompter.show_slots(&installer.slot_statuses(&save_dir));

  let report = installer.install_into(edition, &save_dir)?;
  print_report(prompter, &report, opts.dry_run);
  Ok(report)
}

fn print_report<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, report: &InstallReport, dry_run: bool) {
  let prefix = if dry_run { "DRY-RUN: would have " } else { "" };

  if report.steam_cloud == CloudChange::Disabled {
    prompter.say(&format!("{prefix}turned off \"SteamCloud\" in your \"options.ini\" file."));
  }
  for path in &report.backed_up {
    prompter.say(&format!("{prefix}backed up an existing save file to:\n{}", path.display()));
  }
  if !report.removed.is_empty() {
    prompter.say(&format!("{prefix}deleted {} existing save file(s).", report.removed.len()));
  }

  if dry_run {
    prompter.say("DRY-RUN: no files were changed.");
  } else {
    prompter.say(&format!(
      "A fully unlocked save file for {} has been installed to all {} save slots.",
      report.edition,
      report.written.len()
    ));
  }
}

fn print_help() {
  println!("Isaac Save Installer v{}", env!("CARGO_PKG_VERSION"));
  println!("Installs a fully unlocked save file to all 3 save slots.");
  println!("Options:");
  println!("  --yes, -y          do not ask before deleting existing save files");
  println!("  --edition <game>   1-5, rebirth, afterbirth, afterbirth+, afterbirth+bp5, repentance");
  println!("  --backup           copy existing save files aside before deleting them");
  println!("  --dry-run          report what would change without touching any file");
  println!("  --verbose          print log output to the console");
  println!("  --version          print the version and exit");
  println!("  --help, -h         print this help and exit");
}
