use crate::edition::{GameEdition, EDITIONS};
use crate::error::{InstallError, Result};
use crate::slots::SlotStatus;
use std::io::{BufRead, Write};

const INPUT_NUMBER_EXPLANATION: &str = "[Type the number and press enter.]";

/// Console prompts over any reader/writer pair so they can run against
/// in-memory buffers.
pub struct Prompter<R, W> {
  input: R,
  output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
  pub fn new(input: R, output: W) -> Self {
    Self { input, output }
  }

  pub fn into_output(self) -> W {
    self.output
  }

  pub fn banner(&mut self, version: &str) {
    let _ = writeln!(self.output, "+------------------------------------+");
    let _ = writeln!(self.output, "|   The Binding of Isaac: Rebirth    |");
    let _ = writeln!(self.output, "|             (and DLCs)             |");
    let _ = writeln!(self.output, "| Fully Unlocked Save File Installer |");
    let _ = writeln!(self.output, "|{:^36}|", format!("v{version}"));
    let _ = writeln!(self.output, "+------------------------------------+");
    let _ = writeln!(self.output);
  }

  pub fn say(&mut self, line: &str) {
    let _ = writeln!(self.output, "{line}");
  }

  /// Anything but a literal `yes` aborts.
  pub fn confirm_deletion(&mut self) -> Result<()> {
    self.say("Hello. I will install a fully unlocked save file for you.");
    self.say("Type \"yes\" and press enter if you agree that I can delete existing save files, if any.");

    let answer = self.read_line()?;
    if answer.as_deref() != Some("yes") {
      tracing::info!("user declined save file deletion");
      return Err(InstallError::ConsentDeclined);
    }
    Ok(())
  }

  pub fn select_edition(&mut self) -> Result<GameEdition> {
    self.say("Which game do you want to install a save file for?");
    for (i, info) in EDITIONS.iter().enumerate() {
      let _ = writeln!(self.output, "{}) {}", i + 1, info.label);
    }
    self.say(INPUT_NUMBER_EXPLANATION);

    let answer = self.read_line()?.unwrap_or_default();
    answer
      .parse::<usize>()
      .ok()
      .and_then(GameEdition::from_menu_number)
      .ok_or(InstallError::InvalidSelection(answer))
  }

  pub fn show_slots(&mut self, statuses: &[SlotStatus]) {
    self.say("Your current save files are as follows:");
    for status in statuses {
      let value = if status.exists {
        status.path.display().to_string()
      } else {
        "[empty]".to_string()
      };
      let _ = writeln!(self.output, "{}) {}", status.slot.number(), value);
    }
    let _ = writeln!(self.output);
  }

  /// Blocks until Enter (or EOF). Never fails: it runs on the error path too.
  pub fn wait_for_enter(&mut self, message: &str) {
    self.say(message);
    let _ = self.output.flush();
    let mut buf = String::new();
    let _ = self.input.read_line(&mut buf);
  }

  /// Trimmed line, or `None` at end of input.
  fn read_line(&mut self) -> Result<Option<String>> {
    let _ = self.output.flush();
    let mut buf = String::new();
    let n = self
      .input
      .read_line(&mut buf)
      .map_err(|e| InstallError::io("read", "standard input", e))?;
    let _ = writeln!(self.output);
    if n == 0 {
      return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
  }
}
