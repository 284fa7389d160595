use crate::error::{InstallError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEdition {
  Rebirth,
  Afterbirth,
  AfterbirthPlus,
  AfterbirthPlusBp5,
  Repentance,
}

/// Static facts about one edition: where its saves live and which unlock
/// payload belongs to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditionInfo {
  pub edition: GameEdition,
  pub label: &'static str,
  pub folder_name: &'static str,
  pub payload_id: &'static str,
}

// Menu order; the position + 1 is the number the user types.
pub static EDITIONS: [EditionInfo; 5] = [
  EditionInfo {
    edition: GameEdition::Rebirth,
    label: "The Binding of Isaac: Rebirth",
    folder_name: "Binding of Isaac Rebirth",
    payload_id: "rebirth",
  },
  EditionInfo {
    edition: GameEdition::Afterbirth,
    label: "The Binding of Isaac: Afterbirth",
    folder_name: "Binding of Isaac Afterbirth",
    payload_id: "afterbirth",
  },
  EditionInfo {
    edition: GameEdition::AfterbirthPlus,
    label: "The Binding of Isaac: Afterbirth+ (Vanilla through Booster Pack 4)",
    folder_name: "Binding of Isaac Afterbirth+",
    payload_id: "afterbirth-plus",
  },
  EditionInfo {
    edition: GameEdition::AfterbirthPlusBp5,
    label: "The Binding of Isaac: Afterbirth+ (Booster Pack 5)",
    folder_name: "Binding of Isaac Afterbirth+",
    payload_id: "afterbirth-plus-bp5",
  },
  EditionInfo {
    edition: GameEdition::Repentance,
    label: "The Binding of Isaac: Repentance",
    folder_name: "Binding of Isaac Repentance",
    payload_id: "repentance",
  },
];

impl GameEdition {
  pub fn info(self) -> &'static EditionInfo {
    // Every variant has exactly one row in EDITIONS.
    match EDITIONS.iter().find(|e| e.edition == self) {
      Some(info) => info,
      None => unreachable!("edition table is missing {self:?}"),
    }
  }

  pub fn folder_name(self) -> &'static str {
    self.info().folder_name
  }

  pub fn payload_id(self) -> &'static str {
    self.info().payload_id
  }

  pub fn from_menu_number(n: usize) -> Option<Self> {
    n.checked_sub(1)
      .and_then(|i| EDITIONS.get(i))
      .map(|e| e.edition)
  }

  /// Accepts a menu number (`5`) or a short name (`repentance`, `ab+`).
  pub fn parse(s: &str) -> Result<Self> {
    let key = s.trim().to_ascii_lowercase();
    if let Ok(n) = key.parse::<usize>() {
      return Self::from_menu_number(n).ok_or_else(|| InstallError::InvalidSelection(s.to_string()));
    }

    let edition = match key.as_str() {
      "rebirth" => Self::Rebirth,
      "afterbirth" | "ab" => Self::Afterbirth,
      "afterbirth+" | "afterbirth-plus" | "ab+" | "abp" => Self::AfterbirthPlus,
      "afterbirth+bp5" | "afterbirth-plus-bp5" | "ab+bp5" | "abp-bp5" => Self::AfterbirthPlusBp5,
      "repentance" | "rep" => Self::Repentance,
      _ => return Err(InstallError::InvalidSelection(s.to_string())),
    };
    Ok(edition)
  }
}

impl fmt::Display for GameEdition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.info().label)
  }
}
