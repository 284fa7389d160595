use crate::edition::GameEdition;
use crate::error::{InstallError, Result};
use crate::paths;
use std::path::PathBuf;
use std::process::Command;

/// Where the OS says the user's "Documents" folder is. Users can relocate
/// it, and some editions follow the relocation while others do not.
pub trait DocumentsLocator {
  fn documents_dir(&self) -> Result<PathBuf>;
}

pub struct PowerShellDocuments;

impl DocumentsLocator for PowerShellDocuments {
  fn documents_dir(&self) -> Result<PathBuf> {
    let output = Command::new("powershell")
      .args([
        "-NoProfile",
        "-NonInteractive",
        "-Command",
        "[Environment]::GetFolderPath('MyDocuments')",
      ])
      .output()
      .map_err(|e| InstallError::DocumentsQuery(e.to_string()))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(InstallError::DocumentsQuery(format!(
        "powershell exited with {}: {}",
        output.status,
        stderr.trim()
      )));
    }

    parse_documents_output(&output.stdout)
  }
}

fn parse_documents_output(stdout: &[u8]) -> Result<PathBuf> {
  let text = String::from_utf8_lossy(stdout);
  let trimmed = text.trim();
  if trimmed.is_empty() {
    return Err(InstallError::DocumentsQuery("empty answer from powershell".to_string()));
  }
  Ok(PathBuf::from(trimmed))
}

pub struct SaveDirResolver<'a> {
  users_root: PathBuf,
  username: Option<String>,
  documents: &'a dyn DocumentsLocator,
}

impl<'a> SaveDirResolver<'a> {
  pub fn new(users_root: PathBuf, username: Option<String>, documents: &'a dyn DocumentsLocator) -> Self {
    Self {
      users_root,
      username,
      documents,
    }
  }

  pub fn resolve(&self, edition: GameEdition) -> Result<PathBuf> {
    let folder = edition.folder_name();

    // The game ignores a relocated "Documents" folder for some editions, so
    // the conventional location wins whenever the game has logged there.
    match self.username.as_deref() {
      Some(user) => {
        let standard = paths::standard_save_dir(&self.users_root, user, folder);
        if paths::log_marker_path(&standard).is_file() {
          tracing::info!(path = %standard.display(), "save data found at standard location");
          return Ok(standard);
        }
        tracing::debug!(path = %standard.display(), "no log.txt at standard location");
      }
      None => {
        tracing::warn!("current username unknown; skipping standard save location");
      }
    }

    let documents = self.documents.documents_dir()?;
    let custom = paths::documents_save_dir(&documents, folder);
    if paths::log_marker_path(&custom).is_file() || custom.is_dir() {
      tracing::info!(path = %custom.display(), "save data found under Documents folder");
      return Ok(custom);
    }

    Err(InstallError::SaveDirNotFound(custom))
  }
}

/// Account name of the logged-in user, without any `DOMAIN\` prefix.
pub fn current_username() -> Option<String> {
  strip_domain(&whoami::username())
}

fn strip_domain(raw: &str) -> Option<String> {
  let name = raw.rsplit('\\').next().unwrap_or(raw).trim();
  if name.is_empty() {
    return None;
  }
  Some(name.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::edition::EDITIONS;
  use std::fs;
  use std::path::Path;

  struct FixedDocuments(PathBuf);

  impl DocumentsLocator for FixedDocuments {
    fn documents_dir(&self) -> Result<PathBuf> {
      Ok(self.0.clone())
    }
  }

  struct FailingDocuments;

  impl DocumentsLocator for FailingDocuments {
    fn documents_dir(&self) -> Result<PathBuf> {
      Err(InstallError::DocumentsQuery("no shell".to_string()))
    }
  }

  fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
  }

  #[test]
  fn standard_location_with_log_wins() {
    let tmp = tempfile::tempdir().unwrap();
    let users = tmp.path().join("Users");
    let docs = tmp.path().join("Relocated");
    let standard = paths::standard_save_dir(&users, "Alice", "Binding of Isaac Repentance");
    touch(&standard.join("log.txt"));
    fs::create_dir_all(paths::documents_save_dir(&docs, "Binding of Isaac Repentance")).unwrap();

    let locator = FixedDocuments(docs);
    let resolver = SaveDirResolver::new(users, Some("Alice".into()), &locator);
    assert_eq!(resolver.resolve(GameEdition::Repentance).unwrap(), standard);
  }

  #[test]
  fn falls_back_to_documents_folder() {
    let tmp = tempfile::tempdir().unwrap();
    let users = tmp.path().join("Users");
    let docs = tmp.path().join("D").join("Documents");
    let custom = paths::documents_save_dir(&docs, "Binding of Isaac Afterbirth");
    touch(&custom.join("log.txt"));

    let locator = FixedDocuments(docs);
    let resolver = SaveDirResolver::new(users, Some("Alice".into()), &locator);
    assert_eq!(resolver.resolve(GameEdition::Afterbirth).unwrap(), custom);
  }

  #[test]
  fn fallback_accepts_existing_directory_without_log() {
    let tmp = tempfile::tempdir().unwrap();
    let docs = tmp.path().join("Documents");
    let custom = paths::documents_save_dir(&docs, "Binding of Isaac Rebirth");
    fs::create_dir_all(&custom).unwrap();

    let locator = FixedDocuments(docs);
    let resolver = SaveDirResolver::new(tmp.path().join("Users"), None, &locator);
    assert_eq!(resolver.resolve(GameEdition::Rebirth).unwrap(), custom);
  }

  #[test]
  fn missing_everywhere_reports_attempted_path() {
    let tmp = tempfile::tempdir().unwrap();
    let docs = tmp.path().join("Documents");
    let locator = FixedDocuments(docs.clone());
    let resolver = SaveDirResolver::new(tmp.path().join("Users"), Some("Bob".into()), &locator);

    match resolver.resolve(GameEdition::Repentance) {
      Err(InstallError::SaveDirNotFound(p)) => {
        assert_eq!(p, paths::documents_save_dir(&docs, "Binding of Isaac Repentance"));
      }
      other => panic!("expected SaveDirNotFound, got {other:?}"),
    }
  }

  #[test]
  fn documents_query_failure_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let resolver = SaveDirResolver::new(tmp.path().to_path_buf(), Some("Bob".into()), &FailingDocuments);
    assert!(matches!(
      resolver.resolve(GameEdition::Rebirth),
      Err(InstallError::DocumentsQuery(_))
    ));
  }

  #[test]
  fn every_edition_resolves_to_its_folder_name() {
    let tmp = tempfile::tempdir().unwrap();
    let users = tmp.path().join("Users");
    for info in EDITIONS.iter() {
      touch(&paths::standard_save_dir(&users, "Carol", info.folder_name).join("log.txt"));
    }

    let locator = FailingDocuments;
    let resolver = SaveDirResolver::new(users, Some("Carol".into()), &locator);
    for info in EDITIONS.iter() {
      let dir = resolver.resolve(info.edition).unwrap();
      assert_eq!(dir.file_name().unwrap().to_str().unwrap(), info.folder_name);
    }
  }

  #[test]
  fn documents_output_is_trimmed() {
    let p = parse_documents_output(b"  C:\\Users\\Alice\\OneDrive\\Documents\r\n").unwrap();
    assert_eq!(p, PathBuf::from("C:\\Users\\Alice\\OneDrive\\Documents"));
    assert!(parse_documents_output(b" \r\n").is_err());
  }

  #[test]
  fn domain_prefix_is_stripped() {
    assert_eq!(strip_domain("alice-pc\\Alice").as_deref(), Some("Alice"));
    assert_eq!(strip_domain("Alice").as_deref(), Some("Alice"));
    assert_eq!(strip_domain("  "), None);
  }

  #[test]
  fn username_comes_from_the_account_not_the_environment() {
    std::env::set_var("USERNAME", "Mallory");
    std::env::remove_var("USER");
    let name = current_username();
    assert_eq!(name, strip_domain(&whoami::username()));
    assert_ne!(name.as_deref(), Some("Mallory"));
  }
}
