//! Version text-file storage.
//!
//! The file holds exactly the formatted version (no trailing newline is
//! written; readers trim). Loading applies a self-healing policy: a missing or
//! unparsable file is replaced by the default version, and the replacement is
//! written back immediately. The policy is reported through [`LoadOutcome`]
//! so the CLI can tell the user instead of repairing silently.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::Version;
use crate::error::{ChroniqError, Result};

/// File name of the one-level rollback backup, kept beside the version file.
pub const BACKUP_FILE_NAME: &str = ".version.bak";

/// How [`VersionFile::load`] arrived at its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File existed and parsed
    Loaded,
    /// File was missing; the default was written as the new baseline
    Created,
    /// File content failed to parse; the default overwrote it
    Repaired { invalid: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedVersion {
    pub version: Version,
    pub outcome: LoadOutcome,
}

/// Handle to a version file and its backup
#[derive(Debug, Clone)]
pub struct VersionFile {
    path: PathBuf,
}

impl VersionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        VersionFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn backup_path(&self) -> PathBuf {
        self.path.with_file_name(BACKUP_FILE_NAME)
    }

    /// Read the stored version, healing a missing or corrupt file.
    ///
    /// # Returns
    /// * `Ok(LoadedVersion)` - The value plus how it was obtained
    /// * `Err(Persist)` - If the healed default could not be written
    /// * `Err(Io)` - If the file exists but cannot be read
    pub fn load(&self) -> Result<LoadedVersion> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no version file, writing default");
                let version = Version::default();
                self.save(&version)?;
                return Ok(LoadedVersion {
                    version,
                    outcome: LoadOutcome::Created,
                });
            }
            Err(e) => return Err(e.into()),
        };

        // Non-UTF-8 content is corrupt text, not an I/O failure
        let (text, utf8) = match String::from_utf8(bytes) {
            Ok(text) => (text, true),
            Err(e) => (String::from_utf8_lossy(e.as_bytes()).into_owned(), false),
        };
        let trimmed = text.trim();
        let parsed = if utf8 {
            Version::parse(trimmed)
        } else {
            Err(ChroniqError::invalid_format(trimmed))
        };

        match parsed {
            Ok(version) => Ok(LoadedVersion {
                version,
                outcome: LoadOutcome::Loaded,
            }),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "replacing invalid version file with default");
                let version = Version::default();
                self.save(&version)?;
                Ok(LoadedVersion {
                    version,
                    outcome: LoadOutcome::Repaired {
                        invalid: trimmed.to_string(),
                    },
                })
            }
        }
    }

    /// Overwrite the file with the formatted version
    pub fn save(&self, version: &Version) -> Result<()> {
        write_text(&self.path, &version.to_string())?;
        tracing::info!(path = %self.path.display(), %version, "version saved");
        Ok(())
    }

    /// Record `version` as the rollback target
    pub fn write_backup(&self, version: &Version) -> Result<()> {
        write_text(&self.backup_path(), &version.to_string())
    }

    /// Read the backup, if one exists
    ///
    /// # Returns
    /// * `Ok(None)` - No backup on disk
    /// * `Ok(Some(Version))` - The backed-up value
    /// * `Err(InvalidFormat)` - Backup exists but is not a valid version
    pub fn read_backup(&self) -> Result<Option<Version>> {
        match fs::read_to_string(self.backup_path()) {
            Ok(text) => Version::parse(text.trim()).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn remove_backup(&self) -> Result<()> {
        let backup = self.backup_path();
        fs::remove_file(&backup).map_err(|e| ChroniqError::persist(backup, e))
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ChroniqError::persist(path, e))?;
    }
    fs::write(path, text).map_err(|e| ChroniqError::persist(path, e))
}
