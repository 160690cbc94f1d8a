//! One-level rollback from the version backup.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::changelog;
use crate::domain::Version;
use crate::error::{ChroniqError, Result};
use crate::version_file::VersionFile;

/// What a rollback did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackOutcome {
    /// No backup on disk; nothing was changed
    NoBackup,
    Restored {
        version: Version,
        changelog_section_removed: bool,
    },
}

/// Restore the version file from its backup and, unless `version_only`,
/// drop the newest changelog section when it belongs to the version being
/// rolled back from.
///
/// The backup is consumed, so a second rollback reports `NoBackup`. A
/// missing changelog is skipped, and so is a newest section for any other
/// version (a bump written without a changelog entry).
pub fn perform_rollback(
    version_file: &VersionFile,
    changelog_path: &Path,
    version_only: bool,
) -> Result<RollbackOutcome> {
    let Some(version) = version_file.read_backup()? else {
        tracing::debug!(backup = %version_file.backup_path().display(), "no backup to roll back to");
        return Ok(RollbackOutcome::NoBackup);
    };

    let rolled_back_from = read_current(version_file)?;
    version_file.save(&version)?;
    version_file.remove_backup()?;

    let changelog_section_removed = match (&rolled_back_from, version_only) {
        (Some(from), false) => strip_changelog(changelog_path, from)?,
        _ => false,
    };

    Ok(RollbackOutcome::Restored {
        version,
        changelog_section_removed,
    })
}

/// Trimmed text of the version file as it stands, without self-healing
fn read_current(version_file: &VersionFile) -> Result<Option<String>> {
    match fs::read(version_file.path()) {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).trim().to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn strip_changelog(path: &Path, rolled_back_from: &str) -> Result<bool> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    if changelog::latest_section_version(&content) != Some(rolled_back_from) {
        tracing::debug!(version = rolled_back_from, "newest changelog section is for another version, kept");
        return Ok(false);
    }

    match changelog::strip_latest_section(&content) {
        Some(stripped) => {
            fs::write(path, stripped).map_err(|e| ChroniqError::persist(path, e))?;
            Ok(true)
        }
        None => Ok(false),
    }
}
