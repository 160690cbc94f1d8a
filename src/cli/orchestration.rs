//! Bump workflow orchestration
//!
//! Keeps the version-bump sequence out of the clap layer so it can be driven
//! programmatically: load (self-healing), compute the new version, back up
//! the old one, save, record activity, and optionally write a changelog entry.

use std::fmt;
use std::fs;
use std::str::FromStr;

use crate::activity;
use crate::changelog;
use crate::config::Settings;
use crate::domain::{Version, VersionBump};
use crate::error::{ChroniqError, Result};
use crate::version_file::{LoadOutcome, VersionFile};

/// Requested bump: a release level or the next pre-release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpLevel {
    Release(VersionBump),
    Prerelease,
}

impl FromStr for BumpLevel {
    type Err = ChroniqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "prerelease" | "pre" => Ok(BumpLevel::Prerelease),
            _ => s.parse::<VersionBump>().map(BumpLevel::Release),
        }
    }
}

impl fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpLevel::Release(bump) => write!(f, "{}", bump),
            BumpLevel::Prerelease => write!(f, "prerelease"),
        }
    }
}

/// Arguments for the bump workflow
///
/// Mirrors the CLI arguments but without depending on clap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BumpWorkflowArgs {
    /// Explicit level; `None` uses `default_bump` from config
    pub level: Option<String>,

    /// Pre-release label for `prerelease` bumps
    pub pre_label: Option<String>,

    /// Changelog message; `None` writes no entry
    pub message: Option<String>,
}

/// What happened to the changelog during a bump
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangelogResult {
    NotRequested,
    Added,
    BlankMessage,
    /// `require_changelog_heading` is set and the file lacks `# Changelog`
    MissingHeading,
}

/// Result of a successful bump
#[derive(Debug, Clone, PartialEq)]
pub struct BumpResult {
    pub level: BumpLevel,
    pub previous: Version,
    pub current: Version,
    pub load_outcome: LoadOutcome,
    pub changelog: ChangelogResult,
}

/// Run a bump against the files named in `settings`.
///
/// The new version is computed before anything is written, so an invalid
/// level or label leaves the version file and backup untouched (apart from
/// the self-healing load).
pub fn run_bump_workflow(args: &BumpWorkflowArgs, settings: &Settings) -> Result<BumpResult> {
    let level: BumpLevel = args
        .level
        .as_deref()
        .unwrap_or(&settings.default_bump)
        .parse()?;

    let version_file = VersionFile::new(&settings.version_file);
    let loaded = version_file.load()?;
    let previous = loaded.version;

    let mut current = previous.clone();
    match level {
        BumpLevel::Release(bump) => current.bump(bump)?,
        BumpLevel::Prerelease => {
            let label = prerelease_label(args, settings, &previous)?;
            current.bump_prerelease(&label)?;
        }
    }

    version_file.write_backup(&previous)?;
    version_file.save(&current)?;

    let event = format!("bump {}: {} -> {}", level, previous, current);
    if let Err(e) = activity::record(&settings.activity_log, &event) {
        tracing::warn!(error = %e, "could not record activity");
    }

    let changelog = match &args.message {
        Some(message) => add_changelog_entry(settings, &current, message)?,
        None => ChangelogResult::NotRequested,
    };

    Ok(BumpResult {
        level,
        previous,
        current,
        load_outcome: loaded.outcome,
        changelog,
    })
}

/// Write a changelog section for `version`, honoring `require_changelog_heading`
pub fn add_changelog_entry(
    settings: &Settings,
    version: &Version,
    message: &str,
) -> Result<ChangelogResult> {
    let path = &settings.changelog_file;
    if settings.require_changelog_heading && path.exists() {
        let content = fs::read_to_string(path)?;
        if !changelog::has_heading(&content) {
            return Ok(ChangelogResult::MissingHeading);
        }
    }

    if changelog::add_entry(path, &version.to_string(), message)? {
        Ok(ChangelogResult::Added)
    } else {
        Ok(ChangelogResult::BlankMessage)
    }
}

/// Explicit `--pre` label, else the current label when auto-increment is on
fn prerelease_label(args: &BumpWorkflowArgs, settings: &Settings, current: &Version) -> Result<String> {
    if let Some(label) = &args.pre_label {
        return Ok(label.clone());
    }
    if settings.auto_increment_prerelease {
        if let Some(label) = current.prerelease_label() {
            return Ok(label);
        }
    }
    Err(ChroniqError::EmptyLabel)
}
