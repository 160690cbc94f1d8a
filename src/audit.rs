//! Read-only health check of the version file, changelog and log directory.
//!
//! Unlike [`crate::version_file::VersionFile::load`], the audit never repairs
//! anything; an invalid version file is reported as an error finding.

use std::fs;

use crate::changelog;
use crate::config::Settings;
use crate::domain::Version;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Ok,
    Info,
    Warn,
    Error,
    Tip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    pub findings: Vec<Finding>,
}

impl AuditReport {
    fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.findings.push(Finding {
            severity,
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }
}

/// Scan the project. `strict` (or `settings.strict`) adds heading checks.
pub fn run_audit(settings: &Settings, strict: bool) -> AuditReport {
    let mut report = AuditReport::default();
    report.push(
        Severity::Info,
        format!("Using profile: {}", settings.active_profile),
    );

    let version = audit_version_file(settings, &mut report);

    let changelog_path = &settings.changelog_file;
    if !changelog_path.exists() {
        report.push(
            Severity::Warn,
            format!("Missing changelog file: {}", changelog_path.display()),
        );
        return report;
    }
    let content = match fs::read_to_string(changelog_path) {
        Ok(content) => content,
        Err(e) => {
            report.push(Severity::Error, format!("Failed to read changelog file: {}", e));
            return report;
        }
    };

    if !changelog::has_heading(&content) {
        report.push(
            Severity::Error,
            format!("{} missing top-level heading", changelog_path.display()),
        );
    }

    if let Some(version) = &version {
        if content.contains(&version.to_string()) {
            report.push(Severity::Ok, "Changelog contains current version");
        } else {
            report.push(
                Severity::Warn,
                format!("Current version {} not found in changelog", version),
            );
        }
    }

    let strict_enabled = strict || settings.strict;
    if strict_enabled {
        report.push(Severity::Info, "Strict mode enabled");
        let headings = changelog::dated_headings(&content);
        if headings.is_empty() {
            report.push(
                Severity::Warn,
                "No properly formatted changelog headings found",
            );
        } else {
            report.push(
                Severity::Ok,
                format!("Found {} valid changelog headings", headings.len()),
            );
        }
    }

    if settings.log_dir.exists() {
        report.push(
            Severity::Ok,
            format!("Log directory OK: {}", settings.log_dir.display()),
        );
    } else {
        report.push(
            Severity::Warn,
            format!("Log directory not found: {}", settings.log_dir.display()),
        );
    }

    if !strict_enabled {
        report.push(
            Severity::Tip,
            "Enable --strict or set `strict = true` in .chroniq.toml for deeper audits",
        );
    }

    if !changelog::has_sections(&content) {
        report.push(
            Severity::Warn,
            "No version sections detected in changelog. Consider using changelog headings",
        );
    }

    report
}

fn audit_version_file(settings: &Settings, report: &mut AuditReport) -> Option<Version> {
    let path = &settings.version_file;
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) if !path.exists() => {
            report.push(
                Severity::Warn,
                format!("Missing version file: {}", path.display()),
            );
            return None;
        }
        Err(e) => {
            report.push(Severity::Error, format!("Failed to read version file: {}", e));
            return None;
        }
    };

    match Version::parse(text.trim()) {
        Ok(version) => {
            report.push(Severity::Ok, format!("Version file found: {}", version));
            Some(version)
        }
        Err(e) => {
            report.push(Severity::Error, e.to_string());
            None
        }
    }
}
