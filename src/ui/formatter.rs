//! Pure formatting functions for UI output.
//!
//! This module contains all display logic separated from user interaction.
//! Icons go through [`Theme`] so terminals that cannot render emoji get a
//! bracketed text fallback.

use console::{style, Emoji};
use toml::Value;

use crate::audit::{AuditReport, Severity};
use crate::config::ResolvedValue;

/// Output settings derived from the resolved configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// When false, emoji are printed even if the terminal does not advertise support
    pub emoji_fallback: bool,
    /// Suppress informational output; errors and requested data still print
    pub silent: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            emoji_fallback: true,
            silent: false,
        }
    }
}

impl Theme {
    pub fn new(emoji_fallback: bool, silent: bool) -> Self {
        Theme {
            emoji_fallback,
            silent,
        }
    }

    /// Pick the emoji or its text fallback
    pub fn icon(&self, emoji: &'static str, fallback: &'static str) -> String {
        if self.emoji_fallback {
            Emoji(emoji, fallback).to_string()
        } else {
            emoji.to_string()
        }
    }
}

/// Format and print an error message in red.
pub fn display_error(theme: &Theme, message: &str) {
    eprintln!(
        "{} {} {}",
        theme.icon("❌", "[error]"),
        style("ERROR:").red().bold(),
        message
    );
}

/// Format and print a warning in yellow.
pub fn display_warning(theme: &Theme, message: &str) {
    eprintln!(
        "{} {}",
        theme.icon("⚠️ ", "[warn]"),
        style(message).yellow()
    );
}

/// Format and print a success message with green checkmark.
pub fn display_success(theme: &Theme, message: &str) {
    if theme.silent {
        return;
    }
    println!("{} {}", style(theme.icon("✅", "[ok]")).green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(theme: &Theme, message: &str) {
    if theme.silent {
        return;
    }
    println!("{} {}", style("→").yellow(), message);
}

/// Print the current version. Shown even in silent mode.
pub fn display_version(theme: &Theme, version: &str) {
    println!(
        "{} {} {}",
        theme.icon("📌", "[ver]"),
        style("Current project version:").cyan().bold(),
        version
    );
}

/// Display a version change.
pub fn display_version_change(theme: &Theme, from: &str, to: &str) {
    if theme.silent {
        return;
    }
    println!("\n{}", style("Version Updated:").bold());
    println!("  From: {}", style(from).red());
    println!("  To:   {}", style(to).green());
}

/// Display recent changelog lines.
///
/// # Arguments
/// * `lines` - Lines to print, newest section first
pub fn display_recent_lines(theme: &Theme, lines: &[String]) {
    println!(
        "{} {}",
        theme.icon("📝", "[log]"),
        style(format!("Last {} changelog lines:", lines.len())).bold()
    );
    for line in lines {
        println!("  {}", line);
    }
}

/// Render a TOML value the way a user would type it back into `config set`.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Display one resolved key with its origin tier.
pub fn display_config_value(key: &str, resolved: &ResolvedValue) {
    println!(
        "{} = {} {}",
        style(key).bold(),
        format_value(&resolved.value),
        style(format!("({})", resolved.origin)).dim()
    );
}

/// Display every resolved key for `profile`.
pub fn display_config_entries(theme: &Theme, profile: &str, entries: &[(String, ResolvedValue)]) {
    println!(
        "{} {} {}",
        theme.icon("⚙️ ", "[config]"),
        style("Active profile:").bold(),
        profile
    );
    for (key, resolved) in entries {
        print!("  ");
        display_config_value(key, resolved);
    }
}

/// Display an audit report, one line per finding.
pub fn display_audit_report(theme: &Theme, report: &AuditReport) {
    println!("\n{} {}", theme.icon("🕵️", "[audit]"), style("Chroniq Audit").cyan().bold());
    println!("{}", "=".repeat(30));

    for finding in &report.findings {
        let line = match finding.severity {
            Severity::Ok => format!("{} {}", theme.icon("✅", "[ok]"), finding.message),
            Severity::Info => format!("{} {}", theme.icon("ℹ️ ", "[info]"), finding.message),
            Severity::Warn => format!(
                "{} {}",
                theme.icon("⚠️ ", "[warn]"),
                style(&finding.message).yellow()
            ),
            Severity::Error => format!(
                "{} {}",
                theme.icon("❌", "[error]"),
                style(&finding.message).red()
            ),
            Severity::Tip => format!(
                "{} {}",
                theme.icon("💡", "[tip]"),
                style(&finding.message).dim()
            ),
        };
        println!("{}", line);
    }

    println!(
        "\n{} {}",
        theme.icon("✅", "[done]"),
        style("Audit complete.").green()
    );
}
