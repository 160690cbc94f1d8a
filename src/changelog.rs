//! `CHANGELOG.md` maintenance.
//!
//! Sections are kept newest-first directly under the title block:
//!
//! ```text
//! # Changelog
//!
//! All notable changes to this project will be documented here.
//!
//! ## [1.3.0] - 2025-04-16
//! - Added something
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{Local, NaiveDate};
use regex::Regex;

use crate::error::{ChroniqError, Result};

pub const TITLE: &str = "# Changelog";

const HEADER: &str = "# Changelog\n\nAll notable changes to this project will be documented here.\n";
const SECTION_MARKER: &str = "## [";
const DATED_HEADING_PATTERN: &str = r"(?m)^## \[(.*?)\] - (\d{4}-\d{2}-\d{2})";

/// Create the changelog with its title block if it does not exist.
///
/// Returns `true` when the file was created.
pub fn ensure_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    write(path, HEADER)?;
    Ok(true)
}

/// Add a section for `version` dated today.
///
/// A blank message is a no-op and does not create the file. Returns `true`
/// when an entry was written.
pub fn add_entry(path: &Path, version: &str, message: &str) -> Result<bool> {
    if message.trim().is_empty() {
        return Ok(false);
    }
    ensure_exists(path)?;

    let content = fs::read_to_string(path)?;
    let entry = render_entry(version, message, Local::now().date_naive());
    write(path, &insert_entry(&content, &entry))?;

    tracing::info!(path = %path.display(), version, "changelog entry added");
    Ok(true)
}

/// Format one section: a dated heading and one bullet per message line
pub fn render_entry(version: &str, message: &str, date: NaiveDate) -> String {
    let mut entry = format!("## [{}] - {}\n", version, date.format("%Y-%m-%d"));
    for line in message.lines().map(str::trim).filter(|l| !l.is_empty()) {
        entry.push_str("- ");
        entry.push_str(line);
        entry.push('\n');
    }
    entry
}

/// Place `entry` above the newest existing section, or after the title block
pub fn insert_entry(content: &str, entry: &str) -> String {
    match first_section_start(content) {
        Some(start) => format!("{}{}\n{}", &content[..start], entry, &content[start..]),
        None => {
            let mut out = content.trim_end_matches('\n').to_string();
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(entry);
            out
        }
    }
}

pub fn has_heading(content: &str) -> bool {
    content.contains(TITLE)
}

/// Up to `limit` non-empty lines, starting at the newest section.
///
/// A missing file reads as empty.
pub fn recent_lines(path: &Path, limit: usize) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(recent_lines_in(&content, limit)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(e.into()),
    }
}

pub fn recent_lines_in(content: &str, limit: usize) -> Vec<String> {
    let body = first_section_start(content)
        .map(|start| &content[start..])
        .unwrap_or(content);
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Remove the newest section. `None` when there is no section to remove.
pub fn strip_latest_section(content: &str) -> Option<String> {
    let start = first_section_start(content)?;
    let after_heading = start + SECTION_MARKER.len();
    let end = first_section_start(&content[after_heading..])
        .map(|offset| after_heading + offset)
        .unwrap_or(content.len());
    Some(format!("{}{}", &content[..start], &content[end..]))
}

/// Version named in the newest `## [x]` heading
pub fn latest_section_version(content: &str) -> Option<&str> {
    let start = first_section_start(content)? + SECTION_MARKER.len();
    let rest = &content[start..];
    let line_end = rest.find('\n').unwrap_or(rest.len());
    let close = rest[..line_end].find(']')?;
    Some(&rest[..close])
}

/// `(version, date)` for every `## [x] - YYYY-MM-DD` heading
pub fn dated_headings(content: &str) -> Vec<(String, String)> {
    let Ok(re) = Regex::new(DATED_HEADING_PATTERN) else {
        return Vec::new();
    };
    re.captures_iter(content)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect()
}

pub fn has_sections(content: &str) -> bool {
    content.contains(SECTION_MARKER)
}

/// Byte offset of the first line starting with `## [`
fn first_section_start(content: &str) -> Option<usize> {
    content
        .match_indices(SECTION_MARKER)
        .map(|(index, _)| index)
        .find(|&index| index == 0 || content.as_bytes()[index - 1] == b'\n')
}

fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ChroniqError::persist(path, e))?;
    }
    fs::write(path, content).map_err(|e| ChroniqError::persist(path, e))
}
