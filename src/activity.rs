//! Append-only activity log (`activity_log` config key).

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local, SecondsFormat};

use crate::error::{ChroniqError, Result};

/// Append `[timestamp] message` to the activity log, creating its directory.
pub fn record(path: &Path, message: &str) -> Result<()> {
    record_at(path, message, Local::now())
}

fn record_at(path: &Path, message: &str, at: DateTime<Local>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ChroniqError::persist(path, e))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ChroniqError::persist(path, e))?;
    writeln!(
        file,
        "[{}] {}",
        at.to_rfc3339_opts(SecondsFormat::Secs, false),
        message
    )
    .map_err(|e| ChroniqError::persist(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("logs").join("activity.log");

        record(&path, "bump patch: 1.0.0 -> 1.0.1").unwrap();
        record(&path, "rollback: 1.0.1 -> 1.0.0").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] bump patch: 1.0.0 -> 1.0.1"));
        assert!(lines[1].ends_with("rollback: 1.0.1 -> 1.0.0"));
    }
}
