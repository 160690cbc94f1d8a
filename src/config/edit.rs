//! Read-modify-write editing of the config file.
//!
//! Every edit parses the whole file, changes the in-memory table and writes
//! the whole file back through a sibling temp file and a rename.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use toml::{Table, Value};

use super::path::KeyPath;
use crate::error::{ChroniqError, Result};

/// Result of a batched delete
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Full dotted keys removed from the file
    pub deleted: Vec<String>,
    /// Keys whose parent tables or leaf did not exist
    pub not_found: Vec<String>,
    /// Keys the confirmation callback declined
    pub declined: Vec<String>,
}

impl DeleteOutcome {
    pub fn changed(&self) -> bool {
        !self.deleted.is_empty()
    }
}

/// Convert CLI text into a typed TOML value.
///
/// `true`/`yes`/`on` and `false`/`no`/`off` (any case) become booleans, an
/// all-digit string that fits `i64` becomes an integer, anything else stays a
/// string.
pub fn coerce_value(raw: &str) -> Value {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "on" => return Value::Boolean(true),
        "false" | "no" | "off" => return Value::Boolean(false),
        _ => {}
    }

    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Integer(n);
        }
    }

    Value::String(raw.to_string())
}

/// Set a dot-path key in the config file, creating the file and any
/// intermediate tables as needed.
///
/// # Returns
/// * `Ok(Value)` - The coerced value that was written
/// * `Err(ConfigParse)` - Existing file is not valid TOML (left untouched)
/// * `Err(NotATable)` - An intermediate key holds a scalar
/// * `Err(Persist)` - The file could not be written
pub fn set_value(key: &str, raw: &str, path: &Path) -> Result<Value> {
    let key_path = KeyPath::parse(key)?;
    let mut table = read_table(path)?.unwrap_or_default();

    let value = coerce_value(raw);
    key_path.set(&mut table, value.clone())?;
    write_table(path, &table)?;

    tracing::info!(key = %key_path, path = %path.display(), "config value set");
    Ok(value)
}

/// Delete keys from the config file, optionally scoped to a profile.
///
/// `confirm` is asked once per found key when `require_confirmation` is set.
/// The file is rewritten once, and only if something was deleted. A missing
/// file means every key is not-found.
pub fn delete_keys<F>(
    keys: &[String],
    profile: Option<&str>,
    path: &Path,
    require_confirmation: bool,
    mut confirm: F,
) -> Result<DeleteOutcome>
where
    F: FnMut(&str) -> bool,
{
    try_delete_keys(keys, profile, path, require_confirmation, |key| {
        Ok::<_, ChroniqError>(confirm(key))
    })
}

/// [`delete_keys`] with a fallible confirmation.
///
/// The first `Err` from `confirm` aborts the whole batch: nothing is written,
/// including keys already confirmed.
pub fn try_delete_keys<F, E>(
    keys: &[String],
    profile: Option<&str>,
    path: &Path,
    require_confirmation: bool,
    mut confirm: F,
) -> std::result::Result<DeleteOutcome, E>
where
    F: FnMut(&str) -> std::result::Result<bool, E>,
    E: From<ChroniqError>,
{
    let mut outcome = DeleteOutcome::default();
    let Some(mut table) = read_table(path)? else {
        outcome.not_found = keys.to_vec();
        return Ok(outcome);
    };

    for key in keys {
        let key_path = match profile {
            Some(name) => KeyPath::parse(key)?.scoped(&["profile", name]),
            None => KeyPath::parse(key)?,
        };
        let full_key = key_path.to_string();

        if key_path.get(&table).is_none() {
            tracing::debug!(key = %full_key, "delete target not found");
            outcome.not_found.push(full_key);
            continue;
        }

        if require_confirmation && !confirm(&full_key)? {
            outcome.declined.push(full_key);
            continue;
        }

        key_path.remove(&mut table);
        outcome.deleted.push(full_key);
    }

    if outcome.changed() {
        write_table(path, &table)?;
        tracing::info!(deleted = outcome.deleted.len(), path = %path.display(), "config keys deleted");
    }
    Ok(outcome)
}

/// Parse the file, `None` when it does not exist
fn read_table(path: &Path) -> Result<Option<Table>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    text.parse::<Table>()
        .map(Some)
        .map_err(|e| ChroniqError::config_parse(path, e.to_string()))
}

fn write_table(path: &Path, table: &Table) -> Result<()> {
    let text = toml::to_string_pretty(table)?;
    let tmp = path.with_extension("toml.tmp");

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ChroniqError::persist(path, e))?;
    }
    fs::write(&tmp, text).map_err(|e| ChroniqError::persist(path, e))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        ChroniqError::persist(path, e)
    })
}
