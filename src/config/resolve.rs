//! Tiered configuration resolution.
//!
//! Three tiers, lowest to highest precedence:
//! 1. Built-in defaults ([`builtin_defaults`])
//! 2. Top-level keys of the config file
//! 3. The active profile's section (`[profile.<name>]`, or `[profiles.<name>]`)
//!
//! Resolution is a pure function of the requested profile and the file
//! contents. A missing file is normal; an unreadable or malformed file
//! degrades to defaults and is reported as a [`ConfigDiagnostic`] instead of
//! an error.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::mem;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml::{Table, Value};

use super::defaults::{builtin_defaults, DEFAULT_CONFIG_FILE, DEFAULT_PROFILE};
use super::path::KeyPath;
use crate::error::{ChroniqError, Result};

/// Top-level tables holding per-profile sections. `profile` wins over
/// `profiles` when a file has both.
pub const PROFILE_TABLES: [&str; 2] = ["profiles", "profile"];

/// Which tier supplied a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Default,
    UserDefined,
    Profile(String),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Default => write!(f, "default"),
            Origin::UserDefined => write!(f, "user-defined"),
            Origin::Profile(name) => write!(f, "profile:{}", name),
        }
    }
}

/// A looked-up value together with the tier it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedValue {
    pub value: Value,
    pub origin: Origin,
}

/// Why a config file present on disk was ignored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDiagnostic {
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ignored config file {}: {}",
            self.path.display(),
            self.message
        )
    }
}

/// Output of [`resolve`]: the merged config and, when the file had to be
/// ignored, the reason.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub config: ResolvedConfig,
    pub diagnostic: Option<ConfigDiagnostic>,
}

/// The merged mapping plus what it was resolved from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    values: Table,
    active_profile: String,
    file: Table,
}

/// Typed view of the built-in keys
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub default_bump: String,
    pub silent: bool,
    pub strict: bool,
    pub emoji_fallback: bool,
    pub version_file: PathBuf,
    pub changelog_file: PathBuf,
    pub log_dir: PathBuf,
    pub activity_log: PathBuf,
    pub auto_increment_prerelease: bool,
    pub require_changelog_heading: bool,
    pub active_profile: String,
}

impl ResolvedConfig {
    /// Config made of built-in defaults only
    pub fn defaults() -> Self {
        resolve_table(None, Table::new())
    }

    /// The merged mapping
    pub fn values(&self) -> &Table {
        &self.values
    }

    pub fn active_profile(&self) -> &str {
        &self.active_profile
    }

    /// Raw parsed file content (empty when there was no usable file)
    pub fn file(&self) -> &Table {
        &self.file
    }

    /// Merged value at a dot-path key
    pub fn get(&self, key: &str) -> Option<&Value> {
        KeyPath::parse(key).ok()?.get(&self.values)
    }

    /// Value at `key` with the tier that produced it, for the active profile
    ///
    /// `active_profile` always reports the name in effect. When an explicit
    /// profile overrode the file's choice, the origin is that profile.
    pub fn value_with_origin(&self, key: &str) -> Option<ResolvedValue> {
        let resolved = resolve_value_with_origin(key, &self.file, &self.active_profile)?;
        if key != "active_profile" {
            return Some(resolved);
        }

        let value = Value::String(self.active_profile.clone());
        if resolved.value == value {
            return Some(resolved);
        }
        Some(ResolvedValue {
            value,
            origin: Origin::Profile(self.active_profile.clone()),
        })
    }

    /// Deserialize the built-in keys into [`Settings`]
    pub fn settings(&self) -> Result<Settings> {
        Value::Table(self.values.clone())
            .try_into::<Settings>()
            .map_err(|e| ChroniqError::config_parse(DEFAULT_CONFIG_FILE, e.to_string()))
    }
}

/// Path of the config file: the explicit override, else `.chroniq.toml`
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load and merge the configuration.
///
/// # Arguments
/// * `profile` - Explicit profile; overrides the file's `active_profile`
/// * `path` - Config file override; defaults to `.chroniq.toml`
///
/// Never fails: an unreadable or malformed file yields defaults with
/// profile `"default"` and a diagnostic.
pub fn resolve(profile: Option<&str>, path: Option<&Path>) -> Resolution {
    let path = config_path(path);

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Resolution {
                config: resolve_table(None, Table::new()),
                diagnostic: None,
            };
        }
        Err(e) => return degraded(path, e.to_string()),
    };

    match text.parse::<Table>() {
        Ok(file) => Resolution {
            config: resolve_table(profile, file),
            diagnostic: None,
        },
        Err(e) => degraded(path, e.to_string()),
    }
}

fn degraded(path: PathBuf, message: String) -> Resolution {
    tracing::warn!(path = %path.display(), error = %message, "config file ignored, using defaults");
    Resolution {
        config: resolve_table(None, Table::new()),
        diagnostic: Some(ConfigDiagnostic { path, message }),
    }
}

/// Merge an already-parsed file over the defaults
pub fn resolve_table(profile: Option<&str>, file: Table) -> ResolvedConfig {
    let defaults = builtin_defaults();
    let active_profile = profile
        .map(str::to_string)
        .or_else(|| {
            file.get("active_profile")
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    let mut values = defaults.clone();

    let top_level: Table = file
        .iter()
        .filter(|(key, _)| !PROFILE_TABLES.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    merge_layer(&mut values, &top_level, &defaults, "user-defined");

    let layer = format!("profile:{}", active_profile);
    for table_name in PROFILE_TABLES {
        match file.get(table_name) {
            None => {}
            Some(Value::Table(profiles)) => match profiles.get(&active_profile) {
                Some(Value::Table(section)) => {
                    merge_layer(&mut values, section, &defaults, &layer)
                }
                Some(_) => {
                    tracing::warn!(profile = %active_profile, table = table_name, "profile section is not a table, ignored")
                }
                None => {}
            },
            Some(_) => tracing::warn!(table = table_name, "profile table is not a table, ignored"),
        }
    }

    values.insert(
        "active_profile".to_string(),
        Value::String(active_profile.clone()),
    );

    tracing::debug!(profile = %active_profile, keys = values.len(), "configuration resolved");
    ResolvedConfig {
        values,
        active_profile,
        file,
    }
}

/// Look up `key` by tier: the profile section, then the file's top level,
/// then the built-in defaults.
///
/// Returns `None` when no tier defines the key (or the key is not a valid
/// dot path).
pub fn resolve_value_with_origin(key: &str, file: &Table, profile: &str) -> Option<ResolvedValue> {
    let path = KeyPath::parse(key).ok()?;
    let defaults = builtin_defaults();
    let default = path.get(&defaults);

    let accept = |value: &Value| -> Option<Value> {
        let value = normalize(value);
        match default {
            Some(default) if !same_kind(default, &value) => None,
            _ => Some(value),
        }
    };

    for &table_name in PROFILE_TABLES.iter().rev() {
        if let Some(value) = path.scoped(&[table_name, profile]).get(file).and_then(accept) {
            return Some(ResolvedValue {
                value,
                origin: Origin::Profile(profile.to_string()),
            });
        }
    }

    if let Some(value) = path.get(file).and_then(accept) {
        return Some(ResolvedValue {
            value,
            origin: Origin::UserDefined,
        });
    }

    default.map(|value| ResolvedValue {
        value: value.clone(),
        origin: Origin::Default,
    })
}

/// Merge one tier over `base`, normalizing boolean strings and refusing
/// overrides whose type differs from the built-in default.
fn merge_layer(base: &mut Table, overlay: &Table, defaults: &Table, layer: &str) {
    for (key, value) in overlay {
        let value = normalize(value);
        if let Some(default) = defaults.get(key) {
            if !same_kind(default, &value) {
                tracing::warn!(
                    key = %key,
                    layer,
                    expected = default.type_str(),
                    found = value.type_str(),
                    "override has the wrong type, keeping default"
                );
                continue;
            }
        }

        if let (Some(Value::Table(existing)), Value::Table(incoming)) = (base.get_mut(key), &value) {
            deep_merge(existing, incoming);
            continue;
        }
        base.insert(key.clone(), value);
    }
}

/// Recursive merge: tables merge key by key, everything else overwrites.
pub fn deep_merge(base: &mut Table, overlay: &Table) {
    for (key, overlay_val) in overlay {
        if let (Some(Value::Table(base_table)), Value::Table(overlay_table)) =
            (base.get_mut(key), overlay_val)
        {
            deep_merge(base_table, overlay_table);
            continue;
        }
        base.insert(key.clone(), overlay_val.clone());
    }
}

/// `"true"`/`"false"` (any case) become booleans; tables are normalized recursively.
fn normalize(value: &Value) -> Value {
    match value {
        Value::String(s) if s.eq_ignore_ascii_case("true") => Value::Boolean(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Value::Boolean(false),
        Value::Table(table) => Value::Table(
            table
                .iter()
                .map(|(k, v)| (k.clone(), normalize(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn same_kind(a: &Value, b: &Value) -> bool {
    mem::discriminant(a) == mem::discriminant(b)
}
