//! Built-in configuration tier.

use toml::{Table, Value};

/// Profile name used when neither the caller nor the file selects one.
pub const DEFAULT_PROFILE: &str = "default";

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = ".chroniq.toml";

/// Returns the hardcoded fallback values every resolution starts from.
pub fn builtin_defaults() -> Table {
    let mut table = Table::new();
    let mut put = |key: &str, value: Value| {
        table.insert(key.to_string(), value);
    };

    put("default_bump", Value::from("patch"));
    put("silent", Value::from(false));
    put("strict", Value::from(false));
    put("emoji_fallback", Value::from(true));
    put("version_file", Value::from("version.txt"));
    put("changelog_file", Value::from("CHANGELOG.md"));
    put("log_dir", Value::from("data/logs"));
    put("activity_log", Value::from("data/logs/activity.log"));
    put("auto_increment_prerelease", Value::from(true));
    put("require_changelog_heading", Value::from(false));
    put("active_profile", Value::from(DEFAULT_PROFILE));

    table
}
