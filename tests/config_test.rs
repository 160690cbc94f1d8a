// tests/config_test.rs
use std::fs;
use std::path::{Path, PathBuf};

use chroniq::config::{
    builtin_defaults, delete_keys, resolve, set_value, Origin, ResolvedValue,
};
use tempfile::TempDir;
use toml::{Table, Value};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join(".chroniq.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_no_file_resolves_to_builtin_defaults() {
    let dir = TempDir::new().unwrap();
    let resolution = resolve(None, Some(dir.path().join(".chroniq.toml").as_path()));

    assert!(resolution.diagnostic.is_none());
    assert_eq!(resolution.config.active_profile(), "default");
    assert_eq!(resolution.config.values(), &builtin_defaults());
}

#[test]
fn test_profile_section_overrides_top_level() {
    let resolution = resolve(None, Some(fixture("profile_config.toml").as_path()));
    let config = resolution.config;

    assert_eq!(config.active_profile(), "dev");
    assert_eq!(
        config.value_with_origin("default_bump"),
        Some(ResolvedValue {
            value: Value::String("major".into()),
            origin: Origin::Profile("dev".into()),
        })
    );
    assert_eq!(
        config.value_with_origin("silent"),
        Some(ResolvedValue {
            value: Value::Boolean(false),
            origin: Origin::Default,
        })
    );

    let settings = config.settings().unwrap();
    assert_eq!(settings.default_bump, "major");
    assert_eq!(settings.changelog_file, PathBuf::from("docs/CHANGES.md"));
    assert!(settings.strict);
}

#[test]
fn test_explicit_profile_wins_over_active_profile() {
    let resolution = resolve(Some("ci"), Some(fixture("profile_config.toml").as_path()));
    let settings = resolution.config.settings().unwrap();

    assert_eq!(settings.active_profile, "ci");
    assert_eq!(settings.default_bump, "minor");
    assert!(settings.silent);
    assert!(!settings.emoji_fallback);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "default_bump = \"minor\"\n");

    let config = resolve(None, Some(path.as_path())).config;

    assert_eq!(config.get("default_bump"), Some(&Value::String("minor".into())));
    assert_eq!(config.get("silent"), Some(&Value::Boolean(false)));
    assert_eq!(config.get("strict"), Some(&Value::Boolean(false)));
    assert_eq!(
        config.value_with_origin("default_bump").unwrap().origin,
        Origin::UserDefined
    );
}

#[test]
fn test_malformed_file_degrades_with_diagnostic() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "default_bump = [unterminated\n");

    let resolution = resolve(Some("dev"), Some(path.as_path()));

    let diagnostic = resolution.diagnostic.expect("diagnostic expected");
    assert_eq!(diagnostic.path, path);
    assert_eq!(resolution.config.active_profile(), "default");
    assert_eq!(resolution.config.values(), &builtin_defaults());
}

#[test]
fn test_type_mismatched_override_keeps_default() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "silent = 3\ndefault_bump = \"major\"\n");

    let settings = resolve(None, Some(path.as_path())).config.settings().unwrap();

    assert!(!settings.silent);
    assert_eq!(settings.default_bump, "major");
}

#[test]
fn test_set_value_then_resolve_yields_boolean() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".chroniq.toml");

    let written = set_value("silent", "true", &path).unwrap();
    assert_eq!(written, Value::Boolean(true));

    let config = resolve(None, Some(path.as_path())).config;
    assert_eq!(config.get("silent"), Some(&Value::Boolean(true)));
}

#[test]
fn test_set_nested_key_creates_tables() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".chroniq.toml");

    set_value("profile.ci.default_bump", "minor", &path).unwrap();

    let table: Table = fs::read_to_string(&path).unwrap().parse().unwrap();
    assert_eq!(
        table["profile"]["ci"]["default_bump"],
        Value::String("minor".into())
    );
}

#[test]
fn test_delete_key_leaves_siblings() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "silent = true\nstrict = false\n");

    let outcome =
        delete_keys(&["silent".to_string()], None, &path, false, |_| true).unwrap();

    assert_eq!(outcome.deleted, vec!["silent".to_string()]);
    let table: Table = fs::read_to_string(&path).unwrap().parse().unwrap();
    assert!(!table.contains_key("silent"));
    assert_eq!(table.get("strict"), Some(&Value::Boolean(false)));
}

#[test]
fn test_set_then_delete_in_profile_scope() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".chroniq.toml");
    set_value("silent", "true", &path).unwrap();
    set_value("profile.ci.silent", "false", &path).unwrap();

    let outcome =
        delete_keys(&["silent".to_string()], Some("ci"), &path, false, |_| true).unwrap();

    assert_eq!(outcome.deleted, vec!["profile.ci.silent".to_string()]);
    let table: Table = fs::read_to_string(&path).unwrap().parse().unwrap();
    assert_eq!(table.get("silent"), Some(&Value::Boolean(true)));
}

#[test]
fn test_delete_missing_nested_key_does_not_rewrite() {
    let dir = TempDir::new().unwrap();
    let original = "# keep this comment\nsilent = true\n";
    let path = write_config(&dir, original);

    let outcome =
        delete_keys(&["a.b.c".to_string()], None, &path, false, |_| true).unwrap();

    assert_eq!(outcome.not_found, vec!["a.b.c".to_string()]);
    assert!(!outcome.changed());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_declined_delete_keeps_key() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "silent = true\n");

    let outcome =
        delete_keys(&["silent".to_string()], None, &path, true, |_| false).unwrap();

    assert_eq!(outcome.declined, vec!["silent".to_string()]);
    assert!(fs::read_to_string(&path).unwrap().contains("silent = true"));
}
