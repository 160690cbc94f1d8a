//! Layered project configuration: built-in defaults, `.chroniq.toml`, and
//! the active profile section, with per-value provenance.

pub mod defaults;
pub mod edit;
pub mod path;
pub mod resolve;

pub use defaults::{builtin_defaults, DEFAULT_CONFIG_FILE, DEFAULT_PROFILE};
pub use edit::{coerce_value, delete_keys, set_value, try_delete_keys, DeleteOutcome};
pub use path::{flatten, KeyPath};
pub use resolve::{
    config_path, resolve, resolve_table, resolve_value_with_origin, ConfigDiagnostic, Origin,
    Resolution, ResolvedConfig, ResolvedValue, Settings,
};
