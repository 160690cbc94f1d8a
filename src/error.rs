use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for chroniq operations
#[derive(Error, Debug)]
pub enum ChroniqError {
    #[error("Invalid version format: '{0}' - expected MAJOR.MINOR.PATCH[-PRERELEASE]")]
    InvalidFormat(String),

    #[error("Pre-release label must not be empty")]
    EmptyLabel,

    #[error("Invalid pre-release label: '{0}'")]
    InvalidLabel(String),

    #[error("Cannot bump {0}: component is already at its maximum value")]
    Overflow(String),

    #[error("Invalid bump level: '{0}' - must be patch, minor, major or prerelease")]
    InvalidBumpLevel(String),

    #[error("Invalid configuration key: '{0}'")]
    InvalidKey(String),

    #[error("Configuration key '{0}' is not a table")]
    NotATable(String),

    #[error("Failed to parse config file {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in chroniq
pub type Result<T> = std::result::Result<T, ChroniqError>;

impl ChroniqError {
    /// Create an invalid-format error carrying the offending text
    pub fn invalid_format(text: impl Into<String>) -> Self {
        ChroniqError::InvalidFormat(text.into())
    }

    /// Create a config parse error for the given file
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ChroniqError::ConfigParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Wrap a failed write to version, backup or config storage
    pub fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ChroniqError::Persist {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_format_carries_text() {
        let err = ChroniqError::invalid_format("01.02.03");
        assert!(err.to_string().contains("'01.02.03'"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ChroniqError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_persist_error_names_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ChroniqError::persist("version.txt", io_err);
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to write version.txt"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_config_parse_names_path() {
        let err = ChroniqError::config_parse(".chroniq.toml", "expected `=`");
        assert_eq!(
            err.to_string(),
            "Failed to parse config file .chroniq.toml: expected `=`"
        );
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ChroniqError::EmptyLabel, "Pre-release label"),
            (ChroniqError::InvalidLabel("a!".into()), "Invalid pre-release"),
            (ChroniqError::InvalidBumpLevel("huge".into()), "Invalid bump level"),
            (ChroniqError::InvalidKey("a..b".into()), "Invalid configuration key"),
            (ChroniqError::NotATable("silent".into()), "Configuration key"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
