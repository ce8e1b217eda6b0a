//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

use crate::language::LanguageId;

/// Loading or saving preferences failed
///
/// Always recoverable: callers fall back to defaults on load and report
/// save failures to the user without aborting.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read settings from {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings in {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write settings to {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize settings")]
    Serialize(#[source] serde_json::Error),
}

/// A `key=value` pair that does not name a preference control
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("unknown preference '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}

/// A language identifier outside the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("unknown language id {0}")]
    UnknownLanguage(LanguageId),
}

/// The styler could not apply a theme or lexer style set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("no styles defined for lexer '{0}'")]
    UnknownLexer(String),
}
