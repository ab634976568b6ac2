//! Error types for the check editor.
//!
//! Only configuration errors live here. Field-level validation failures are
//! data, carried by [`ValidationOutcome`](crate::validation::ValidationOutcome)
//! and the editor's error list, and never surface as `Err`.

use std::path::PathBuf;

use crate::check::CheckType;

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration errors raised at the point of misuse.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A variant tag that is not a member of the check type enum.
    #[error("unknown check type '{tag}'")]
    UnknownVariant { tag: String },

    /// A check type the resolver has no profile for.
    #[error("check type '{variant}' is not wired into the variant resolver")]
    UnresolvedVariant { variant: CheckType },

    /// A profile whose wizard has no sections.
    #[error("check type '{variant}' has an empty section order")]
    EmptySectionOrder { variant: CheckType },

    /// A check type the group table has no entry for.
    #[error("check type '{variant}' has no group mapping")]
    UnmappedGroup { variant: CheckType },

    /// A regular-expression field matcher that does not compile.
    #[error("invalid field matcher pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Engine configuration text that does not parse.
    #[error("failed to parse engine configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Engine configuration that cannot be written as TOML.
    #[error("failed to serialize engine configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Engine configuration JSON that does not parse.
    #[error("failed to parse engine configuration JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),

    /// Engine configuration file that cannot be read.
    #[error("failed to read engine configuration '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an unknown-variant error.
    pub fn unknown_variant(tag: impl Into<String>) -> Self {
        Self::UnknownVariant { tag: tag.into() }
    }

    /// Create an invalid-pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a configuration I/O error.
    pub fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }
}
