//! @ai:module:intent Define error types for the annotation parser
//! @ai:module:layer domain
//! @ai:module:public_api Error, Result
//! @ai:module:stateless true

use std::path::PathBuf;
use thiserror::Error;

/// @ai:intent Unified error type for all annotation parser operations
#[derive(Error, Debug)]
pub enum Error {
    /// The subject exists but cannot carry a doc comment at all.
    #[error("{subject} cannot provide a doc comment")]
    NoComment { subject: String },

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Invalid value for @{annotation}: {raw}: {source}")]
    InvalidValue {
        annotation: String,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// @ai:intent Attach the owning annotation name to an invalid value error
    pub(crate) fn for_annotation(self, name: &str) -> Self {
        match self {
            Error::InvalidValue { raw, source, .. } => Error::InvalidValue {
                annotation: name.to_string(),
                raw,
                source,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
