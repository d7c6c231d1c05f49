// src/error.rs

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation on {path:?} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} is not a valid {expected} file")]
    Format { path: PathBuf, expected: &'static str },

    #[error("invalid conversion request: {0}")]
    Validation(String),

    #[error("element reference data is malformed near {block:?}")]
    ReferenceMatch { block: String },

    #[error("no reference properties for element '{0}'")]
    UnknownElement(String),

    #[error("'{0}' is not a valid structure identifier")]
    InvalidIdentifier(String),

    #[error("could not fetch structure {id}: {details}")]
    Fetch { id: String, details: String },

    #[error("failed to export scene to {path:?}: {details}")]
    Export { path: PathBuf, details: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn export(path: impl AsRef<Path>, details: impl Into<String>) -> Self {
        Self::Export {
            path: path.as_ref().to_path_buf(),
            details: details.into(),
        }
    }
}
