//! Crate error taxonomy.
//!
//! Structural mismatches during extraction are deliberately NOT errors —
//! absence from the metadata is the signal. Errors here are reserved for
//! the failures the registry must surface: unreadable sources, unwritable
//! or corrupt artifacts, malformed route patterns, and reads before load.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("route metadata has not been loaded")]
    NotLoaded,

    #[error("failed to read declaration manifest {}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse declaration manifest {}", path.display())]
    SourceParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid route pattern {path:?}: {reason}")]
    InvalidPattern { path: String, reason: String },

    #[error("failed to read metadata artifact {}", path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse metadata artifact {}", path.display())]
    ArtifactParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write metadata artifact {}", path.display())]
    ArtifactWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The error value a request pipeline raises to answer with a non-success
/// status: a status code plus an arbitrary JSON payload. Declared errors in
/// controller metadata describe the shapes these carry at runtime.
#[derive(Debug, Clone, Serialize, Error)]
#[error("HTTP error {code}")]
pub struct HttpError {
    pub code: u16,
    pub payload: serde_json::Value,
}

impl HttpError {
    pub fn new(code: u16, payload: serde_json::Value) -> Self {
        Self { code, payload }
    }
}
