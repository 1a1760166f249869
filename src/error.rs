//! Error types for packaging operations

use std::path::PathBuf;
use thiserror::Error;

/// Packaging operation errors
#[derive(Error, Debug)]
pub enum CapsuleError {
    /// No entrypoint was given on the command line or in the options
    #[error("Entrypoint file was not specified")]
    MissingEntrypoint,

    /// The entrypoint could not be resolved to an absolute file URL
    #[error("Invalid entrypoint: {0}")]
    InvalidEntrypoint(String),

    /// The runtime stub is missing or unreadable
    #[error("Failed to read runtime stub {path}: {source}")]
    StubRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bundle collaborator could not resolve the module graph
    #[error("Bundle resolution failed: {0}")]
    Bundle(String),

    /// Offset arithmetic overflowed while laying out the image
    #[error("Image layout exceeds the 64-bit offset range")]
    OffsetOverflow,

    /// The trailer is missing, truncated, or carries the wrong magic
    #[error("Invalid magic number in trailer")]
    CorruptTrailer,

    /// Writing the output image failed
    #[error("Failed to write output image {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CapsuleError>;
