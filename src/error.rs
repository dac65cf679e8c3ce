// src/error.rs

use std::path::PathBuf;

/// Fetching the raw file content did not succeed.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The fetched bytes could not be turned into a usable sheet.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("not a readable spreadsheet: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook contains no sheets")]
    NoSheets,

    /// Only raised when duplicate headers are configured to be rejected.
    #[error("duplicate header {name:?} at columns {first} and {second}")]
    DuplicateHeader {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("decoder task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Everything that can abort an ingestion.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
