// src/fetch/file.rs

use std::path::Path;
use tokio::fs;
use tracing::debug;

use crate::error::NetworkError;

pub async fn read_bytes(path: &Path) -> Result<Vec<u8>, NetworkError> {
    let bytes = fs::read(path).await.map_err(|source| NetworkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "read from disk");
    Ok(bytes)
}
