// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, num::NonZeroUsize, path::Path};

/// Rows normalized and appended per scheduling increment.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(n) => n,
    None => unreachable!(),
};
pub const DEFAULT_ROWS_PER_PAGE: usize = 15;
pub const DEFAULT_SOURCE: &str = "data.xlsx";

/// Top-level configuration, usually read from a YAML file and then
/// overridden from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// URL (`http`/`https`) or filesystem path of the spreadsheet.
    pub source: String,
    pub ingest: IngestConfig,
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: DEFAULT_SOURCE.to_string(),
            ingest: IngestConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).context("parsing YAML config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in config file {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    pub chunk_size: NonZeroUsize,
    pub duplicate_headers: DuplicateHeaders,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            duplicate_headers: DuplicateHeaders::default(),
        }
    }
}

/// What to do when two header cells carry the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateHeaders {
    /// Every column with a repeated name reads the first matching header position.
    #[default]
    FirstMatch,
    /// Abort ingestion with a decode error.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub title: String,
    pub pagination: bool,
    pub rows_per_page: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            title: "Records".to_string(),
            pagination: true,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl DisplayConfig {
    /// Rows shown on one page; `None` when everything goes on a single page.
    pub fn page_len(&self) -> Option<usize> {
        if self.pagination && self.rows_per_page > 0 {
            Some(self.rows_per_page)
        } else {
            None
        }
    }
}
