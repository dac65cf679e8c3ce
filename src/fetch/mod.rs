// src/fetch/mod.rs

use futures::{future::BoxFuture, FutureExt};
use reqwest::Client;
use std::{fmt, path::PathBuf};
use url::Url;

use crate::error::NetworkError;

pub mod file;
pub mod http;

/// Where the spreadsheet lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(Url),
    File(PathBuf),
}

impl Source {
    /// `http://` and `https://` locations are fetched over the network,
    /// anything else is treated as a filesystem path.
    pub fn parse(s: &str) -> Self {
        match Url::parse(s) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Source::Http(url),
            _ => Source::File(PathBuf::from(s)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Http(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Obtains the raw bytes of a source.
pub trait Fetcher: Send + Sync {
    fn fetch<'a>(&'a self, source: &'a Source) -> BoxFuture<'a, Result<Vec<u8>, NetworkError>>;
}

/// Fetches HTTP sources with a shared client and reads paths from disk.
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    pub fn new(client: Client) -> Self {
        SourceFetcher { client }
    }
}

impl Fetcher for SourceFetcher {
    fn fetch<'a>(&'a self, source: &'a Source) -> BoxFuture<'a, Result<Vec<u8>, NetworkError>> {
        async move {
            match source {
                Source::Http(url) => http::fetch_bytes(&self.client, url).await,
                Source::File(path) => file::read_bytes(path).await,
            }
        }
        .boxed()
    }
}
