// src/process/mod.rs

use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::IngestConfig;
use crate::decode::{Decoder, RawSheet};
use crate::error::{DecodeError, IngestError};
use crate::fetch::{Fetcher, Source};
use crate::table::{TableState, TableWatcher};

pub mod chunk;
pub mod columns;
pub mod normalize;

pub use chunk::{ChunkScheduler, ChunkSummary};
pub use columns::derive_columns;
pub use normalize::RowNormalizer;

/// How an ingestion ended. The table's processing flag is clear in every case.
#[derive(Debug)]
pub enum IngestOutcome {
    Completed(ChunkSummary),
    /// The sheet or its header row was empty; no table is shown.
    NoColumns,
    Failed(IngestError),
}

/// fetch → decode → columns → chunked rows.
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    decoder: Arc<dyn Decoder>,
    config: IngestConfig,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, decoder: Arc<dyn Decoder>, config: IngestConfig) -> Self {
        Pipeline {
            fetcher,
            decoder,
            config,
        }
    }

    /// Runs one ingestion into `table`. Errors are logged here and reported
    /// in the outcome; nothing is retried.
    #[tracing::instrument(level = "info", skip_all, fields(source = %source))]
    pub async fn run(&self, source: &Source, mut table: TableState) -> IngestOutcome {
        let outcome = match self.ingest(source, &mut table).await {
            Ok(Some(summary)) => {
                info!(
                    rows = summary.rows,
                    chunks = summary.chunks,
                    elapsed = ?summary.elapsed,
                    "ingestion complete"
                );
                IngestOutcome::Completed(summary)
            }
            Ok(None) => IngestOutcome::NoColumns,
            Err(e) => {
                error!(
                    rows_kept = table.snapshot().row_count(),
                    "error fetching or processing the spreadsheet: {}", e
                );
                IngestOutcome::Failed(e)
            }
        };
        table.finish();
        outcome
    }

    /// Starts [`run`](Self::run) on the runtime and hands back the read side
    /// of the new table. Aborting the task stops ingestion at the next chunk
    /// boundary and leaves the table finished.
    pub fn spawn(self: Arc<Self>, source: Source) -> (JoinHandle<IngestOutcome>, TableWatcher) {
        let (table, watcher) = TableState::new();
        let handle = tokio::spawn(async move { self.run(&source, table).await });
        (handle, watcher)
    }

    async fn ingest(
        &self,
        source: &Source,
        table: &mut TableState,
    ) -> Result<Option<ChunkSummary>, IngestError> {
        info!("fetching spreadsheet");
        let start = Instant::now();
        let bytes = self.fetcher.fetch(source).await?;
        info!(bytes = bytes.len(), elapsed = ?start.elapsed(), "spreadsheet fetched");

        let sheet = self.decode(bytes).await?;
        info!(sheet = %sheet.name, rows = sheet.rows.len(), "decoded");

        let header = sheet.header().unwrap_or(&[]);
        let columns = derive_columns(header);
        if columns.is_empty() {
            warn!(sheet = %sheet.name, "header row is empty; nothing to show");
            return Ok(None);
        }
        let normalizer = RowNormalizer::new(header, self.config.duplicate_headers)?;
        info!(columns = columns.len(), "columns ready");
        table.set_columns(columns);

        let scheduler = ChunkScheduler::new(self.config.chunk_size);
        let summary = scheduler
            .run(sheet.data_rows(), &normalizer, table)
            .await;
        Ok(Some(summary))
    }

    /// Decoding is CPU bound, so it goes to the blocking pool.
    async fn decode(&self, bytes: Vec<u8>) -> Result<RawSheet, DecodeError> {
        let decoder = Arc::clone(&self.decoder);
        tokio::task::spawn_blocking(move || decoder.decode(bytes)).await?
    }
}
