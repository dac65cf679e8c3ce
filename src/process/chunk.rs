// src/process/chunk.rs

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tracing::debug;

use super::normalize::RowNormalizer;
use crate::config::DEFAULT_CHUNK_SIZE;
use crate::decode::Cell;
use crate::table::TableState;

/// What one scheduler run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSummary {
    pub chunks: usize,
    pub rows: usize,
    pub elapsed: Duration,
}

/// Feeds data rows into a table in batches of at most `chunk_size`,
/// yielding to the runtime between batches so that other tasks on the
/// same thread (rendering, input) get to run while a large sheet loads.
#[derive(Debug, Clone, Copy)]
pub struct ChunkScheduler {
    chunk_size: NonZeroUsize,
}

impl Default for ChunkScheduler {
    fn default() -> Self {
        ChunkScheduler::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ChunkScheduler {
    pub fn new(chunk_size: NonZeroUsize) -> Self {
        ChunkScheduler { chunk_size }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size.get()
    }

    /// Normalizes and publishes `rows` batch by batch, then clears the
    /// table's processing flag.
    ///
    /// Batch *k+1* is only started after batch *k* has been published, and
    /// each batch is published in a single append, so observers only ever see
    /// whole batches in source order.
    pub async fn run(
        &self,
        rows: &[Vec<Cell>],
        normalizer: &RowNormalizer,
        table: &mut TableState,
    ) -> ChunkSummary {
        let started = Instant::now();
        let size = self.chunk_size.get();
        let total = rows.len();
        let mut start = 0;
        let mut chunks = 0;

        while start < total {
            let end = start.saturating_add(size).min(total);
            let batch: Vec<_> = rows[start..end]
                .iter()
                .map(|row| normalizer.normalize(row))
                .collect();
            table.append(batch);
            chunks += 1;
            debug!(chunk = chunks, start, end, total, "appended chunk");

            start = end;
            if start < total {
                tokio::task::yield_now().await;
            }
        }

        table.finish();
        ChunkSummary {
            chunks,
            rows: total,
            elapsed: started.elapsed(),
        }
    }
}
