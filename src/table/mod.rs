// src/table/mod.rs

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};

use crate::decode::Cell;

/// One column of the table: the header text and its display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub label: String,
}

/// A data row aligned to the column set, one cell per column.
pub type NormalizedRow = Vec<Cell>;

/// Immutable view of the table at one point in time.
///
/// Rows are stored as the batches they were published in; cloning a
/// snapshot only clones the `Arc`s, so a reader holding an old snapshot
/// keeps a consistent prefix while the writer keeps appending.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    columns: Arc<[ColumnDescriptor]>,
    chunks: Vec<Arc<[NormalizedRow]>>,
    row_count: usize,
    processing: bool,
}

impl TableSnapshot {
    fn loading() -> Self {
        TableSnapshot {
            columns: Arc::from(Vec::new()),
            chunks: Vec::new(),
            row_count: 0,
            processing: true,
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// A table can be shown as soon as it has columns, even while rows are
    /// still arriving.
    pub fn is_ready(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn rows(&self) -> impl Iterator<Item = &NormalizedRow> + '_ {
        self.chunks.iter().flat_map(|c| c.iter())
    }

    pub fn row(&self, mut index: usize) -> Option<&NormalizedRow> {
        for chunk in &self.chunks {
            if index < chunk.len() {
                return Some(&chunk[index]);
            }
            index -= chunk.len();
        }
        None
    }

    /// Sizes of the published batches, in publication order.
    pub fn chunk_sizes(&self) -> Vec<usize> {
        self.chunks.iter().map(|c| c.len()).collect()
    }

    pub fn to_rows(&self) -> Vec<NormalizedRow> {
        self.rows().cloned().collect()
    }

    /// Rows of the 0-based page `index`; empty past the last page.
    pub fn page(&self, index: usize, per_page: usize) -> Vec<&NormalizedRow> {
        if per_page == 0 {
            return Vec::new();
        }
        self.rows()
            .skip(index.saturating_mul(per_page))
            .take(per_page)
            .collect()
    }

    pub fn page_count(&self, per_page: usize) -> usize {
        if per_page == 0 {
            return 0;
        }
        self.row_count.div_ceil(per_page)
    }
}

/// The single writer of a table. Ingestion owns it; everything else
/// observes through a [`TableWatcher`].
///
/// Dropping the writer clears the processing flag if it is still set, so an
/// aborted ingestion still looks finished to observers.
#[derive(Debug)]
pub struct TableState {
    tx: watch::Sender<TableSnapshot>,
    columns_set: bool,
}

impl TableState {
    /// A fresh table: no columns, no rows, processing.
    pub fn new() -> (TableState, TableWatcher) {
        let (tx, rx) = watch::channel(TableSnapshot::loading());
        (
            TableState {
                tx,
                columns_set: false,
            },
            TableWatcher { rx },
        )
    }

    /// Columns are set once, even when the first set is empty; later calls
    /// are ignored.
    pub fn set_columns(&mut self, columns: Vec<ColumnDescriptor>) {
        if self.columns_set {
            warn!("columns already set; ignoring");
            return;
        }
        self.columns_set = true;
        self.tx.send_if_modified(|s| {
            s.columns = Arc::from(columns);
            s.is_ready()
        });
    }

    /// Publishes one batch of rows after everything appended so far.
    pub fn append(&mut self, batch: Vec<NormalizedRow>) {
        if batch.is_empty() {
            return;
        }
        let len = batch.len();
        self.tx.send_modify(|s| {
            s.chunks.push(Arc::from(batch));
            s.row_count += len;
        });
        debug!(rows = len, total = self.tx.borrow().row_count, "published batch");
    }

    /// Clears the processing flag. Only the first call notifies observers.
    pub fn finish(&mut self) {
        self.tx.send_if_modified(|s| std::mem::replace(&mut s.processing, false));
    }

    pub fn snapshot(&self) -> TableSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> TableWatcher {
        TableWatcher {
            rx: self.tx.subscribe(),
        }
    }
}

impl Drop for TableState {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Read side of a table.
#[derive(Debug, Clone)]
pub struct TableWatcher {
    rx: watch::Receiver<TableSnapshot>,
}

impl TableWatcher {
    pub fn current(&self) -> TableSnapshot {
        self.rx.borrow().clone()
    }

    /// Waits for the next publication. Intermediate publications may be
    /// coalesced. Returns `None` once the writer is gone.
    pub async fn changed(&mut self) -> Option<TableSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Waits until ingestion has completed or aborted.
    pub async fn finished(&mut self) -> TableSnapshot {
        if let Ok(s) = self.rx.wait_for(|s| !s.processing).await {
            return s.clone();
        }
        self.rx.borrow().clone()
    }

    pub fn into_stream(self) -> WatchStream<TableSnapshot> {
        WatchStream::new(self.rx)
    }
}
