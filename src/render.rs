// src/render.rs

use prettytable::{format, Cell as PtCell, Row, Table};

use crate::config::DisplayConfig;
use crate::table::TableSnapshot;

/// Text shown next to the table for the current ingestion state.
pub fn render_status(snapshot: &TableSnapshot) -> String {
    match (snapshot.is_ready(), snapshot.is_processing()) {
        (false, true) => "Loading...".to_string(),
        (false, false) => "Nothing to show.".to_string(),
        (true, true) => format!("{} rows so far. Loading more data...", snapshot.row_count()),
        (true, false) => format!(
            "{} rows, {} columns.",
            snapshot.row_count(),
            snapshot.columns().len()
        ),
    }
}

/// Number of pages the renderer would offer for this snapshot.
pub fn page_count(snapshot: &TableSnapshot, display: &DisplayConfig) -> usize {
    match display.page_len() {
        Some(per_page) => snapshot.page_count(per_page),
        None => usize::from(snapshot.row_count() > 0),
    }
}

/// Renders the 0-based `page` as a boxed text table headed by the column
/// labels. A page past the end shows the last page instead. Returns the
/// status line alone while the table has no columns.
pub fn render_page(snapshot: &TableSnapshot, display: &DisplayConfig, page: usize) -> String {
    if !snapshot.is_ready() {
        return render_status(snapshot);
    }

    let pages = page_count(snapshot, display).max(1);
    let page = page.min(pages - 1);
    let rows = match display.page_len() {
        Some(per_page) => snapshot.page(page, per_page),
        None if page == 0 => snapshot.rows().collect(),
        None => Vec::new(),
    };

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(
        snapshot
            .columns()
            .iter()
            .map(|c| PtCell::new(&c.label))
            .collect(),
    ));
    for row in rows {
        table.add_row(Row::new(
            row.iter().map(|cell| PtCell::new(&cell.to_string())).collect(),
        ));
    }

    format!(
        "{}\n{}Page {} of {}. {}\n",
        display.title,
        table,
        page + 1,
        pages,
        render_status(snapshot)
    )
}

/// The page as it stands mid-ingestion, or `None` while there is nothing to
/// draw yet.
pub fn render_progress(
    snapshot: &TableSnapshot,
    display: &DisplayConfig,
    page: usize,
) -> Option<String> {
    snapshot
        .is_ready()
        .then(|| render_page(snapshot, display, page))
}
