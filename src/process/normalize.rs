// src/process/normalize.rs

use tracing::warn;

use crate::config::DuplicateHeaders;
use crate::decode::Cell;
use crate::error::DecodeError;
use crate::table::NormalizedRow;

/// Aligns raw data rows to the column set.
///
/// The header position of each column is looked up once per ingestion by
/// comparing raw header cells, so `1` and `"1"` are different headers. With
/// duplicate headers the first position wins for every column carrying that
/// header, which is what a per-cell `indexOf` scan over the header gives.
/// Blank header cells never match each other; each reads its own position.
#[derive(Debug, Clone)]
pub struct RowNormalizer {
    positions: Vec<usize>,
}

impl RowNormalizer {
    pub fn new(header: &[Cell], policy: DuplicateHeaders) -> Result<Self, DecodeError> {
        let mut positions = Vec::with_capacity(header.len());

        for (idx, cell) in header.iter().enumerate() {
            let first = if is_blank_header(cell) {
                idx
            } else {
                header[..idx].iter().position(|h| h == cell).unwrap_or(idx)
            };
            if first != idx {
                match policy {
                    DuplicateHeaders::FirstMatch => {
                        warn!(
                            name = %cell,
                            first,
                            duplicate = idx,
                            "duplicate header; column repeats the first match"
                        );
                    }
                    DuplicateHeaders::Reject => {
                        return Err(DecodeError::DuplicateHeader {
                            name: cell.to_string(),
                            first,
                            second: idx,
                        });
                    }
                }
            }
            positions.push(first);
        }

        Ok(RowNormalizer { positions })
    }

    pub fn width(&self) -> usize {
        self.positions.len()
    }

    /// Missing (short row) and empty cells become the empty string; cells
    /// past the header width are ignored.
    pub fn normalize(&self, row: &[Cell]) -> NormalizedRow {
        self.positions
            .iter()
            .map(|&pos| match row.get(pos) {
                Some(cell) if !cell.is_nullish() => cell.clone(),
                _ => Cell::blank(),
            })
            .collect()
    }
}

fn is_blank_header(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => true,
        Cell::Text(t) => t.is_empty(),
        _ => false,
    }
}
