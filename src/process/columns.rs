// src/process/columns.rs

use crate::decode::Cell;
use crate::table::ColumnDescriptor;

/// Builds one column per header cell, in header order. Header text is used
/// verbatim as the name; the label swaps underscores for spaces.
pub fn derive_columns(header: &[Cell]) -> Vec<ColumnDescriptor> {
    header
        .iter()
        .map(|cell| {
            let name = cell.to_string();
            ColumnDescriptor {
                label: label_for(&name),
                name,
            }
        })
        .collect()
}

pub fn label_for(name: &str) -> String {
    name.replace('_', " ")
}
