// src/decode/mod.rs

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde::Serialize;
use std::{fmt, io::Cursor};
use tracing::debug;

use crate::error::DecodeError;

/// One primitive cell value as produced by the decoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Int(i64),
    Bool(bool),
}

impl Cell {
    /// The empty string, used wherever a normalized row has no value.
    pub fn blank() -> Self {
        Cell::Text(String::new())
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Int(*i),
            Data::Bool(b) => Cell::Bool(*b),
            // serial value, as a raw sheet-to-rows export reports it
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            Data::DurationIso(s) => Cell::Text(s.clone()),
            Data::Error(e) => Cell::Text(e.to_string()),
        }
    }
}

/// The first sheet of a workbook as ordered rows of cells.
/// Row 0 is the header, everything after it is data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        RawSheet {
            name: name.into(),
            rows,
        }
    }

    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }
}

/// Turns a byte buffer into a sheet of rows.
pub trait Decoder: Send + Sync {
    fn decode(&self, bytes: Vec<u8>) -> Result<RawSheet, DecodeError>;
}

/// Reads any format calamine recognises (xlsx, xlsm, xlsb, xls, ods)
/// and keeps only the first sheet.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookDecoder;

impl Decoder for WorkbookDecoder {
    fn decode(&self, bytes: Vec<u8>) -> Result<RawSheet, DecodeError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(DecodeError::NoSheets)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(DecodeError::NoSheets)??;

        let rows: Vec<Vec<Cell>> = range.rows().map(trimmed_row).collect();
        debug!(sheet = %name, rows = rows.len(), "decoded first sheet");
        Ok(RawSheet { name, rows })
    }
}

/// Converts one calamine row, dropping trailing empty cells so that a row is
/// only as long as its last populated cell.
fn trimmed_row(row: &[Data]) -> Vec<Cell> {
    let len = row
        .iter()
        .rposition(|d| !matches!(d, Data::Empty))
        .map_or(0, |i| i + 1);
    row[..len].iter().map(Cell::from).collect()
}
