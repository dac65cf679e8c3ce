// src/testutil.rs
//
// Shared fixtures for unit tests.

use futures::{future::BoxFuture, FutureExt};
use std::io::{Cursor, Write};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use zip::write::FileOptions;
use zip::CompressionMethod;

use crate::decode::{Cell, Decoder, RawSheet};
use crate::error::{DecodeError, NetworkError};
use crate::fetch::{Fetcher, Source};

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sheetfeed=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Builds a raw sheet from string literals; `""` becomes an empty cell.
pub fn sheet(rows: &[&[&str]]) -> RawSheet {
    RawSheet::new(
        "Sheet1",
        rows.iter()
            .map(|r| {
                r.iter()
                    .map(|s| if s.is_empty() { Cell::Empty } else { Cell::from(*s) })
                    .collect()
            })
            .collect(),
    )
}

pub fn text_rows(rows: &[&[&str]]) -> Vec<Vec<Cell>> {
    rows.iter()
        .map(|r| r.iter().map(|s| Cell::from(*s)).collect())
        .collect()
}

/// Header plus `n` numbered data rows: `["id", "name"]`, `["1", "row 1"]`, ...
pub fn numbered_sheet(n: usize) -> RawSheet {
    let mut rows = vec![vec![Cell::from("id"), Cell::from("name")]];
    rows.extend((1..=n).map(|i| vec![Cell::from(i.to_string()), Cell::from(format!("row {i}"))]));
    RawSheet::new("Sheet1", rows)
}

/// Assembles a minimal single-sheet xlsx workbook with inline strings.
/// Empty strings are left out of the sheet entirely.
pub fn xlsx_bytes(rows: &[&[&str]]) -> Vec<u8> {
    let mut sheet_xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        sheet_xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            sheet_xml.push_str(&format!(
                r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                column_letters(c),
                r + 1,
                escape_xml(value)
            ));
        }
        sheet_xml.push_str("</row>");
    }
    sheet_xml.push_str("</sheetData></worksheet>");

    let parts: [(&str, &str); 5] = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#,
        ),
        (
            "_rels/.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Sheet1" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
        ),
        ("xl/worksheets/sheet1.xml", sheet_xml.as_str()),
    ];

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in parts {
        zip.start_file(name, options).expect("start zip entry");
        zip.write_all(body.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish zip").into_inner()
}

fn column_letters(mut idx: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    out.reverse();
    String::from_utf8(out).expect("ascii column letters")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Serves canned bytes, or fails with the given HTTP status.
pub enum MemoryFetcher {
    Bytes(Vec<u8>),
    Status(u16),
}

impl Fetcher for MemoryFetcher {
    fn fetch<'a>(&'a self, source: &'a Source) -> BoxFuture<'a, Result<Vec<u8>, NetworkError>> {
        async move {
            match self {
                MemoryFetcher::Bytes(b) => Ok(b.clone()),
                MemoryFetcher::Status(code) => Err(NetworkError::Status {
                    url: source.to_string(),
                    status: reqwest::StatusCode::from_u16(*code).expect("valid status"),
                }),
            }
        }
        .boxed()
    }
}

/// Ignores the bytes and hands back a prepared sheet.
pub struct StaticDecoder(pub RawSheet);

impl Decoder for StaticDecoder {
    fn decode(&self, _bytes: Vec<u8>) -> Result<RawSheet, DecodeError> {
        Ok(self.0.clone())
    }
}

#[test]
fn column_letters_wrap() {
    assert_eq!(column_letters(0), "A");
    assert_eq!(column_letters(25), "Z");
    assert_eq!(column_letters(26), "AA");
    assert_eq!(column_letters(27), "AB");
}
