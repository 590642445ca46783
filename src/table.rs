use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use tracing::{debug, warn};

use crate::error::TableError;

/// A CSV held in memory: header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parse delimited text with a header row. Short records are padded with empty
/// cells to the header width; a record wider than the header is an error.
pub fn parse(text: &str, delimiter: u8) -> Result<Table, TableError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(text.as_bytes()));

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.len() > width {
            return Err(TableError::TooManyFields {
                line: record.position().map_or(0, |p| p.line()),
                expected: width,
                found: record.len(),
            });
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }
    Ok(Table { headers, rows })
}

/// Read a CSV, comma-delimited unless `tab` is set. A comma parse that fails
/// (malformed, or a row wider than the header) is retried as tab-delimited.
pub fn read(path: &Path, tab: bool) -> Result<Table> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if tab {
        return parse(&text, b'\t')
            .with_context(|| format!("Failed to parse {} as TSV", path.display()));
    }

    match parse(&text, b',') {
        Ok(table) => Ok(table),
        Err(e) => {
            warn!("{}: comma parse failed ({}), retrying with tabs", path.display(), e);
            parse(&text, b'\t')
                .with_context(|| format!("Failed to parse {} as CSV or TSV", path.display()))
        }
    }
}

/// Write `header` then `rows` as comma-separated UTF-8, quoting only where needed.
pub fn write<H, R, C>(path: &Path, header: &[H], rows: R) -> Result<usize>
where
    H: AsRef<str>,
    R: IntoIterator,
    R::Item: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut wtr = WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record(header.iter().map(|h| h.as_ref()))?;
    let mut count = 0;
    for row in rows {
        wtr.write_record(row)?;
        count += 1;
    }
    wtr.flush()?;
    debug!(rows = count, path = %path.display(), "CSV written");
    Ok(count)
}
