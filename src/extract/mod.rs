pub mod blob;
pub mod rows;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::schema::DatasetSchema;
use crate::table;

/// Result of one extraction run. `NoData` is the soft failure: nothing was written.
#[derive(Debug, PartialEq)]
pub enum Extraction {
    Written { rows: usize, path: PathBuf },
    NoData,
}

/// HTML page with the table serialized into a `chartData: "…"` script literal.
pub fn html_to_csv(input: &Path, output: &Path, schema: &DatasetSchema) -> Result<Extraction> {
    let html = read_input(input)?;
    let Some(raw) = blob::locate_in_html(&html) else {
        warn!(input = %input.display(), "chartData marker not found");
        println!("Could not find the chartData in the HTML file.");
        return Ok(Extraction::NoData);
    };
    emit(input, output, schema, &raw)
}

/// JSON API response with the same serialized table under `key_path`.
pub fn json_to_csv(
    input: &Path,
    output: &Path,
    schema: &DatasetSchema,
    key_path: &[String],
) -> Result<Extraction> {
    let json = read_input(input)?;
    let raw = blob::locate_in_json(&json, key_path)
        .with_context(|| format!("Failed to locate table in {}", input.display()))?;
    emit(input, output, schema, &raw)
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn emit(input: &Path, output: &Path, schema: &DatasetSchema, raw: &str) -> Result<Extraction> {
    let Some(rows) = blob_to_rows(raw, schema) else {
        warn!(input = %input.display(), "blob is empty");
        println!("No data found to write to CSV.");
        return Ok(Extraction::NoData);
    };

    let count = table::write(output, &schema.headers, rows)?;
    info!(year = schema.year, rows = count, output = %output.display(), "Extracted table");
    println!(
        "Successfully parsed {} and saved to {}",
        input.display(),
        output.display()
    );
    Ok(Extraction::Written {
        rows: count,
        path: output.to_path_buf(),
    })
}

/// Decode the blob and reshape every data line. The blob's own header line
/// (first cell not a rank number) is dropped in favour of the schema header.
pub fn blob_to_rows(raw: &str, schema: &DatasetSchema) -> Option<Vec<Vec<String>>> {
    let text = blob::unescape(raw);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut lines = text.split('\n').peekable();
    if lines.peek().is_some_and(|first| is_header_line(first)) {
        lines.next();
    }

    Some(
        lines
            .map(|line| rows::restructure(rows::split_line(line), schema))
            .collect(),
    )
}

fn is_header_line(line: &str) -> bool {
    let first = line.split('\t').next().unwrap_or("").trim();
    first.parse::<u32>().is_err()
}
