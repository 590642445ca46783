pub mod clean;

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::settings::Settings;
use crate::table::{self, Table};
use clean::Cell;

const OUTPUT_SUFFIX: &str = "_standardized.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct Standardized {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Header cleanup, website/name repair, numeric coercion and rank ordering.
/// Missing `Name`/`Website`/`Rank` columns just skip their step.
pub fn standardize_table(source: Table) -> Standardized {
    let headers: Vec<String> = source
        .headers
        .iter()
        .map(|h| clean::clean_column_name(h))
        .collect();
    let col = |name: &str| headers.iter().position(|h| h == name);
    let name_col = col("Name");
    let website_col = col("Website");
    let rank_col = col("Rank");

    let revenue_cols: Vec<usize> = indices(&headers, |h| h.contains("Revenue"));
    let growth_cols: Vec<usize> = indices(&headers, |h| h.to_lowercase().contains("growth rate"));

    let mut rows: Vec<Vec<Cell>> = source
        .rows
        .into_iter()
        .map(|mut row| {
            if let Some(n) = name_col.filter(|&n| n < row.len()) {
                if let Some(w) = website_col.filter(|&w| w < row.len()) {
                    if row[w].trim().is_empty() {
                        row[w] = clean::extract_website(&row[n]);
                    }
                }
                row[n] = clean::clean_name(&row[n]);
            }

            let mut cells: Vec<Cell> = row.into_iter().map(Cell::from).collect();
            for &i in &revenue_cols {
                convert(&mut cells, i, clean::clean_currency);
            }
            for &i in &growth_cols {
                convert(&mut cells, i, clean::clean_percentage);
            }
            cells
        })
        .collect();

    if let Some(r) = rank_col {
        rows.sort_by(|a, b| compare_rank(rank_of(a, r), rank_of(b, r)));
    }

    Standardized { headers, rows }
}

fn indices(headers: &[String], pred: impl Fn(&str) -> bool) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| pred(h))
        .map(|(i, _)| i)
        .collect()
}

fn convert(cells: &mut [Cell], i: usize, f: fn(Cell) -> Cell) {
    if let Some(slot) = cells.get_mut(i) {
        let cell = std::mem::replace(slot, Cell::Text(String::new()));
        *slot = f(cell);
    }
}

fn rank_of(row: &[Cell], i: usize) -> Option<f64> {
    match row.get(i)? {
        Cell::Number(n) => Some(*n),
        Cell::Text(t) => t.trim().parse::<f64>().ok().filter(|n| !n.is_nan()),
    }
}

// Unranked rows go last; sort_by is stable so ties keep file order.
fn compare_rank(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}"))
}

/// Standardize one CSV and write `<stem>_standardized.csv` next to it.
pub fn standardize_file(path: &Path, settings: &Settings) -> Result<PathBuf> {
    let source = table::read(path, settings.is_tab_delimited(path))?;
    let rows_in = source.rows.len();
    let standardized = standardize_table(source);

    let out = output_path(path);
    let rows = standardized
        .rows
        .iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect::<Vec<_>>());
    table::write(&out, &standardized.headers, rows)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    info!(input = %path.display(), output = %out.display(), rows = rows_in, "Standardized");
    Ok(out)
}

/// Inputs for the batch: source CSVs only, in file-name order.
pub fn batch_inputs(dir: &Path, settings: &Settings) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let path = entry?.path();
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if path.is_file()
            && name.ends_with(".csv")
            && !name.ends_with(OUTPUT_SUFFIX)
            && name != settings.combined_file
        {
            inputs.push(path);
        }
    }
    inputs.sort();
    Ok(inputs)
}

/// Standardize every source CSV in `dir`, one at a time. The first failure stops the batch.
pub fn standardize_dir(dir: &Path, settings: &Settings) -> Result<Vec<PathBuf>> {
    let inputs = batch_inputs(dir, settings)?;
    if inputs.is_empty() {
        println!("No CSV files to standardize in {}", dir.display());
        return Ok(Vec::new());
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut outputs = Vec::with_capacity(inputs.len());
    for input in &inputs {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name.clone());
        pb.println(format!("Standardizing {}...", name));
        let out = standardize_file(input, settings)?;
        pb.println(format!("Saved standardized file to {}", out.display()));
        outputs.push(out);
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(outputs)
}
