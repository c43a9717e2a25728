//! CSV input and JSON output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use ndarray::{Array1, Array2};
use serde::Serialize;

/// Feature matrix and target read from a CSV table.
#[derive(Debug)]
pub struct Table {
    /// Feature column names, in matrix column order.
    pub features: Vec<String>,
    /// One row per CSV record.
    pub x: Array2<f64>,
    /// Target column.
    pub y: Array1<f64>,
}

fn parse_cell(field: &str, column: &str, row: usize) -> Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .with_context(|| format!("row {row}, column {column:?}: {field:?} is not a number"))
}

fn open(path: &Path) -> Result<csv::Reader<File>> {
    csv::Reader::from_path(path).with_context(|| format!("failed to open CSV: {}", path.display()))
}

/// Reads one numeric column of a headed CSV file.
pub fn read_series(path: &Path, column: &str) -> Result<Vec<f64>> {
    let mut reader = open(path)?;
    let headers = reader.headers()?.clone();
    let Some(index) = headers.iter().position(|h| h == column) else {
        bail!(
            "column {column:?} not found in {} (available: {:?})",
            path.display(),
            headers.iter().collect::<Vec<_>>()
        );
    };

    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read CSV row {row}"))?;
        let field = record.get(index).unwrap_or_default();
        values.push(parse_cell(field, column, row)?);
    }
    if values.is_empty() {
        bail!("{} has no data rows", path.display());
    }
    Ok(values)
}

/// Reads a headed CSV file whose columns other than `target` are features.
pub fn read_table(path: &Path, target: &str) -> Result<Table> {
    let mut reader = open(path)?;
    let headers = reader.headers()?.clone();
    let Some(target_index) = headers.iter().position(|h| h == target) else {
        bail!("target column {target:?} not found in {}", path.display());
    };
    let features: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != target_index)
        .map(|(_, h)| h.to_string())
        .collect();
    if features.is_empty() {
        bail!("{} has no feature columns besides {target:?}", path.display());
    }

    let mut cells = Vec::new();
    let mut y = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("failed to read CSV row {row}"))?;
        for (i, (name, field)) in headers.iter().zip(record.iter()).enumerate() {
            let value = parse_cell(field, name, row)?;
            if i == target_index {
                y.push(value);
            } else {
                cells.push(value);
            }
        }
    }
    if y.is_empty() {
        bail!("{} has no data rows", path.display());
    }

    let x = Array2::from_shape_vec((y.len(), features.len()), cells)
        .context("CSV rows have inconsistent lengths")?;
    Ok(Table {
        features,
        x,
        y: Array1::from(y),
    })
}

/// Writes `value` as pretty JSON to `output`, or to stdout when `None`.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
