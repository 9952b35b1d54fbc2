use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{LaunchDataset, LaunchRecord, Outcome};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Accepted header names per field: the original export's header first,
/// then the snake-case alias.
const SITE_COLUMN: [&str; 2] = ["Launch Site", "site"];
const PAYLOAD_COLUMN: [&str; 2] = ["Payload Mass (kg)", "payload_mass_kg"];
const CLASS_COLUMN: [&str; 2] = ["class", "outcome"];
const BOOSTER_COLUMN: [&str; 2] = ["Booster Version Category", "booster_category"];

fn find_column<'a, I>(headers: I, names: &[&str]) -> Result<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .position(|h| names.contains(&h.trim()))
        .with_context(|| format!("missing '{}' column", names[0]))
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one launch per row (the dashboard's native export)
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – one column per field
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} launches from {} ({} sites, payload bounds {:?})",
        dataset.len(),
        path.display(),
        dataset.sites().len(),
        dataset.payload_bounds()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, matched by name so column
/// order does not matter.  Columns other than the four launch fields
/// (flight number, booster version, a pandas index, ...) are ignored.
fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let site_idx = find_column(headers.iter(), &SITE_COLUMN)?;
    let payload_idx = find_column(headers.iter(), &PAYLOAD_COLUMN)?;
    let class_idx = find_column(headers.iter(), &CLASS_COLUMN)?;
    let booster_idx = find_column(headers.iter(), &BOOSTER_COLUMN)?;

    let mut records = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV record {}", i + 1))?;
        // File line as an editor shows it (header is line 1).
        let line = record.position().map_or(i as u64 + 2, |p| p.line());
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let payload = parse_number(field(payload_idx))
            .with_context(|| format!("CSV line {line}, '{}'", PAYLOAD_COLUMN[0]))?;
        let class = parse_number(field(class_idx))
            .with_context(|| format!("CSV line {line}, '{}'", CLASS_COLUMN[0]))?;

        records.push(
            build_record(field(site_idx), payload, class, field(booster_idx))
                .with_context(|| format!("CSV line {line}"))?,
        );
    }

    Ok(LaunchDataset::from_records(records))
}

fn parse_number(s: &str) -> Result<f64> {
    s.parse::<f64>()
        .with_context(|| format!("'{s}' is not a number"))
}

fn build_record(site: &str, payload: f64, class: f64, booster: &str) -> Result<LaunchRecord> {
    if site.is_empty() {
        bail!("empty launch site");
    }
    let outcome = Outcome::from_class(class)?;
    LaunchRecord::new(site, payload, outcome, booster)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One element of the records-oriented JSON array
/// (`df.to_json(orient='records')`).
#[derive(Debug, Deserialize)]
struct JsonRecord {
    #[serde(rename = "Launch Site", alias = "site")]
    site: String,
    #[serde(rename = "Payload Mass (kg)", alias = "payload_mass_kg")]
    payload_mass_kg: f64,
    #[serde(rename = "class", alias = "outcome")]
    class: f64,
    #[serde(rename = "Booster Version Category", alias = "booster_category")]
    booster_category: String,
}

fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let records = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let row_no = i + 1;
            let rec: JsonRecord = serde_json::from_value(row.clone())
                .with_context(|| format!("Row {row_no} is not a launch record"))?;
            build_record(&rec.site, rec.payload_mass_kg, rec.class, &rec.booster_category)
                .with_context(|| format!("Row {row_no}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of launch records.
///
/// Expected schema (column names as for CSV):
/// - site, booster category: Utf8 or LargeUtf8
/// - payload mass, class: Int32, Int64, Float32 or Float64
///
/// Nulls in any of the four columns are rejected.
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        records.extend(batch_records(&batch, row_offset)?);
        row_offset += batch.num_rows();
    }

    Ok(LaunchDataset::from_records(records))
}

fn batch_records(batch: &RecordBatch, row_offset: usize) -> Result<Vec<LaunchRecord>> {
    let schema = batch.schema();
    let names = || schema.fields().iter().map(|f| f.name().as_str());

    let site_col = batch.column(find_column(names(), &SITE_COLUMN)?);
    let payload_col = batch.column(find_column(names(), &PAYLOAD_COLUMN)?);
    let class_col = batch.column(find_column(names(), &CLASS_COLUMN)?);
    let booster_col = batch.column(find_column(names(), &BOOSTER_COLUMN)?);

    (0..batch.num_rows())
        .map(|row| {
            let row_no = row_offset + row + 1;
            let site = extract_string(site_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{}'", SITE_COLUMN[0]))?;
            let payload = extract_f64(payload_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{}'", PAYLOAD_COLUMN[0]))?;
            let class = extract_f64(class_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{}'", CLASS_COLUMN[0]))?;
            let booster = extract_string(booster_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{}'", BOOSTER_COLUMN[0]))?;
            build_record(&site, payload, class, &booster).with_context(|| format!("Row {row_no}"))
        })
        .collect()
}

// -- Arrow helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value");
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("Expected a string column, got {other:?}"),
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    value.context("column type does not match its array")
}
