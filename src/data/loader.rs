use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use arrow::array::{
    Array, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use chrono::{DateTime, Duration, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CaseSeries, OutbreakDataset, Record};

/// Measure name used for single-measure (wide) inputs.
const WIDE_MEASURE: &str = "cases";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an outbreak dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – long format: `location`, `date`, one column per measure
/// * `.json`    – `[{ "date": "YYYY-MM-DD", "<region>": number, ... }, ...]`
/// * `.parquet` – wide table: `date` column plus one numeric column per region
pub fn load_file(path: &Path) -> Result<OutbreakDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// ISO-8601 calendar date; a full RFC 3339 timestamp is accepted and
/// truncated to its date.
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(s) {
        return Ok(stamp.date_naive());
    }
    bail!("invalid date '{s}' (expected ISO-8601)")
}

// ---------------------------------------------------------------------------
// CSV loader (long format)
// ---------------------------------------------------------------------------

/// CSV layout: header row with `location`, `date` and one column per
/// measure, one row per (region, day):
///
/// ```text
/// location,date,confirmed_cases,suspected_cases,confirmed_deaths
/// Africa,2024-01-01,12,30,1
/// Europe,2024-01-01,3,,0
/// ```
///
/// An empty cell is a day with no data for that measure, which is kept
/// distinct from an explicit `0`.
fn load_csv(path: &Path) -> Result<OutbreakDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let location_idx = headers
        .iter()
        .position(|h| h == "location")
        .context("CSV missing 'location' column")?;
    let date_idx = headers
        .iter()
        .position(|h| h == "date")
        .context("CSV missing 'date' column")?;

    let measure_cols: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != location_idx && *i != date_idx)
        .map(|(i, name)| (i, name.clone()))
        .collect();
    if measure_cols.is_empty() {
        bail!("CSV has no measure columns besides 'location' and 'date'");
    }

    // Pivot rows into one date → (region → value) table per measure.
    let mut tables: Vec<BTreeMap<NaiveDate, BTreeMap<String, f64>>> =
        vec![BTreeMap::new(); measure_cols.len()];

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let region = row.get(location_idx).unwrap_or("").trim();
        if region.is_empty() {
            bail!("CSV row {row_no}: empty location");
        }
        let date = parse_date(row.get(date_idx).unwrap_or(""))
            .with_context(|| format!("CSV row {row_no}"))?;

        for (slot, (col_idx, name)) in measure_cols.iter().enumerate() {
            let cell = row.get(*col_idx).unwrap_or("").trim();
            if cell.is_empty() {
                continue; // no data that day
            }
            let value: f64 = cell.parse().with_context(|| {
                format!("CSV row {row_no}, column '{name}': '{cell}' is not a number")
            })?;
            let replaced = tables[slot]
                .entry(date)
                .or_default()
                .insert(region.to_string(), value);
            if replaced.is_some() {
                bail!("CSV row {row_no}: duplicate observation for {region} on {date}");
            }
        }
    }

    let mut measures = Vec::with_capacity(measure_cols.len());
    for ((_, name), table) in measure_cols.into_iter().zip(tables) {
        let records: Vec<Record> = table
            .into_iter()
            .map(|(date, values)| Record::new(date, values))
            .collect();
        let series = CaseSeries::from_records(records)
            .with_context(|| format!("building series for measure '{name}'"))?;
        measures.push((name, series));
    }

    Ok(OutbreakDataset::from_measures(measures))
}

// ---------------------------------------------------------------------------
// JSON loader (wide records)
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "date": "2024-01-01", "World": 15, "Africa": 12, "Europe": 3 },
///   { "date": "2024-01-02", "World": 18, "Africa": 14 }
/// ]
/// ```
///
/// Any non-numeric field other than `date` is an annotation, not a region
/// value, and is skipped.
fn load_json(path: &Path) -> Result<OutbreakDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let date_field = obj
            .get("date")
            .and_then(|v| v.as_str())
            .with_context(|| format!("Row {i}: missing 'date' string"))?;
        let date = parse_date(date_field).with_context(|| format!("Row {i}"))?;

        let mut values = BTreeMap::new();
        for (key, val) in obj {
            if key == "date" {
                continue;
            }
            if let Some(v) = val.as_f64() {
                values.insert(key.clone(), v);
            }
        }
        records.push(Record::new(date, values));
    }

    let series = CaseSeries::from_records(records)?;
    Ok(OutbreakDataset::from_measures(vec![(
        WIDE_MEASURE.to_string(),
        series,
    )]))
}

// ---------------------------------------------------------------------------
// Parquet loader (wide table)
// ---------------------------------------------------------------------------

/// Load a Parquet file containing a wide daily table.
///
/// Expected schema:
/// - `date`: Utf8 (ISO-8601) or Date32
/// - one numeric column per region; nulls are days without data
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<OutbreakDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let date_idx = schema
            .index_of("date")
            .map_err(|_| anyhow!("Parquet file missing 'date' column"))?;
        let date_col = batch.column(date_idx);

        // Every other column is a candidate region.
        let region_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != date_idx)
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..batch.num_rows() {
            let date = extract_date(date_col, row)
                .with_context(|| format!("Row {row}: failed to read 'date'"))?;

            let mut values = BTreeMap::new();
            for (col_idx, name) in &region_cols {
                if let Some(v) = extract_count(batch.column(*col_idx), row) {
                    values.insert(name.clone(), v);
                }
            }
            records.push(Record::new(date, values));
        }
    }

    let series = CaseSeries::from_records(records)?;
    Ok(OutbreakDataset::from_measures(vec![(
        WIDE_MEASURE.to_string(),
        series,
    )]))
}

// -- Parquet / Arrow helpers --

/// Read the date cell of a row from a Utf8 or Date32 column.
fn extract_date(col: &Arc<dyn Array>, row: usize) -> Result<NaiveDate> {
    if col.is_null(row) {
        bail!("null date");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            parse_date(arr.value(row))
        }
        DataType::Date32 => {
            // Date32 is days since the Unix epoch.
            let arr = col
                .as_any()
                .downcast_ref::<Date32Array>()
                .context("expected Date32Array")?;
            Ok(NaiveDate::default() + Duration::days(i64::from(arr.value(row))))
        }
        other => bail!("'date' column has type {other:?}, expected Utf8 or Date32"),
    }
}

/// Read a region's count from a numeric column; `None` for nulls and for
/// non-numeric columns (those are not region values).
fn extract_count(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| f64::from(a.value(row))),
        _ => None,
    }
}
