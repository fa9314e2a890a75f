use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float32Type, Float64Type, Int32Type, Int64Type, TimeUnit,
    TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType,
};
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, DataType as _, Reader};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::columns::ColumnMapping;
use super::error::{LoadError, Result};
use super::model::{FieldValue, ObservationRecord, RecordStore};

/// Header names plus rows of cells, before record extraction.
type RawTable = (Vec<String>, Vec<Vec<FieldValue>>);

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the survey dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xls` / `.ods` – first worksheet, header in the first row
/// * `.csv`     – header row with column names (spreadsheet export)
/// * `.json`    – `[{ "SRP_Num": 100, "Scientific_Name": "...", ... }, ...]`
/// * `.parquet` – one column per field; date/timestamp columns are understood
///
/// Fails with [`LoadError::MissingColumns`] when any column named in `mapping`
/// as required is absent.
pub fn load_file(path: &Path, mapping: &ColumnMapping) -> Result<RecordStore> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (columns, rows) = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
        "csv" => read_csv(path)?,
        "json" => {
            let (columns, mut rows) = read_json(path)?;
            epoch_millis_to_dates(&columns, &mut rows, &mapping.observation_date);
            (columns, rows)
        }
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    build_store(columns, rows, mapping)
}

/// Validate headers, type the date column and extract the modelled fields.
pub fn build_store(
    columns: Vec<String>,
    mut rows: Vec<Vec<FieldValue>>,
    mapping: &ColumnMapping,
) -> Result<RecordStore> {
    mapping.check_headers(&columns)?;

    if let Some(date_idx) = columns.iter().position(|c| *c == mapping.observation_date) {
        for row in &mut rows {
            let parsed = match row.get(date_idx) {
                Some(FieldValue::String(s)) => parse_date(s),
                _ => None,
            };
            if let Some(date) = parsed {
                row[date_idx] = FieldValue::Date(date);
            }
        }
    }

    let records: Vec<ObservationRecord> = rows
        .into_iter()
        .map(|fields| ObservationRecord::from_fields(&columns, mapping, fields))
        .collect();

    let unmappable = records.iter().filter(|r| r.coordinates().is_none()).count();
    if unmappable > 0 {
        log::warn!("{unmappable} records lack numeric coordinates and will not be mapped");
    }

    Ok(RecordStore::from_records(columns, records))
}

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Excel's CSV export writes `M/D/YYYY H:MM`; Pandas writes ISO with seconds.
const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse the date formats spreadsheet exports commonly produce. The time of
/// day is dropped; zoned timestamps keep the calendar date of their own offset.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

// ---------------------------------------------------------------------------
// Workbook reader
// ---------------------------------------------------------------------------

/// First worksheet only. Row one holds the column names.
fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::InvalidFormat("workbook has no worksheets".into()))??;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = sheet_rows
        .next()
        .ok_or_else(|| LoadError::InvalidFormat("first worksheet is empty".into()))?
        .iter()
        .map(|c| c.to_string().trim().to_string())
        .collect();

    let rows = sheet_rows
        .map(|row| row.iter().map(workbook_cell).collect())
        .collect();

    Ok((headers, rows))
}

fn workbook_cell(cell: &Data) -> FieldValue {
    match cell {
        Data::Empty | Data::Error(_) => FieldValue::Null,
        Data::String(s) => text_cell(s),
        Data::Int(i) => FieldValue::Integer(*i),
        Data::Float(f) => FieldValue::Float(*f),
        Data::Bool(b) => FieldValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => FieldValue::Date(date),
            None => text_cell(&cell.to_string()),
        },
        Data::DurationIso(s) => text_cell(s),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one observation per row.
fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(guess_field_type).collect());
    }

    Ok((headers, rows))
}

/// Type a text cell. Numbers and booleans are only typed when their text
/// form survives the conversion unchanged, so identifiers like `007` stay text.
fn guess_field_type(s: &str) -> FieldValue {
    if s.is_empty() {
        return FieldValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        if i.to_string() == s {
            return FieldValue::Integer(i);
        }
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() && f.to_string() == s {
            return FieldValue::Float(f);
        }
    }
    if s == "true" || s == "false" {
        return FieldValue::Bool(s == "true");
    }
    FieldValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented array (`df.to_json(orient='records')`). Column order is
/// the order keys are first seen; objects missing a key get a null cell.
/// Dates may be ISO text or the epoch milliseconds Pandas writes by default.
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let objects = root
        .as_array()
        .ok_or_else(|| LoadError::InvalidFormat("expected top-level JSON array".into()))?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in objects.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::InvalidFormat(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = objects
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_field).unwrap_or(FieldValue::Null))
                .collect()
        })
        .collect();

    Ok((headers, rows))
}

/// Integer cells in the date column are epoch milliseconds.
fn epoch_millis_to_dates(columns: &[String], rows: &mut [Vec<FieldValue>], date_column: &str) {
    let Some(idx) = columns.iter().position(|c| c == date_column) else {
        return;
    };
    for row in rows {
        let parsed = match row.get(idx) {
            Some(FieldValue::Integer(ms)) => {
                DateTime::from_timestamp_millis(*ms).map(|dt| dt.date_naive())
            }
            _ => None,
        };
        if let Some(date) = parsed {
            row[idx] = FieldValue::Date(date);
        }
    }
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) if s.is_empty() => FieldValue::Null,
        JsonValue::String(s) => FieldValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => FieldValue::Bool(*b),
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Every Arrow column becomes one source column. Works with files written by
/// both Pandas (`df.to_parquet()`) and Polars (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_field_value(col, row))
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Ok((headers, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_field_value(col: &ArrayRef, row: usize) -> Result<FieldValue> {
    if col.is_null(row) {
        return Ok(FieldValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => text_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => text_cell(col.as_string::<i64>().value(row)),
        DataType::Int32 => FieldValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => FieldValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => FieldValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => FieldValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => FieldValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 => date_cell(col.as_primitive::<Date32Type>().value_as_date(row)),
        DataType::Date64 => date_cell(col.as_primitive::<Date64Type>().value_as_date(row)),
        DataType::Timestamp(unit, _) => {
            let dt = match unit {
                TimeUnit::Second => col.as_primitive::<TimestampSecondType>().value_as_datetime(row),
                TimeUnit::Millisecond => col
                    .as_primitive::<TimestampMillisecondType>()
                    .value_as_datetime(row),
                TimeUnit::Microsecond => col
                    .as_primitive::<TimestampMicrosecondType>()
                    .value_as_datetime(row),
                TimeUnit::Nanosecond => col
                    .as_primitive::<TimestampNanosecondType>()
                    .value_as_datetime(row),
            };
            date_cell(dt.map(|dt| dt.date()))
        }
        _ => text_cell(&array_value_to_string(col, row)?),
    };
    Ok(value)
}

fn text_cell(s: &str) -> FieldValue {
    if s.is_empty() {
        FieldValue::Null
    } else {
        FieldValue::String(s.to_string())
    }
}

fn date_cell(date: Option<NaiveDate>) -> FieldValue {
    date.map(FieldValue::Date).unwrap_or(FieldValue::Null)
}
