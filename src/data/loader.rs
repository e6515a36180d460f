use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DataLoadError;
use super::model::{
    LaunchDataset, LaunchRecord, Outcome, COL_BOOSTER_CATEGORY, COL_BOOSTER_VERSION, COL_CLASS,
    COL_FLIGHT_NUMBER, COL_LAUNCH_SITE, COL_PAYLOAD_MASS, REQUIRED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – headed table, the format the SpaceX export ships in
/// * `.json`    – `[{ "Launch Site": "...", "class": 1, ... }, ...]`
/// * `.parquet` – same column names, strings and numbers of any width
pub fn load_file(path: &Path) -> Result<LaunchDataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => read_csv(open(path)?)?,
        "json" => read_json(open(path)?)?,
        "parquet" | "pq" => read_parquet(open(path)?)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    let dataset = LaunchDataset::from_records(records)?;
    log::info!(
        "Loaded {} launches from {} ({} sites, payload {}..={} kg)",
        dataset.len(),
        path.display(),
        dataset.sites().len(),
        dataset.min_payload(),
        dataset.max_payload()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one launch per row.
/// Columns beyond those in [`LaunchRecord`] are ignored.
pub fn read_csv<R: Read>(input: R) -> Result<Vec<LaunchRecord>, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DataLoadError::MissingColumn(required.to_string()));
        }
    }

    let records = reader
        .deserialize::<LaunchRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
pub fn read_json<R: Read>(input: R) -> Result<Vec<LaunchRecord>, DataLoadError> {
    Ok(serde_json::from_reader(input)?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load launches from a Parquet file.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): string columns may be Utf8 or
/// LargeUtf8, numeric columns any of Int32/Int64/Float32/Float64.
pub fn read_parquet(file: File) -> Result<Vec<LaunchRecord>, DataLoadError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        let site_col = required_column(&batch, COL_LAUNCH_SITE)?;
        let payload_col = required_column(&batch, COL_PAYLOAD_MASS)?;
        let class_col = required_column(&batch, COL_CLASS)?;
        let category_col = required_column(&batch, COL_BOOSTER_CATEGORY)?;
        let flight_col = batch.column_by_name(COL_FLIGHT_NUMBER);
        let version_col = batch.column_by_name(COL_BOOSTER_VERSION);

        for row in 0..batch.num_rows() {
            // Row numbers in errors count across batches.
            let row_no = records.len();

            let launch_site = string_at(site_col, row)
                .ok_or_else(|| invalid(row_no, COL_LAUNCH_SITE, "expected a string"))?;
            let payload_mass = number_at(payload_col, row)
                .ok_or_else(|| invalid(row_no, COL_PAYLOAD_MASS, "expected a number"))?;
            let outcome = number_at(class_col, row)
                .filter(|v| v.fract() == 0.0)
                .ok_or_else(|| invalid(row_no, COL_CLASS, "expected an integer"))
                .and_then(|v| {
                    Outcome::try_from(v as i64).map_err(|msg| invalid(row_no, COL_CLASS, &msg))
                })?;
            let booster_category = string_at(category_col, row)
                .ok_or_else(|| invalid(row_no, COL_BOOSTER_CATEGORY, "expected a string"))?;

            let flight_number = flight_col
                .and_then(|col| number_at(col, row))
                .filter(|v| *v >= 0.0)
                .map(|v| v as u32);
            let booster_version = version_col.and_then(|col| string_at(col, row));

            records.push(LaunchRecord {
                flight_number,
                launch_site,
                payload_mass,
                outcome,
                booster_version,
                booster_category,
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, DataLoadError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| DataLoadError::MissingColumn(name.to_string()))
}

fn invalid(row: usize, column: &str, message: &str) -> DataLoadError {
    DataLoadError::InvalidValue {
        row,
        column: column.to_string(),
        message: message.to_string(),
    }
}

/// Extract a string cell from a Utf8 or LargeUtf8 column.
fn string_at(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

/// Extract a numeric cell as `f64` from any common integer or float column.
fn number_at(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => Some(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Some(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => Some(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Some(col.as_primitive::<Float64Type>().value(row)),
        _ => None,
    }
}
