use std::fmt;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{
    DataType, Float16Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::error::ArrowError;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{LoadError, SchemaError};
use super::model::{Attribute, ExamRecord, ExamTable, KnowledgeArea, SCORE_DOMAIN};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the exam table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the column names of [`Attribute`]
/// * `.json`    – `[{ "ID": "...", "Mathematics": 512.3, ... }, ...]`
/// * `.parquet` – one column per attribute; any integer or float width,
///   plain, large, view or dictionary-encoded strings, and booleans
///
/// Loading is all-or-nothing: the first malformed cell aborts the load.
pub fn load_file(path: &Path) -> Result<ExamTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(schema_error(path, SchemaError::UnsupportedFormat(other.to_string()))),
    };

    let table = ExamTable::from_records(records).map_err(|e| schema_error(path, e))?;
    log::info!("Loaded {} exam records from {}", table.len(), path.display());
    Ok(table)
}

fn schema_error(path: &Path, source: SchemaError) -> LoadError {
    LoadError::Schema {
        path: path.to_path_buf(),
        source,
    }
}

fn read_error(path: &Path, message: impl fmt::Display) -> LoadError {
    LoadError::Read {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Format-independent cell coercion
// ---------------------------------------------------------------------------

/// One raw cell as the container format delivered it.
#[derive(Debug, Clone, Copy)]
enum Cell<'a> {
    Text(&'a str),
    Number(f64),
    Bool(bool),
    Null,
    /// A Parquet column whose Arrow type has no cell mapping.
    Unsupported(&'a DataType),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Null => write!(f, "<null>"),
            Cell::Unsupported(dt) => write!(f, "<unsupported {dt}>"),
        }
    }
}

struct RowContext {
    /// 1-based data row.
    row: usize,
}

impl RowContext {
    fn invalid(&self, attr: Attribute, cell: Cell<'_>, expected: &'static str) -> SchemaError {
        SchemaError::InvalidValue {
            row: self.row,
            column: attr.column_name(),
            value: cell.to_string(),
            expected,
        }
    }

    fn text(&self, attr: Attribute, cell: Cell<'_>) -> Result<String, SchemaError> {
        match cell {
            Cell::Text(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            // numeric identifiers come through JSON and Parquet as numbers
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 => Ok(format!("{n:.0}")),
            _ => Err(self.invalid(attr, cell, "non-empty text")),
        }
    }

    fn number(&self, attr: Attribute, cell: Cell<'_>) -> Result<f64, SchemaError> {
        let value = match cell {
            Cell::Number(n) => Some(n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.invalid(attr, cell, "a finite number"))
    }

    fn score(&self, attr: Attribute, cell: Cell<'_>) -> Result<f64, SchemaError> {
        let (lo, hi) = SCORE_DOMAIN;
        self.number(attr, cell)
            .ok()
            .filter(|v| (lo..=hi).contains(v))
            .ok_or_else(|| self.invalid(attr, cell, "a score between 0 and 1000"))
    }

    fn income(&self, attr: Attribute, cell: Cell<'_>) -> Result<f64, SchemaError> {
        self.number(attr, cell)
            .ok()
            .filter(|v| *v >= 0.0)
            .ok_or_else(|| self.invalid(attr, cell, "a non-negative amount"))
    }

    fn flag(&self, attr: Attribute, cell: Cell<'_>) -> Result<bool, SchemaError> {
        let value = match cell {
            Cell::Bool(b) => Some(b),
            Cell::Number(n) if n == 1.0 => Some(true),
            Cell::Number(n) if n == 0.0 => Some(false),
            Cell::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "1.0" | "true" | "yes" => Some(true),
                "0" | "0.0" | "false" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        };
        value.ok_or_else(|| self.invalid(attr, cell, "0/1, true/false or yes/no"))
    }

    fn count(&self, attr: Attribute, cell: Cell<'_>) -> Result<u32, SchemaError> {
        let as_count = |n: f64| {
            (n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
        };
        let value = match cell {
            Cell::Number(n) => as_count(n),
            Cell::Text(s) => {
                let s = s.trim();
                s.parse::<u32>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(as_count))
            }
            _ => None,
        };
        value.ok_or_else(|| self.invalid(attr, cell, "a non-negative integer"))
    }

    /// Build one record, reading each attribute through `cell`.
    fn record<'a>(&self, cell: impl Fn(Attribute) -> Cell<'a>) -> Result<ExamRecord, SchemaError> {
        let mut scores = [0.0; 4];
        for area in KnowledgeArea::ALL {
            let attr = area.attribute();
            scores[area.index()] = self.score(attr, cell(attr))?;
        }

        Ok(ExamRecord {
            id: self.text(Attribute::Id, cell(Attribute::Id))?,
            scores,
            gender: self.text(Attribute::Gender, cell(Attribute::Gender))?,
            family_income: self.income(Attribute::FamilyIncome, cell(Attribute::FamilyIncome))?,
            internet_access: self.flag(Attribute::InternetAccess, cell(Attribute::InternetAccess))?,
            computer_count: self.count(Attribute::ComputerCount, cell(Attribute::ComputerCount))?,
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with (at least) every [`Attribute`] column name.
/// Extra columns are ignored; empty cells are treated as missing.
fn load_csv(path: &Path) -> Result<Vec<ExamRecord>, LoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| read_error(path, e))?;
    let headers = reader.headers().map_err(|e| read_error(path, e))?.clone();

    let mut positions = [0usize; Attribute::ALL.len()];
    for attr in Attribute::ALL {
        positions[attr as usize] = headers
            .iter()
            .position(|h| h.trim() == attr.column_name())
            .ok_or_else(|| schema_error(path, SchemaError::MissingColumn(attr.column_name())))?;
    }

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result.map_err(|e| read_error(path, format!("row {}: {e}", i + 1)))?;
        let ctx = RowContext { row: i + 1 };
        let record = ctx
            .record(|attr| match row.get(positions[attr as usize]) {
                Some(s) if !s.trim().is_empty() => Cell::Text(s),
                _ => Cell::Null,
            })
            .map_err(|e| schema_error(path, e))?;
        records.push(record);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "ID": "190001", "Natural Sciences": 512.3, "Sex": "F",
///     "Internet Access": 1, "Number of Computers": 2, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<ExamRecord>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| read_error(path, e))?;

    let rows = root
        .as_array()
        .ok_or_else(|| read_error(path, "expected a top-level JSON array"))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| read_error(path, format!("row {} is not a JSON object", i + 1)))?;

        if let Some(missing) = Attribute::ALL.iter().find(|a| !obj.contains_key(a.column_name())) {
            return Err(schema_error(path, SchemaError::MissingColumn(missing.column_name())));
        }

        let ctx = RowContext { row: i + 1 };
        let record = ctx
            .record(|attr| match obj.get(attr.column_name()) {
                Some(JsonValue::String(s)) => Cell::Text(s),
                Some(JsonValue::Number(n)) => n.as_f64().map_or(Cell::Null, Cell::Number),
                Some(JsonValue::Bool(b)) => Cell::Bool(*b),
                _ => Cell::Null,
            })
            .map_err(|e| schema_error(path, e))?;
        records.push(record);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by Pandas (`df.to_parquet()`) or Polars.
///
/// Each attribute is a flat column. Numbers may be any signed or unsigned
/// integer width or Float16/32/64; text may be Utf8, LargeUtf8 or Utf8View.
/// Dictionary columns (Pandas `category`) are decoded to their value type
/// first. The internet flag may also be Boolean.
fn load_parquet(path: &Path) -> Result<Vec<ExamRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| read_error(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| read_error(path, e))?;
    let reader = builder.build().map_err(|e| read_error(path, e))?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|e| read_error(path, e))?;
        let schema = batch.schema();

        let mut columns = Vec::with_capacity(Attribute::ALL.len());
        for attr in Attribute::ALL {
            let idx = schema
                .index_of(attr.column_name())
                .map_err(|_| schema_error(path, SchemaError::MissingColumn(attr.column_name())))?;
            columns.push(flatten_column(batch.column(idx)).map_err(|e| read_error(path, e))?);
        }

        for row in 0..batch.num_rows() {
            let ctx = RowContext {
                row: records.len() + 1,
            };
            let record = ctx
                .record(|attr| extract_cell(&columns[attr as usize], row))
                .map_err(|e| schema_error(path, e))?;
            records.push(record);
        }
    }

    Ok(records)
}

/// Decode dictionary and view encodings so `extract_cell` only sees flat
/// arrays. Other columns are passed through untouched.
fn flatten_column(col: &ArrayRef) -> Result<ArrayRef, ArrowError> {
    match col.data_type() {
        DataType::Dictionary(_, values) => flatten_column(&cast(col, values)?),
        DataType::Utf8View => cast(col, &DataType::Utf8),
        _ => Ok(Arc::clone(col)),
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Cell<'_> {
    if col.is_null(row) {
        return Cell::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row)),
        DataType::Int8 => Cell::Number(f64::from(col.as_primitive::<Int8Type>().value(row))),
        DataType::Int16 => Cell::Number(f64::from(col.as_primitive::<Int16Type>().value(row))),
        DataType::Int32 => Cell::Number(f64::from(col.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => Cell::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::UInt8 => Cell::Number(f64::from(col.as_primitive::<UInt8Type>().value(row))),
        DataType::UInt16 => Cell::Number(f64::from(col.as_primitive::<UInt16Type>().value(row))),
        DataType::UInt32 => Cell::Number(f64::from(col.as_primitive::<UInt32Type>().value(row))),
        DataType::UInt64 => Cell::Number(col.as_primitive::<UInt64Type>().value(row) as f64),
        DataType::Float16 => Cell::Number(col.as_primitive::<Float16Type>().value(row).to_f64()),
        DataType::Float32 => Cell::Number(f64::from(col.as_primitive::<Float32Type>().value(row))),
        DataType::Float64 => Cell::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Bool(col.as_boolean().value(row)),
        other => Cell::Unsupported(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use arrow::array::{
        BooleanArray, Date32Array, DictionaryArray, Float32Array, Float64Array, Int16Array, Int64Array, Int8Array,
        StringArray, UInt8Array,
    };
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    const HEADER: &str =
        "ID,Natural Sciences,Human Sciences,Language,Mathematics,Sex,Family Income,Internet Access,Number of Computers,Average";

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn csv_with(rows: &[&str]) -> String {
        let mut s = String::from(HEADER);
        for r in rows {
            s.push('\n');
            s.push_str(r);
        }
        s
    }

    #[test]
    fn loads_well_formed_csv() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "data.csv",
            &csv_with(&[
                "190001,512.3,601.0,555.5,700.25,F,1996.0,1,2,592.26",
                "190002,480,470,460,450,M,998,0,0.0,465",
            ]),
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        let first = &table.records()[0];
        assert_eq!(first.id, "190001");
        assert_eq!(first.score(KnowledgeArea::Mathematics), 700.25);
        assert_eq!(first.gender, "F");
        assert!(first.internet_access);
        assert_eq!(first.computer_count, 2);
        assert!(!table.records()[1].internet_access);
        assert_eq!(table.records()[1].computer_count, 0);
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.csv");
        match load_file(&path) {
            Err(LoadError::MissingFile { path: p }) => assert_eq!(p, path),
            other => panic!("expected MissingFile, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "data.csv", "ID,Sex\n1,F");
        match load_file(&path) {
            Err(LoadError::Schema { source, .. }) => {
                assert_eq!(source, SchemaError::MissingColumn("Natural Sciences"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn one_bad_row_fails_the_whole_load() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "data.csv",
            &csv_with(&[
                "1,500,500,500,500,F,1000,1,1,500",
                "2,500,500,500,500,M,1000,maybe,1,500",
            ]),
        );
        let err = load_file(&path).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("data.csv"), "{msg}");
        match err {
            LoadError::Schema {
                source: SchemaError::InvalidValue { row, column, value, .. },
                ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(column, "Internet Access");
                assert_eq!(value, "maybe");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_domain_and_missing_values() {
        let dir = TempDir::new().unwrap();
        let cases = [
            ("1,1200,500,500,500,F,1000,1,1,0", "Natural Sciences"),
            ("1,500,500,500,500,,1000,1,1,0", "Sex"),
            ("1,500,500,500,500,F,-5,1,1,0", "Family Income"),
            ("1,500,500,500,500,F,1000,1,1.5,0", "Number of Computers"),
            ("1,500,500,abc,500,F,1000,1,1,0", "Language"),
        ];
        for (row, column) in cases {
            let path = write(&dir, "bad.csv", &csv_with(&[row]));
            match load_file(&path) {
                Err(LoadError::Schema {
                    source: SchemaError::InvalidValue { column: c, .. },
                    ..
                }) => assert_eq!(c, column),
                other => panic!("{row}: expected invalid {column}, got {other:?}"),
            }
        }
    }

    #[test]
    fn header_only_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "data.csv", HEADER);
        assert!(matches!(
            load_file(&path),
            Err(LoadError::Schema { source: SchemaError::Empty, .. })
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "data.csv",
            &csv_with(&["9,500,500,500,500,F,1000,1,1,0", "9,600,600,600,600,M,1000,1,1,0"]),
        );
        assert!(matches!(
            load_file(&path),
            Err(LoadError::Schema { source: SchemaError::DuplicateId { .. }, .. })
        ));
    }

    #[test]
    fn unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "data.xlsx", "");
        assert!(matches!(
            load_file(&path),
            Err(LoadError::Schema { source: SchemaError::UnsupportedFormat(ext), .. }) if ext == "xlsx"
        ));
    }

    #[test]
    fn loads_records_oriented_json() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "data.json",
            r#"[
                {"ID": 190001, "Natural Sciences": 512.3, "Human Sciences": 601, "Language": 555.5,
                 "Mathematics": 700, "Sex": "F", "Family Income": 1996.0,
                 "Internet Access": true, "Number of Computers": 2},
                {"ID": "190002", "Natural Sciences": "480", "Human Sciences": 470, "Language": 460,
                 "Mathematics": 450, "Sex": "M", "Family Income": 998,
                 "Internet Access": 0, "Number of Computers": 0}
            ]"#,
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].id, "190001");
        assert!(table.records()[0].internet_access);
        assert_eq!(table.records()[1].score(KnowledgeArea::NaturalSciences), 480.0);
    }

    #[test]
    fn malformed_json_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "data.json", "{ not json");
        assert!(matches!(load_file(&path), Err(LoadError::Read { .. })));
    }

    #[test]
    fn loads_parquet_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("ID", DataType::Utf8, false),
            Field::new("Natural Sciences", DataType::Float64, false),
            Field::new("Human Sciences", DataType::Float64, false),
            Field::new("Language", DataType::Float64, false),
            Field::new("Mathematics", DataType::Float64, false),
            Field::new("Sex", DataType::Utf8, false),
            Field::new("Family Income", DataType::Float64, false),
            Field::new("Internet Access", DataType::Boolean, false),
            Field::new("Number of Computers", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["a", "b"])),
                Arc::new(Float64Array::from(vec![500.0, 510.0])),
                Arc::new(Float64Array::from(vec![520.0, 530.0])),
                Arc::new(Float64Array::from(vec![540.0, 550.0])),
                Arc::new(Float64Array::from(vec![560.0, 570.0])),
                Arc::new(StringArray::from(vec!["F", "M"])),
                Arc::new(Float64Array::from(vec![998.0, 4990.0])),
                Arc::new(BooleanArray::from(vec![true, false])),
                Arc::new(Int64Array::from(vec![1, 3])),
            ],
        )
        .unwrap();
        let file = fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].computer_count, 3);
        assert_eq!(table.records()[1].score(KnowledgeArea::Mathematics), 570.0);
        assert!(!table.records()[1].internet_access);
    }

    fn write_batch(dir: &TempDir, columns: Vec<(&str, ArrayRef)>) -> PathBuf {
        let path = dir.path().join("data.parquet");
        let batch = RecordBatch::try_from_iter(columns).unwrap();
        let file = fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn loads_pandas_style_parquet() {
        // category strings, narrow integer flags and counts, float32 scores
        let dir = TempDir::new().unwrap();
        let sex: DictionaryArray<Int8Type> = vec!["F", "M"].into_iter().collect();
        let scores = |a: f32, b: f32| -> ArrayRef { Arc::new(Float32Array::from(vec![a, b])) };
        let path = write_batch(
            &dir,
            vec![
                ("ID", Arc::new(Int64Array::from(vec![190_001, 190_002])) as ArrayRef),
                ("Natural Sciences", scores(500.5, 510.0)),
                ("Human Sciences", scores(520.0, 530.0)),
                ("Language", scores(540.0, 550.0)),
                ("Mathematics", scores(560.0, 570.25)),
                ("Sex", Arc::new(sex) as ArrayRef),
                ("Family Income", Arc::new(Int16Array::from(vec![998, 4990])) as ArrayRef),
                ("Internet Access", Arc::new(Int8Array::from(vec![1, 0])) as ArrayRef),
                ("Number of Computers", Arc::new(UInt8Array::from(vec![0, 2])) as ArrayRef),
            ],
        );

        let table = load_file(&path).unwrap();
        let recs = table.records();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].id, "190001");
        assert_eq!((recs[0].gender.as_str(), recs[1].gender.as_str()), ("F", "M"));
        assert_eq!(recs[0].score(KnowledgeArea::NaturalSciences), 500.5);
        assert_eq!(recs[1].score(KnowledgeArea::Mathematics), 570.25);
        assert_eq!(recs[1].family_income, 4990.0);
        assert!(recs[0].internet_access && !recs[1].internet_access);
        assert_eq!((recs[0].computer_count, recs[1].computer_count), (0, 2));
    }

    #[test]
    fn unsupported_parquet_type_is_named_in_the_error() {
        let dir = TempDir::new().unwrap();
        let floats = |v: f64| -> ArrayRef { Arc::new(Float64Array::from(vec![v])) };
        let path = write_batch(
            &dir,
            vec![
                ("ID", Arc::new(StringArray::from(vec!["a"])) as ArrayRef),
                ("Natural Sciences", floats(500.0)),
                ("Human Sciences", floats(500.0)),
                ("Language", floats(500.0)),
                ("Mathematics", floats(500.0)),
                ("Sex", Arc::new(Date32Array::from(vec![19_000])) as ArrayRef),
                ("Family Income", floats(998.0)),
                ("Internet Access", Arc::new(BooleanArray::from(vec![true])) as ArrayRef),
                ("Number of Computers", Arc::new(Int64Array::from(vec![1])) as ArrayRef),
            ],
        );

        match load_file(&path) {
            Err(LoadError::Schema {
                source: SchemaError::InvalidValue { column, value, .. },
                ..
            }) => {
                assert_eq!(column, "Sex");
                assert!(value.contains("Date32"), "got {value}");
                assert_ne!(value, "<null>");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn half_precision_and_null_cells() {
        let halves = cast(&Float32Array::from(vec![512.5]), &DataType::Float16).unwrap();
        assert!(matches!(extract_cell(&halves, 0), Cell::Number(v) if v == 512.5));

        let with_null: ArrayRef = Arc::new(Int8Array::from(vec![None, Some(1)]));
        assert!(matches!(extract_cell(&with_null, 0), Cell::Null));
        assert!(matches!(extract_cell(&with_null, 1), Cell::Number(v) if v == 1.0));
    }
}
