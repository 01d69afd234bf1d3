use std::path::PathBuf;

use thiserror::Error;

use super::model::Attribute;

// ---------------------------------------------------------------------------
// Load-time errors
// ---------------------------------------------------------------------------

/// Failure to produce an [`ExamTable`](super::model::ExamTable) from a file.
/// Always fatal: the loader never returns a partially parsed table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("could not read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("invalid dataset {}: {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
}

/// The file was readable but does not match the exam table contract.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("unsupported file extension '.{0}' (expected csv, json or parquet)")]
    UnsupportedFormat(String),

    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),

    #[error("row {row}, column '{column}': cannot interpret '{value}' ({expected})")]
    InvalidValue {
        /// 1-based data row (the header is not counted).
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("identifier '{id}' appears in row {first_row} and again in row {row}")]
    DuplicateId {
        id: String,
        first_row: usize,
        row: usize,
    },

    #[error("the dataset contains no records")]
    Empty,
}

// ---------------------------------------------------------------------------
// Filter-time errors
// ---------------------------------------------------------------------------

/// A filter that cannot be evaluated. Never downgraded to "match all".
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),

    #[error("range filter on '{attribute}' has lower bound {lower} above upper bound {upper}")]
    InvertedRange {
        attribute: Attribute,
        lower: f64,
        upper: f64,
    },

    #[error("range filter on '{0}' has a NaN bound")]
    NonFiniteBound(Attribute),

    #[error("'{attribute}' does not accept {predicate} filters")]
    PredicateMismatch {
        attribute: Attribute,
        predicate: &'static str,
    },
}
