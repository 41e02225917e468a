//! Error taxonomy for loading and querying the project dataset

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised at the boundaries of the analytics core
///
/// The aggregation, ranking, forecast and risk stages are total functions and
/// never return these. Errors only come from loading the record source,
/// parsing user-supplied names, reading configuration or writing reports.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("record source unavailable at {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document: {0}")]
    MalformedDocument(String),

    #[error("malformed record #{index}: field '{field}' {reason}")]
    MalformedRecord {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("unknown dashboard mode: {0}")]
    UnknownMode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AnalyticsError>;
