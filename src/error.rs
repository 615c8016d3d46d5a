//! Error types for each stage of the analysis.

use std::path::PathBuf;

use thiserror::Error;

/// A log line that could not be split into entry fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected at least 5 fields, found {found}")]
    TooFewFields { found: usize },
}

/// A nefarious message that did not yield a username.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("message does not match the failed password layout: {0:?}")]
    UnexpectedMessage(String),
}

/// Errors from the geolocation database.
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("GeoIP database not found: {0}")]
    NotFound(String),

    #[error("failed to open GeoIP database: {0}")]
    Open(#[source] maxminddb::MaxMindDBError),

    #[error("lookup failed for {address}: {source}")]
    Lookup {
        address: String,
        #[source]
        source: maxminddb::MaxMindDBError,
    },
}

/// A country label that does not read back as `"<name> (<code>)"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("malformed country label: {0:?}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Label(#[from] LabelError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write summary: {0}")]
    Output(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
