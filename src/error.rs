use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading an uploaded URL list
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Unsupported file format: {0}. Use CSV or Excel.")]
    UnsupportedFormat(String),
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Workbook has no worksheets")]
    NoWorksheet,
}

/// Errors raised while writing a report to disk
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Could not create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while building the scanner configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read signature file {path}: {source}")]
    SignatureFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid signature file: {0}")]
    InvalidSignatures(#[from] serde_json::Error),
    #[error("Invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}
