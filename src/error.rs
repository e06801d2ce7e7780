use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Sheet '{sheet}' not found in {} (available: {available})", path.display())]
    SheetNotFound {
        sheet: String,
        path: PathBuf,
        available: String,
    },

    #[error("Invalid column reference '{0}': expected a header name or a single letter A-Z")]
    InvalidColumnReference(String),

    #[error("Column '{reference}' resolves to index {index}, but the table has only {column_count} columns")]
    ColumnOutOfRange {
        reference: String,
        index: usize,
        column_count: usize,
    },

    #[error("Coordinate transformation failed: {0}")]
    Projection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file error: {0}")]
    Settings(#[from] ::config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("No datasets could be loaded")]
    NoDatasetsLoaded,
}
