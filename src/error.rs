use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Data generation error: {0}")]
    Generation(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("Workbook export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
