use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),
    #[error("Document error: {0}")]
    Document(String),
    #[error("External error: {0}")]
    External(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        AppError::Spreadsheet(value.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(value: reqwest::Error) -> Self {
        AppError::External(value.to_string())
    }
}

/// Raised when a price series is too short for the requested computation.
/// Callers treat this as "data unavailable" and skip the ticker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("insufficient data: need {required} samples, have {actual}")]
    InsufficientData { required: usize, actual: usize },
}
