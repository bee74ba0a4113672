use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FlexsheetError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("malformed timesheet layout: {0}")]
    MalformedLayout(String),

    #[error("no 'Signature customer' field found on the first page")]
    SignatureAnchorNotFound,

    #[error("failed to read signature image: {0}")]
    Image(String),

    #[error("failed to stamp signature onto PDF: {0}")]
    Stamp(String),

    #[error("failed to write Excel workbook: {0}")]
    Export(String),

    #[error("failed to load config from {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<lopdf::Error> for FlexsheetError {
    fn from(e: lopdf::Error) -> Self {
        FlexsheetError::Extraction(e.to_string())
    }
}
