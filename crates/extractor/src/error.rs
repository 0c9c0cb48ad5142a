use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractorError>;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("PDF extraction failed: {0}")]
    ExtractionError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed record at line {line_number}: expected at least {width} characters, got {line:?}")]
    MalformedRecord {
        line_number: usize,
        line: String,
        width: usize,
    },

    #[error("Failed to parse template JSON: {0}")]
    TemplateError(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ExtractorError {
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, ExtractorError::MalformedRecord { .. })
    }
}
