use thiserror::Error;

/// Main error type for Twingraph
#[derive(Error, Debug)]
pub enum TwingraphError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding/decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text generation API errors
    #[error("Text generation error: {0}")]
    Generator(String),

    /// Input file with an extension we cannot decode
    #[error("Unsupported file format: {0}. Please provide a JSON, YAML or CSV file (PDF tables are not read).")]
    UnsupportedFormat(String),

    /// Record decode errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenient Result type using TwingraphError
pub type Result<T> = std::result::Result<T, TwingraphError>;
