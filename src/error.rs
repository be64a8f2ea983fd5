use thiserror::Error;

/// Everything that can abort an ingestion. The display strings are the
/// user-facing messages surfaced by the presentation layer.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("The uploaded file is empty or in an unsupported format.")]
    EmptyInput,

    #[error("Missing required column: \"{column}\". Please ensure your Excel file contains all required columns.")]
    Schema { column: String },

    #[error("Invalid date format in row {row} for '{field}'.")]
    DateParse { row: usize, field: String },

    #[error("Failed to read the file.")]
    Io(#[from] std::io::Error),

    #[error("Could not decode spreadsheet: {0}")]
    Decode(String),

    #[error("Another file is still being processed; wait for it to finish before uploading again.")]
    Busy,

    #[error("Ingestion task did not complete: {0}")]
    Join(String),
}

impl IngestError {
    /// Short stable label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::EmptyInput => "empty_input",
            IngestError::Schema { .. } => "schema",
            IngestError::DateParse { .. } => "date_parse",
            IngestError::Io(_) => "io",
            IngestError::Decode(_) => "decode",
            IngestError::Busy => "busy",
            IngestError::Join(_) => "join",
        }
    }
}

impl From<calamine::Error> for IngestError {
    fn from(e: calamine::Error) -> Self {
        IngestError::Decode(e.to_string())
    }
}

impl From<csv::Error> for IngestError {
    fn from(e: csv::Error) -> Self {
        IngestError::Decode(e.to_string())
    }
}

impl From<tokio::task::JoinError> for IngestError {
    fn from(e: tokio::task::JoinError) -> Self {
        IngestError::Join(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Invalid(String),
}
