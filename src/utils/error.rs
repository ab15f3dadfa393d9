use crate::domain::model::LogicalField;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Geocoding service answered with HTTP {status}")]
    UnexpectedStatus { status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Column index {index} for {field} is out of range (header has {width} columns)")]
    ColumnIndexOutOfRange {
        field: LogicalField,
        index: i64,
        width: usize,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EnrichError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EnrichError::ApiError(_)
            | EnrichError::UnexpectedStatus { .. }
            | EnrichError::UrlError(_) => ErrorCategory::Network,
            EnrichError::CsvError(_)
            | EnrichError::SerializationError(_)
            | EnrichError::ProcessingError { .. } => ErrorCategory::Data,
            EnrichError::ConfigError { .. }
            | EnrichError::InvalidConfigValueError { .. }
            | EnrichError::MissingConfigError { .. }
            | EnrichError::ColumnIndexOutOfRange { .. } => ErrorCategory::Configuration,
            EnrichError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EnrichError::ApiError(_) | EnrichError::UnexpectedStatus { .. } => {
                "Check network connectivity and that the geocoding endpoint is reachable".to_string()
            }
            EnrichError::UrlError(_) => "Check the --api-endpoint value".to_string(),
            EnrichError::CsvError(_) => {
                "Make sure the file is UTF-8 text separated by ';' with a header line".to_string()
            }
            EnrichError::SerializationError(_) => {
                "The geocoding service returned an unexpected payload".to_string()
            }
            EnrichError::IoError(_) => {
                "Check that the file exists and that its directory is writable".to_string()
            }
            EnrichError::ConfigError { .. }
            | EnrichError::InvalidConfigValueError { .. }
            | EnrichError::MissingConfigError { .. } => {
                "Review the command line flags and the TOML configuration file".to_string()
            }
            EnrichError::ColumnIndexOutOfRange { width, .. } => format!(
                "Column indexes start at 1 and must not exceed {} for this file",
                width
            ),
            EnrichError::ProcessingError { .. } => {
                "Fix the malformed rows in the input file and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EnrichError::ColumnIndexOutOfRange { field, index, width } => format!(
                "The {} column is set to {}, but the file only has {} columns",
                field, index, width
            ),
            EnrichError::IoError(e) => format!("Could not access the file: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EnrichError>;
