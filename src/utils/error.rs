use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Request to data source failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Data source {url} responded with status {status}")]
    StatusError { url: String, status: u16 },

    #[error("Failed to decode events document: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Map surface error: {message}")]
    SurfaceError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Task failed: {message}")]
    TaskError { message: String },

    /// Stands in for an error already reported to another mode that shared
    /// the same fetch. Classifies exactly like the error it mirrors.
    #[error("{message}")]
    SharedError {
        category: ErrorCategory,
        fetch_failure: bool,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Rendering,
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

impl MapError {
    pub fn surface(message: impl Into<String>) -> Self {
        MapError::SurfaceError {
            message: message.into(),
        }
    }

    /// A copy of this error for another consumer of the same result.
    pub fn shared(&self) -> Self {
        MapError::SharedError {
            category: self.category(),
            fetch_failure: self.is_fetch_failure(),
            message: self.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MapError::SharedError { category, .. } => *category,
            MapError::TransportError(_) | MapError::StatusError { .. } => ErrorCategory::Network,
            MapError::DecodeError(_) => ErrorCategory::Data,
            MapError::SurfaceError { .. } | MapError::CsvError(_) => ErrorCategory::Rendering,
            MapError::ConfigError { .. }
            | MapError::MissingConfigError { .. }
            | MapError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            MapError::IoError(_) | MapError::TaskError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // A failed fetch leaves the previous render in place.
            ErrorCategory::Network | ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Rendering | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Fetch failures are the only ones worth trying again later.
    pub fn is_fetch_failure(&self) -> bool {
        match self {
            MapError::TransportError(_) | MapError::StatusError { .. } | MapError::DecodeError(_) => {
                true
            }
            MapError::SharedError { fetch_failure, .. } => *fetch_failure,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MapError::TransportError(e) if e.is_timeout() => {
                "The data source timed out; raise --timeout-seconds or try again later".to_string()
            }
            MapError::TransportError(_) => {
                "Check network connectivity and that --api-path points to a reachable host"
                    .to_string()
            }
            MapError::StatusError { status, .. } if *status >= 500 => {
                "The data source is failing; the previous map state was kept".to_string()
            }
            MapError::StatusError { .. } => "Verify the --api-path endpoint and its access rules".to_string(),
            MapError::DecodeError(_) => {
                "The endpoint must return {\"events\": [...]} JSON; inspect its response body".to_string()
            }
            MapError::CsvError(_) | MapError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            MapError::SurfaceError { .. } => "Inspect the map provider logs".to_string(),
            MapError::ConfigError { .. }
            | MapError::MissingConfigError { .. }
            | MapError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again".to_string()
            }
            MapError::TaskError { .. } => "Re-run with --verbose to see the failing task".to_string(),
            MapError::SharedError { .. } => "See the first error reported for this render".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MapError::TransportError(_) => "Could not reach the event data source".to_string(),
            MapError::StatusError { status, .. } => {
                format!("The event data source answered with HTTP {}", status)
            }
            MapError::DecodeError(_) => "The event data could not be understood".to_string(),
            MapError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            MapError::MissingConfigError { field } => format!("Missing required setting: {}", field),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
