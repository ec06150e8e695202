use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Connection failed: {message}")]
    ConnectionError { message: String },

    #[error("File not found: {path}")]
    InputNotFound { path: String },

    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Backend rejected request (HTTP {status}): {message}")]
    BackendError { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, LoaderError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Input,
    Backend,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl LoaderError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LoaderError::ConfigError { .. } | LoaderError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            LoaderError::ApiError(_) | LoaderError::ConnectionError { .. } => {
                ErrorCategory::Network
            }
            LoaderError::InputNotFound { .. }
            | LoaderError::InvalidJson { .. }
            | LoaderError::ValidationError { .. } => ErrorCategory::Input,
            LoaderError::BackendError { .. } => ErrorCategory::Backend,
            LoaderError::IoError(_) | LoaderError::SerializationError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LoaderError::ConfigError { .. }
            | LoaderError::InvalidConfigValueError { .. }
            | LoaderError::ConnectionError { .. } => ErrorSeverity::Critical,
            LoaderError::ApiError(_) => ErrorSeverity::Medium,
            LoaderError::BackendError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            LoaderError::ConfigError { message } => format!("Configuration problem: {}", message),
            LoaderError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            LoaderError::ConnectionError { message } => {
                format!("Could not create the Supabase client: {}", message)
            }
            LoaderError::ApiError(e) if e.is_timeout() => {
                "The request to Supabase timed out".to_string()
            }
            LoaderError::ApiError(e) if e.is_connect() => {
                "Could not reach the Supabase server".to_string()
            }
            LoaderError::ApiError(e) => format!("Request to Supabase failed: {}", e),
            LoaderError::InputNotFound { path } => format!("File not found: {}", path),
            LoaderError::InvalidJson { source, .. } => format!("Invalid JSON: {}", source),
            LoaderError::ValidationError { message } => format!("Unexpected data: {}", message),
            LoaderError::BackendError { status, message } => {
                format!("Supabase returned HTTP {}: {}", status, message)
            }
            LoaderError::IoError(e) => format!("File system error: {}", e),
            LoaderError::SerializationError(e) => format!("Could not encode data: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Set SUPABASE_URL and SUPABASE_KEY in the environment, a .env file or --config"
            }
            ErrorCategory::Network => "Check the Supabase URL and your network connection",
            ErrorCategory::Input => "Check that the input file exists and holds a JSON array of member objects",
            ErrorCategory::Backend => {
                "Check the table schema, row level security policies and the access key"
            }
            ErrorCategory::Internal => "Check file permissions and free disk space",
        }
    }
}
