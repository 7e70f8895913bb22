//! Error types for image analysis operations

use thiserror::Error;

/// Result type alias for image analysis operations
pub type Result<T> = std::result::Result<T, VisionError>;

/// Error types for image analysis, annotation and thumbnail operations
#[derive(Error, Debug)]
pub enum VisionError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or encoding errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Transport-level failures talking to the image host or the vision service
    #[error("Network error: {0}")]
    Network(String),

    /// The vision service answered with a non-success status
    #[error("Service error ({}{}): {}", .status, code_suffix(.code), .message)]
    Service {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Missing or invalid settings
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The service answered 2xx but the body could not be decoded
    #[error("Invalid service response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// Interactive input that cannot be used
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Annotation or rendering failures
    #[error("Processing error: {0}")]
    Processing(String),
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref().map(|c| format!(", {c}")).unwrap_or_default()
}

impl VisionError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Create network error with operation context
    pub fn network_error(operation: &str, error: &reqwest::Error) -> Self {
        let target = error
            .url()
            .map(|u| format!(" ({})", u))
            .unwrap_or_default();
        Self::Network(format!("{}{}: {}", operation, target, error))
    }

    /// Create configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
        recommended: Option<T>,
    ) -> Self {
        let recommendation = match recommended {
            Some(rec) => format!(" Recommended: {}", rec),
            None => String::new(),
        };

        Self::Config(format!(
            "Invalid {}: {} (valid range: {}).{}",
            parameter, value, valid_range, recommendation
        ))
    }

    /// Create a missing-setting error naming the key that was looked up
    pub fn missing_setting(key: &str, source: &str) -> Self {
        Self::Config(format!("Missing required setting '{}' in {}", key, source))
    }
}
