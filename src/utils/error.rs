use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Mount point '#{id}' not found in document")]
    MountPointMissing { id: String },

    #[error("No trigger registered for element '#{element_id}'")]
    UnknownTrigger { element_id: String },

    #[error("Element '#{element_id}' listens for '{expected}', got '{received}'")]
    EventMismatch {
        element_id: String,
        expected: String,
        received: String,
    },

    #[error("Swap target '{selector}' not found under mount point")]
    TargetMissing { selector: String },

    #[error("Proxy error: {message}")]
    ProxyError { message: String },

    #[error("Server error: {message}")]
    ServerError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Page,
    Configuration,
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::HttpError(_) | AppError::ProxyError { .. } => ErrorCategory::Network,
            AppError::IoError(_) => ErrorCategory::Io,
            AppError::MountPointMissing { .. }
            | AppError::UnknownTrigger { .. }
            | AppError::EventMismatch { .. }
            | AppError::TargetMissing { .. } => ErrorCategory::Page,
            AppError::UrlError(_)
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AppError::ServerError { .. } => ErrorCategory::Server,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 頁面殼層保證掛載點存在，缺少時直接中止
            AppError::MountPointMissing { .. } => ErrorSeverity::Critical,
            AppError::ServerError { .. } => ErrorSeverity::Critical,
            AppError::HttpError(_) | AppError::ProxyError { .. } => ErrorSeverity::Medium,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the backend is running and reachable (default: http://localhost:43280)",
            ErrorCategory::Io => "Check file permissions and that the output directory is writable",
            ErrorCategory::Page => "Make sure the shell document provides the mount container and the trigger is registered",
            ErrorCategory::Configuration => "Review the TOML configuration file and command line flags",
            ErrorCategory::Server => "Make sure the listen port is free and not used by another process",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::MountPointMissing { id } => {
                format!("Page cannot start: container '#{}' is missing", id)
            }
            AppError::HttpError(e) if e.is_connect() => {
                "Could not connect to the backend".to_string()
            }
            AppError::HttpError(e) if e.is_timeout() => "Backend request timed out".to_string(),
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn proxy(message: impl Into<String>) -> Self {
        AppError::ProxyError {
            message: message.into(),
        }
    }

    pub fn server(message: impl Into<String>) -> Self {
        AppError::ServerError {
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_mount_point_is_critical() {
        let err = AppError::MountPointMissing {
            id: "app".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Page);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().contains("#app"));
    }

    #[test]
    fn test_config_errors_map_to_high_severity() {
        let err = AppError::InvalidConfigValueError {
            field: "proxy.target".to_string(),
            value: "localhost".to_string(),
            reason: "missing scheme".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.exit_code(), 1);
    }
}
