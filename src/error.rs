#![allow(dead_code)]
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Error: {0}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Timings provider error: {0}")]
    Provider(String),

    #[error("Alarm bridge error: {0}")]
    Bridge(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl AppError {
    pub fn provider<S: Into<String>>(msg: S) -> Self {
        Self::Provider(msg.into())
    }

    pub fn bridge<S: Into<String>>(msg: S) -> Self {
        Self::Bridge(msg.into())
    }

    pub fn notification<S: Into<String>>(msg: S) -> Self {
        Self::Notification(msg.into())
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn operation_failed<S: Into<String>>(msg: S) -> Self {
        Self::OperationFailed(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn permission_denied<S: Into<String>>(msg: S) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Network and database errors can leak location coordinates (timings API
    /// URLs embed latitude/longitude) or filesystem paths.
    pub fn is_pii_safe(&self) -> bool {
        match self {
            Self::Database(_) | Self::Network(_) | Self::Anyhow(_) => false,
            Self::Provider(_)
            | Self::Bridge(_)
            | Self::Notification(_)
            | Self::InvalidInput(_)
            | Self::Config(_)
            | Self::OperationFailed(_)
            | Self::NotFound(_)
            | Self::PermissionDenied(_) => true,
        }
    }

    pub fn to_safe_string(&self) -> String {
        if self.is_pii_safe() {
            self.to_string()
        } else {
            match self {
                Self::Database(_) => "Database operation failed".to_string(),
                Self::Network(_) => "Network request failed".to_string(),
                Self::Anyhow(_) => "Operation failed".to_string(),
                _ => self.to_string(),
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_helpers() {
        assert!(matches!(AppError::provider("down"), AppError::Provider(_)));
        assert!(matches!(AppError::bridge("gone"), AppError::Bridge(_)));
        assert!(matches!(
            AppError::permission_denied("notifications"),
            AppError::PermissionDenied(_)
        ));
    }

    #[test]
    fn test_safe_string_masks_network_errors() {
        let err = AppError::Anyhow(anyhow::anyhow!(
            "GET https://api.example.com/timings?latitude=52.52 failed"
        ));
        assert!(!err.is_pii_safe());
        assert_eq!(err.to_safe_string(), "Operation failed");
    }

    #[test]
    fn test_safe_string_passes_domain_errors() {
        let err = AppError::invalid_input("unknown prayer name");
        assert!(err.is_pii_safe());
        assert!(err.to_safe_string().contains("unknown prayer name"));
    }
}
