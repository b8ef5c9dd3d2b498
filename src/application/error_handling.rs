// src/application/error_handling.rs
//
// Error handling for commands
//
// - Maps internal errors to user-facing notices
// - Keeps one consistent shape for every command
// - Internal details go to the log, not to the user

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response for the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The referenced game does not exist
    NotFound,

    /// Missing or invalid field, rejected before any write
    Validation,

    /// Store unavailable or failing
    Persistence,

    /// Notification backend refused or failed
    Scheduling,

    Internal,
}

impl ErrorResponse {
    /// Create error response from AppError
    pub fn from_app_error(error: AppError) -> Self {
        match error {
            AppError::NotFound(id) => Self {
                success: false,
                error_type: ErrorType::NotFound,
                message: format!("Game {} not found", id),
                details: None,
            },

            AppError::Domain(domain_error) => Self {
                success: false,
                error_type: ErrorType::Validation,
                message: "Please check the entered data".to_string(),
                details: Some(domain_error.to_string()),
            },

            AppError::Database(db_error) => {
                log::error!("Database error: {:?}", db_error);

                Self {
                    success: false,
                    error_type: ErrorType::Persistence,
                    message: "Database operation failed".to_string(),
                    details: Some("Check logs for details".to_string()),
                }
            }

            AppError::Pool(pool_error) => {
                log::error!("Connection pool error: {}", pool_error);

                Self {
                    success: false,
                    error_type: ErrorType::Persistence,
                    message: "Database connection failed".to_string(),
                    details: None,
                }
            }

            AppError::Scheduling(reason) => {
                log::warn!("Scheduling error: {}", reason);

                Self {
                    success: false,
                    error_type: ErrorType::Scheduling,
                    message: "Notification could not be scheduled".to_string(),
                    details: Some(reason),
                }
            }

            AppError::Serialization(serde_error) => {
                log::error!("Serialization error: {:?}", serde_error);

                Self {
                    success: false,
                    error_type: ErrorType::Internal,
                    message: "Data serialization failed".to_string(),
                    details: None,
                }
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {:?}", io_error);

                Self {
                    success: false,
                    error_type: ErrorType::Internal,
                    message: "File system operation failed".to_string(),
                    details: Some(io_error.to_string()),
                }
            }

            AppError::Other(message) => {
                log::error!("Other error: {}", message);

                Self {
                    success: false,
                    error_type: ErrorType::Internal,
                    message,
                    details: None,
                }
            }
        }
    }

    /// Create validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_type: ErrorType::Validation,
            message: message.into(),
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(error)
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{} ({})", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ErrorResponse {}
