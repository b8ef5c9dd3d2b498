// src/error/types.rs
use crate::domain::{DomainError, GameId};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Game {0} not found")]
    NotFound(GameId),

    #[error("Scheduling error: {0}")]
    Scheduling(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Store unavailable or failing underneath us
    pub fn is_persistence(&self) -> bool {
        matches!(self, AppError::Database(_) | AppError::Pool(_))
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_the_game() {
        let err = AppError::NotFound(42);
        assert_eq!(err.to_string(), "Game 42 not found");
        assert!(err.is_not_found());
        assert!(!err.is_persistence());
    }

    #[test]
    fn test_domain_error_converts() {
        let err: AppError = DomainError::MissingField("title").into();
        assert!(matches!(err, AppError::Domain(_)));
        assert_eq!(err.to_string(), "Validation error: Missing required field: title");
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&AppError::Scheduling("denied".to_string())).unwrap();
        assert_eq!(json, "\"Scheduling error: denied\"");
    }
}
