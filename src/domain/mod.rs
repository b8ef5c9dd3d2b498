// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod game;
pub mod reminder;
pub mod statistics;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Game Domain
pub use game::{
    validate_game, validate_new_game, Game, GameFilter, GameId, GamePatch, GameSort, NewGame,
    Rating, ReminderHandles, SaleState,
};

// Reminder Domain
pub use reminder::{
    DeliveredReminder, ReminderAction, ReminderHandle, ReminderIntent, ReminderKind,
    ReminderPayload, ReminderPolicy, ReminderResponse, ReminderRules, ReminderTrigger, Repeat,
    ScheduledReminder,
};

// Statistics Domain (Derived Data)
pub use statistics::GameStatistics;

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Discount {0}% is outside 0..=100")]
    InvalidDiscount(u32),

    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Unknown rating '{0}'")]
    UnknownRating(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
