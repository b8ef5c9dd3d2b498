// src/lib.rs
// GameShelf - Local-first video game catalog
//
// Architecture:
// - Domain-centric: records, sale rules and reminder policy live in `domain`
// - Explicit: services receive `now`, nothing reads the clock behind your back
// - Local-first: one SQLite file holds the catalog and pending reminders
// - Application layer: commands the host calls, returning DTOs

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_game,
    validate_new_game,
    DeliveredReminder,
    DomainError,
    // Game
    Game,
    GameFilter,
    GameId,
    GamePatch,
    GameSort,
    // Statistics
    GameStatistics,
    NewGame,
    Rating,
    ReminderAction,
    ReminderHandle,
    ReminderHandles,
    ReminderIntent,
    ReminderKind,
    ReminderPayload,
    // Reminders
    ReminderPolicy,
    ReminderResponse,
    ReminderRules,
    ReminderTrigger,
    Repeat,
    SaleState,
    ScheduledReminder,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{create_event_bus, DomainEvent, EventBus, EventLogEntry};

// ============================================================================
// PUBLIC API - Database & Configuration
// ============================================================================

pub use config::CatalogConfig;
pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{GameRepository, SqliteGameRepository};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    ActionOutcome, ActionRouter, GameService, ReminderScheduler, ReminderService,
    SetSaleRequest, StatisticsService,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{open_database, AppState, ErrorResponse, ErrorType};

pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{LocalNotificationBackend, NotificationBackend};
