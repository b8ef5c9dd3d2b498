// src/application/mod.rs
//
// Application Layer
//
// - The boundary between the host (CLI) and the services
// - Translates between DTOs and domain entities
// - Owns the wiring of services into one AppState

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod state;

pub use dto::*;
pub use error_handling::{ErrorResponse, ErrorType};
pub use state::{open_database, AppState};
