// src/application/commands/mod.rs
//
// Command Handlers
//
// - Commands are thin adapters between the host and the services
// - Commands accept DTOs, return DTOs
// - Commands convert errors into ErrorResponse

pub mod game_commands;
pub mod reminder_commands;
pub mod statistics_commands;

pub use game_commands::*;
pub use reminder_commands::*;
pub use statistics_commands::*;
