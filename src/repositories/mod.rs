// src/repositories/mod.rs
//
// Repository layer
//
// RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - Explicit SQL only

pub mod game_repository;

pub use game_repository::{GameRepository, SqliteGameRepository};
