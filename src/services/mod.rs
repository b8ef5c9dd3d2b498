// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod action_router;
pub mod game_service;
pub mod reminder_scheduler;
pub mod reminder_service;
pub mod statistics_service;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod game_service_tests;
#[cfg(test)]
mod reminder_service_tests;
#[cfg(test)]
mod action_router_tests;

pub use action_router::{ActionOutcome, ActionRouter};
pub use game_service::{GameService, SetSaleRequest};
pub use reminder_scheduler::ReminderScheduler;
pub use reminder_service::ReminderService;
pub use statistics_service::StatisticsService;
