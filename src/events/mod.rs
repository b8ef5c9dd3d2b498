// src/events/mod.rs
//
// Internal event system - public API

pub mod bus;
pub mod types;

pub use types::DomainEvent;

pub use types::{
    // Catalog
    CatalogCleared,
    GameCreated,
    GameDeleted,
    GameUpdated,

    // Sales
    SaleApplied,
    SaleRemoved,

    // Reminders
    ReminderActionHandled,
    ReminderScheduled,
    ReminderSchedulingFailed,
};

pub use bus::{EventBus, EventLogEntry, DEFAULT_EVENT_LOG_CAPACITY};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
