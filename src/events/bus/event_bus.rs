// events/bus/event_bus.rs
//
// In-process event recorder.
//
// - Services emit an event after each successful write
// - The log keeps the most recent `capacity` entries, oldest dropped first
// - Emitting never fails and never blocks on a reader for long

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::events::types::DomainEvent;

/// Entries kept when no capacity is configured
pub const DEFAULT_EVENT_LOG_CAPACITY: usize = 256;

/// Recent catalog and reminder events, for diagnostics.
pub struct EventBus {
    capacity: usize,
    event_log: Mutex<VecDeque<EventLogEntry>>,
}

/// One recorded emission
#[derive(Debug, Clone, PartialEq)]
pub struct EventLogEntry {
    pub event_type: &'static str,
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// Debug rendering of the event payload
    pub detail: String,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_LOG_CAPACITY)
    }

    /// A capacity of zero is raised to one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            event_log: Mutex::new(VecDeque::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record an event, evicting the oldest entry when full.
    ///
    /// ```ignore
    /// bus.emit(GameCreated::new(game.id, game.title.clone()));
    /// ```
    pub fn emit<E: DomainEvent>(&self, event: E) {
        let entry = EventLogEntry {
            event_type: event.event_type(),
            event_id: event.event_id(),
            occurred_at: event.occurred_at(),
            detail: format!("{:?}", event),
        };
        log::debug!("[EVENT] {} (id: {})", entry.event_type, entry.event_id);

        let mut log = self.event_log.lock().unwrap_or_else(|e| e.into_inner());
        while log.len() >= self.capacity {
            log.pop_front();
        }
        log.push_back(entry);
    }

    /// Recorded entries, oldest first
    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        self.event_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<EventLogEntry> {
        self.event_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.event_log.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear_event_log(&self) {
        self.event_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::*;

    #[test]
    fn test_event_log_records_emissions_in_order() {
        let bus = EventBus::new();

        bus.emit(GameCreated::new(1, "Tunic".to_string()));
        bus.emit(SaleApplied::new(1, 25, 22.49));

        let log = bus.get_event_log();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].event_type, "GameCreated");
        assert_eq!(log[1].event_type, "SaleApplied");
        assert!(log[0].detail.contains("Tunic"));

        bus.clear_event_log();
        assert!(bus.is_empty());
    }

    #[test]
    fn test_log_is_bounded_and_drops_oldest() {
        let bus = EventBus::with_capacity(3);

        for id in 1..=10 {
            bus.emit(GameDeleted::new(id));
        }

        let log = bus.get_event_log();
        assert_eq!(log.len(), 3);
        assert!(log[0].detail.contains("game_id: 8"));
        assert!(log[2].detail.contains("game_id: 10"));
    }

    #[test]
    fn test_zero_capacity_keeps_latest_event() {
        let bus = EventBus::with_capacity(0);
        assert_eq!(bus.capacity(), 1);

        bus.emit(CatalogCleared::new(2));
        bus.emit(GameUpdated::new(4));

        assert_eq!(bus.len(), 1);
        assert_eq!(bus.get_event_log()[0].event_type, "GameUpdated");
    }

    #[test]
    fn test_events_of_type_filters() {
        let bus = EventBus::new();
        bus.emit(GameCreated::new(1, "Celeste".to_string()));
        bus.emit(GameUpdated::new(1));
        bus.emit(GameUpdated::new(1));

        assert_eq!(bus.events_of_type("GameUpdated").len(), 2);
        assert!(bus.events_of_type("SaleRemoved").is_empty());
    }
}
