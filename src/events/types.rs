// events/types.rs
//
// Catalog events.
// Each event records something that already happened.
//
// RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::game::GameId;
use crate::domain::reminder::{ReminderHandle, ReminderKind};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! domain_event {
    ($name:ident) => {
        impl DomainEvent for $name {
            fn event_id(&self) -> Uuid { self.event_id }
            fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
            fn event_type(&self) -> &'static str { stringify!($name) }
        }
    };
}

// ============================================================================
// CATALOG EVENTS
// ============================================================================

/// Emitted after a game record is inserted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub game_id: GameId,
    pub title: String,
}

impl GameCreated {
    pub fn new(game_id: GameId, title: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            game_id,
            title,
        }
    }
}

domain_event!(GameCreated);

/// Emitted after any field of a stored game changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub game_id: GameId,
}

impl GameUpdated {
    pub fn new(game_id: GameId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            game_id,
        }
    }
}

domain_event!(GameUpdated);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub game_id: GameId,
}

impl GameDeleted {
    pub fn new(game_id: GameId) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            game_id,
        }
    }
}

domain_event!(GameDeleted);

/// Emitted after every record was removed in one go
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub removed: usize,
}

impl CatalogCleared {
    pub fn new(removed: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            removed,
        }
    }
}

domain_event!(CatalogCleared);

// ============================================================================
// SALE EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleApplied {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub game_id: GameId,
    pub discount_percent: u32,
    pub price: f64,
}

impl SaleApplied {
    pub fn new(game_id: GameId, discount_percent: u32, price: f64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            game_id,
            discount_percent,
            price,
        }
    }
}

domain_event!(SaleApplied);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub game_id: GameId,
    pub restored_price: f64,
}

impl SaleRemoved {
    pub fn new(game_id: GameId, restored_price: f64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            game_id,
            restored_price,
        }
    }
}

domain_event!(SaleRemoved);

// ============================================================================
// REMINDER EVENTS
// ============================================================================

/// Emitted when the backend accepted a reminder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderScheduled {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub handle: ReminderHandle,
    pub kind: ReminderKind,
    pub fire_at: NaiveDateTime,
    pub game_id: Option<GameId>,
}

impl ReminderScheduled {
    pub fn new(
        handle: ReminderHandle,
        kind: ReminderKind,
        fire_at: NaiveDateTime,
        game_id: Option<GameId>,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            handle,
            kind,
            fire_at,
            game_id,
        }
    }
}

domain_event!(ReminderScheduled);

/// Emitted when the backend refused a reminder.
/// The catalog operation that triggered it has already succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderSchedulingFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub kind: ReminderKind,
    pub game_id: Option<GameId>,
    pub reason: String,
}

impl ReminderSchedulingFailed {
    pub fn new(kind: ReminderKind, game_id: Option<GameId>, reason: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            kind,
            game_id,
            reason,
        }
    }
}

domain_event!(ReminderSchedulingFailed);

/// Emitted after the action router handled a user response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderActionHandled {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub action_identifier: String,
    pub game_id: Option<GameId>,
}

impl ReminderActionHandled {
    pub fn new(action_identifier: String, game_id: Option<GameId>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            action_identifier,
            game_id,
        }
    }
}

domain_event!(ReminderActionHandled);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(GameCreated::new(1, "Celeste".into()).event_type(), "GameCreated");
        assert_eq!(CatalogCleared::new(3).event_type(), "CatalogCleared");
        assert_eq!(
            ReminderSchedulingFailed::new(ReminderKind::Sale, Some(1), "denied".into())
                .event_type(),
            "ReminderSchedulingFailed"
        );
    }

    #[test]
    fn test_event_ids_are_unique() {
        let a = GameDeleted::new(1);
        let b = GameDeleted::new(1);
        assert_ne!(a.event_id(), b.event_id());
    }
}
