use chrono::{Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::game::GameId;

/// Opaque identifier returned by the notification backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderHandle(String);

impl ReminderHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Fresh random handle
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReminderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The five classes of reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReminderKind {
    Release,
    Sale,
    Wishlist,
    Stats,
    NewGames,
}

impl ReminderKind {
    pub const PERIODIC: [ReminderKind; 3] =
        [ReminderKind::Wishlist, ReminderKind::Stats, ReminderKind::NewGames];

    pub fn as_str(self) -> &'static str {
        match self {
            ReminderKind::Release => "release",
            ReminderKind::Sale => "sale",
            ReminderKind::Wishlist => "wishlist",
            ReminderKind::Stats => "stats",
            ReminderKind::NewGames => "new-games",
        }
    }

    /// Notification category presented by the host
    pub fn category(self) -> &'static str {
        match self {
            ReminderKind::Release => "game-release",
            ReminderKind::Sale => "game-sale",
            ReminderKind::Wishlist => "wishlist-reminder",
            ReminderKind::Stats => "monthly-stats",
            ReminderKind::NewGames => "new-games-reminder",
        }
    }

    /// Buttons offered with a delivered reminder of this kind
    pub fn actions(self) -> &'static [ReminderAction] {
        match self {
            ReminderKind::Release => &[ReminderAction::View, ReminderAction::RemindLater],
            ReminderKind::Sale => &[ReminderAction::View, ReminderAction::Delete],
            ReminderKind::Wishlist => &[ReminderAction::ViewWishlist, ReminderAction::Dismiss],
            ReminderKind::Stats => &[ReminderAction::ViewStats],
            ReminderKind::NewGames => &[ReminderAction::ViewNew],
        }
    }

    /// Catalog-wide reminders, not tied to one game
    pub fn is_periodic(self) -> bool {
        Self::PERIODIC.contains(&self)
    }
}

impl std::fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReminderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "release" => Ok(ReminderKind::Release),
            "sale" => Ok(ReminderKind::Sale),
            "wishlist" => Ok(ReminderKind::Wishlist),
            "stats" => Ok(ReminderKind::Stats),
            "new-games" => Ok(ReminderKind::NewGames),
            other => Err(format!("Unknown reminder kind '{}'", other)),
        }
    }
}

/// How a trigger repeats after it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    Once,
    Weekly,
    Monthly,
}

impl std::fmt::Display for Repeat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Repeat::Once => write!(f, "once"),
            Repeat::Weekly => write!(f, "weekly"),
            Repeat::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for Repeat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(Repeat::Once),
            "weekly" => Ok(Repeat::Weekly),
            "monthly" => Ok(Repeat::Monthly),
            other => Err(format!("Unknown repeat '{}'", other)),
        }
    }
}

/// When a reminder fires, in local wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTrigger {
    pub fire_at: NaiveDateTime,
    pub repeat: Repeat,
}

impl ReminderTrigger {
    pub fn once(fire_at: NaiveDateTime) -> Self {
        Self {
            fire_at,
            repeat: Repeat::Once,
        }
    }

    /// The occurrence after `fire_at`, or None for one-shot triggers
    pub fn next_occurrence(&self) -> Option<NaiveDateTime> {
        match self.repeat {
            Repeat::Once => None,
            Repeat::Weekly => Some(self.fire_at + Duration::days(7)),
            Repeat::Monthly => self.fire_at.checked_add_months(Months::new(1)),
        }
    }
}

/// Data carried by a reminder, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ReminderPayload {
    Release {
        game_id: GameId,
        title: String,
    },
    Sale {
        game_id: GameId,
        title: String,
        discount_percent: u32,
        price: f64,
    },
    Wishlist {
        wishlist_count: u32,
    },
    Stats {
        total: u32,
        new_this_month: u32,
        total_value: f64,
    },
    NewGames {
        new_count: u32,
    },
}

impl ReminderPayload {
    pub fn kind(&self) -> ReminderKind {
        match self {
            ReminderPayload::Release { .. } => ReminderKind::Release,
            ReminderPayload::Sale { .. } => ReminderKind::Sale,
            ReminderPayload::Wishlist { .. } => ReminderKind::Wishlist,
            ReminderPayload::Stats { .. } => ReminderKind::Stats,
            ReminderPayload::NewGames { .. } => ReminderKind::NewGames,
        }
    }

    pub fn game_id(&self) -> Option<GameId> {
        match self {
            ReminderPayload::Release { game_id, .. } | ReminderPayload::Sale { game_id, .. } => {
                Some(*game_id)
            }
            _ => None,
        }
    }
}

/// A decision to schedule one reminder
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderIntent {
    pub trigger: ReminderTrigger,
    pub title: String,
    pub body: String,
    pub payload: ReminderPayload,
}

impl ReminderIntent {
    pub fn kind(&self) -> ReminderKind {
        self.payload.kind()
    }
}

/// A reminder the backend currently holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledReminder {
    pub handle: ReminderHandle,
    pub trigger: ReminderTrigger,
    pub title: String,
    pub body: String,
    pub payload: ReminderPayload,
}

/// A reminder that has been shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveredReminder {
    pub handle: ReminderHandle,
    pub title: String,
    pub body: String,
    /// Absent for immediate test notifications
    pub payload: Option<ReminderPayload>,
    pub delivered_at: NaiveDateTime,
}

/// The user's interaction with a delivered reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderResponse {
    pub action_identifier: String,
    pub payload: Option<ReminderPayload>,
}

impl ReminderResponse {
    pub fn new(action_identifier: impl Into<String>, payload: Option<ReminderPayload>) -> Self {
        Self {
            action_identifier: action_identifier.into(),
            payload,
        }
    }
}

/// Actions a user can take on a delivered reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderAction {
    View,
    ViewWishlist,
    ViewStats,
    ViewNew,
    Delete,
    RemindLater,
    Dismiss,
}

impl ReminderAction {
    pub fn identifier(self) -> &'static str {
        match self {
            ReminderAction::View => "view",
            ReminderAction::ViewWishlist => "view-wishlist",
            ReminderAction::ViewStats => "view-stats",
            ReminderAction::ViewNew => "view-new",
            ReminderAction::Delete => "delete",
            ReminderAction::RemindLater => "remind-later",
            ReminderAction::Dismiss => "dismiss",
        }
    }

    /// None for identifiers this app never registered
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "view" => Some(ReminderAction::View),
            "view-wishlist" => Some(ReminderAction::ViewWishlist),
            "view-stats" => Some(ReminderAction::ViewStats),
            "view-new" => Some(ReminderAction::ViewNew),
            "delete" => Some(ReminderAction::Delete),
            "remind-later" => Some(ReminderAction::RemindLater),
            "dismiss" => Some(ReminderAction::Dismiss),
            _ => None,
        }
    }
}
