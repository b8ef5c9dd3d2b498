// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// - DTOs are UI-friendly representations
// - Dates travel as "YYYY-MM-DD" strings
// - Derived values (final price, badge) are computed at conversion time

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::db::DatabaseStats;
use crate::domain::game::{Game, GameId, GamePatch, NewGame, Rating};
use crate::domain::reminder::ScheduledReminder;
use crate::domain::statistics::GameStatistics;
use crate::domain::{DomainError, DomainResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(value: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| DomainError::InvalidDate {
        value: value.to_string(),
    })
}

// ============================================================================
// GAME DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDto {
    pub id: GameId,
    pub title: String,
    pub price: f64,
    /// Price a buyer pays right now
    pub final_price: f64,
    pub original_price: Option<f64>,
    pub discount_percent: Option<u32>,
    pub sale_end_date: Option<String>,
    pub on_sale: bool,
    pub description: Option<String>,
    pub category: String,
    pub image: Option<String>,
    pub release_date: String,
    pub upcoming: bool,
    pub days_until_release: i64,
    pub rating: String,
    pub sold: bool,
    pub is_wishlist: bool,
    pub is_new: bool,
    pub notify_on_release: bool,
    pub status_badge: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl GameDto {
    pub fn from_game(game: Game, now: NaiveDateTime) -> Self {
        Self {
            final_price: game.final_price(now),
            on_sale: game.is_on_sale(now),
            upcoming: game.is_upcoming(now),
            days_until_release: game.days_until_release(now),
            status_badge: game.status_badge(now),
            original_price: game.sale.as_ref().map(|s| s.original_price),
            discount_percent: game.sale.as_ref().map(|s| s.discount_percent),
            sale_end_date: game
                .sale
                .as_ref()
                .map(|s| s.sale_end_date.format(DATE_FORMAT).to_string()),
            id: game.id,
            title: game.title,
            price: game.price,
            description: game.description,
            category: game.category,
            image: game.image,
            release_date: game.release_date.format(DATE_FORMAT).to_string(),
            rating: game.rating.to_string(),
            sold: game.sold,
            is_wishlist: game.is_wishlist,
            is_new: game.is_new,
            notify_on_release: game.notify_on_release,
            created_at: game.created_at.to_rfc3339(),
            updated_at: game.updated_at.to_rfc3339(),
        }
    }

    pub fn from_games(games: Vec<Game>, now: NaiveDateTime) -> Vec<Self> {
        games
            .into_iter()
            .map(|game| Self::from_game(game, now))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGameDto {
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub category: String,
    pub image: Option<String>,
    pub release_date: String,
    pub rating: Option<String>,
    #[serde(default)]
    pub notify_on_release: bool,
    #[serde(default)]
    pub is_wishlist: bool,
}

impl CreateGameDto {
    pub fn into_new_game(self) -> DomainResult<NewGame> {
        let rating = self
            .rating
            .as_deref()
            .map(str::parse::<Rating>)
            .transpose()?
            .unwrap_or_default();

        Ok(NewGame {
            title: self.title,
            price: self.price,
            description: self.description,
            category: self.category,
            image: self.image,
            release_date: parse_date(&self.release_date)?,
            rating,
            notify_on_release: self.notify_on_release,
            is_wishlist: self.is_wishlist,
        })
    }
}

/// Partial update. An empty description or image clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGameDto {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub release_date: Option<String>,
    pub rating: Option<String>,
    pub notify_on_release: Option<bool>,
    pub sold: Option<bool>,
    pub is_wishlist: Option<bool>,
}

impl UpdateGameDto {
    pub fn into_patch(self) -> DomainResult<GamePatch> {
        Ok(GamePatch {
            title: self.title,
            price: self.price,
            description: self.description.map(Some),
            category: self.category,
            image: self.image.map(Some),
            release_date: self.release_date.as_deref().map(parse_date).transpose()?,
            rating: self
                .rating
                .as_deref()
                .map(str::parse::<Rating>)
                .transpose()?,
            notify_on_release: self.notify_on_release,
            sold: self.sold,
            is_wishlist: self.is_wishlist,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSaleDto {
    pub game_id: GameId,
    pub discount_percent: u32,
    /// First day the sale no longer applies
    pub sale_end_date: String,
}

// ============================================================================
// STATISTICS DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsDto {
    pub total: u32,
    pub sold: u32,
    pub not_sold: u32,
    pub wishlist_count: u32,
    pub new_count: u32,
    pub on_sale_count: u32,
    pub new_this_month: u32,
    pub total_value: f64,
    pub average_price: f64,
    pub max_price: f64,
    pub min_price: f64,
}

impl From<GameStatistics> for StatisticsDto {
    fn from(stats: GameStatistics) -> Self {
        Self {
            total: stats.total,
            sold: stats.sold,
            not_sold: stats.not_sold,
            wishlist_count: stats.wishlist_count,
            new_count: stats.new_count,
            on_sale_count: stats.on_sale_count,
            new_this_month: stats.new_this_month,
            total_value: stats.total_value,
            average_price: stats.average_price,
            max_price: stats.max_price,
            min_price: stats.min_price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseInfoDto {
    pub schema_version: i32,
    pub size_bytes: i64,
    pub game_count: i64,
    pub scheduled_reminder_count: i64,
}

impl From<DatabaseStats> for DatabaseInfoDto {
    fn from(stats: DatabaseStats) -> Self {
        Self {
            schema_version: stats.schema_version,
            size_bytes: stats.size_bytes,
            game_count: stats.game_count,
            scheduled_reminder_count: stats.scheduled_reminder_count,
        }
    }
}

// ============================================================================
// REMINDER DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledReminderDto {
    pub handle: String,
    pub kind: String,
    pub category: String,
    pub fire_at: String,
    pub repeat: String,
    pub title: String,
    pub body: String,
    pub game_id: Option<GameId>,
    pub actions: Vec<String>,
}

impl From<ScheduledReminder> for ScheduledReminderDto {
    fn from(reminder: ScheduledReminder) -> Self {
        let kind = reminder.payload.kind();
        Self {
            handle: reminder.handle.to_string(),
            kind: kind.to_string(),
            category: kind.category().to_string(),
            fire_at: reminder.trigger.fire_at.format("%Y-%m-%d %H:%M").to_string(),
            repeat: reminder.trigger.repeat.to_string(),
            title: reminder.title,
            body: reminder.body,
            game_id: reminder.payload.game_id(),
            actions: kind
                .actions()
                .iter()
                .map(|a| a.identifier().to_string())
                .collect(),
        }
    }
}
