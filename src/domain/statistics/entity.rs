use chrono::{Datelike, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::game::entity::round_cents;
use crate::domain::game::Game;

/// Aggregate counters over the whole catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub total: u32,
    pub sold: u32,
    pub not_sold: u32,
    pub wishlist_count: u32,
    pub new_count: u32,
    pub on_sale_count: u32,
    /// Sum of current prices
    pub total_value: f64,
    pub average_price: f64,
    pub max_price: f64,
    pub min_price: f64,
    /// Games created during the month of `now` (local time)
    pub new_this_month: u32,
}

impl GameStatistics {
    /// Derive statistics from the full record set at instant `now`
    pub fn from_games(games: &[Game], now: NaiveDateTime) -> Self {
        if games.is_empty() {
            return Self::default();
        }

        let mut stats = Self {
            total: games.len() as u32,
            max_price: f64::MIN,
            min_price: f64::MAX,
            ..Self::default()
        };

        for game in games {
            if game.sold {
                stats.sold += 1;
            } else {
                stats.not_sold += 1;
            }
            if game.is_wishlist {
                stats.wishlist_count += 1;
            }
            if game.is_new {
                stats.new_count += 1;
            }
            if game.is_on_sale(now) {
                stats.on_sale_count += 1;
            }

            let created = game.created_at.with_timezone(&Local).date_naive();
            if created.year() == now.year() && created.month() == now.month() {
                stats.new_this_month += 1;
            }

            stats.total_value += game.price;
            stats.max_price = stats.max_price.max(game.price);
            stats.min_price = stats.min_price.min(game.price);
        }

        stats.average_price = round_cents(stats.total_value / f64::from(stats.total));
        stats.total_value = round_cents(stats.total_value);
        stats
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
