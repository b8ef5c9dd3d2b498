// src/domain/reminder/policy.rs
//
// Reminder Policy - pure decision logic
//
// RULES:
// - No I/O, no clock reads: `now` is always passed in
// - At most one intent per rule per call
// - A fire time at or before `now` yields no intent
// - Same inputs and same `now` always yield the same intents

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Weekday};

use super::entity::{ReminderIntent, ReminderPayload, ReminderTrigger, Repeat};
use crate::domain::game::Game;
use crate::domain::statistics::GameStatistics;
use crate::domain::{DomainError, DomainResult};

/// Times of day and calendar anchors for every reminder kind
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderRules {
    /// Hour on the eve of release
    pub release_hour: u32,
    /// Hour on the last day of a sale
    pub sale_hour: u32,
    pub wishlist_weekday: Weekday,
    pub wishlist_hour: u32,
    /// Must be 1..=28 so it exists in every month
    pub stats_day_of_month: u32,
    pub stats_hour: u32,
    pub new_games_delay_days: i64,
    pub new_games_hour: u32,
}

impl Default for ReminderRules {
    fn default() -> Self {
        Self {
            release_hour: 10,
            sale_hour: 18,
            wishlist_weekday: Weekday::Mon,
            wishlist_hour: 12,
            stats_day_of_month: 1,
            stats_hour: 10,
            new_games_delay_days: 3,
            new_games_hour: 19,
        }
    }
}

impl ReminderRules {
    /// Hours must be 0..=23, the stats day 1..=28 and the delay non-negative
    pub fn validate(&self) -> DomainResult<()> {
        let hours = [
            ("release_hour", self.release_hour),
            ("sale_hour", self.sale_hour),
            ("wishlist_hour", self.wishlist_hour),
            ("stats_hour", self.stats_hour),
            ("new_games_hour", self.new_games_hour),
        ];
        for (name, hour) in hours {
            if hour > 23 {
                return Err(DomainError::InvariantViolation(format!(
                    "{} must be between 0 and 23, got {}",
                    name, hour
                )));
            }
        }

        if !(1..=28).contains(&self.stats_day_of_month) {
            return Err(DomainError::InvariantViolation(format!(
                "stats_day_of_month must be between 1 and 28, got {}",
                self.stats_day_of_month
            )));
        }
        if self.new_games_delay_days < 0 {
            return Err(DomainError::InvariantViolation(format!(
                "new_games_delay_days must not be negative, got {}",
                self.new_games_delay_days
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReminderPolicy {
    rules: ReminderRules,
}

impl ReminderPolicy {
    /// Rejects rules under which a reminder kind could never fire
    pub fn new(rules: ReminderRules) -> DomainResult<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &ReminderRules {
        &self.rules
    }

    /// Day before release, for games that opted in
    pub fn release_eve(&self, game: &Game, now: NaiveDateTime) -> Option<ReminderIntent> {
        if !game.notify_on_release || game.release_date <= now.date() {
            return None;
        }

        let eve = game.release_date - Duration::days(1);
        let trigger = once_after(at_hour(eve, self.rules.release_hour)?, now)?;

        Some(ReminderIntent {
            trigger,
            title: "Releasing tomorrow!".to_string(),
            body: format!("\"{}\" comes out tomorrow. Don't miss it!", game.title),
            payload: ReminderPayload::Release {
                game_id: game.id,
                title: game.title.clone(),
            },
        })
    }

    /// Last day of a running sale
    pub fn sale_ending(&self, game: &Game, now: NaiveDateTime) -> Option<ReminderIntent> {
        let sale = game.sale.as_ref()?;
        if !sale.is_active(now.date()) {
            return None;
        }

        let trigger = once_after(at_hour(sale.last_day(), self.rules.sale_hour)?, now)?;

        Some(ReminderIntent {
            trigger,
            title: "Sale ends tomorrow!".to_string(),
            body: format!(
                "\"{}\" is {}% off for one more day. Now ${:.2}",
                game.title, sale.discount_percent, game.price
            ),
            payload: ReminderPayload::Sale {
                game_id: game.id,
                title: game.title.clone(),
                discount_percent: sale.discount_percent,
                price: game.price,
            },
        })
    }

    /// Weekly nudge while the wishlist is not empty
    pub fn wishlist_weekly(&self, wishlist_count: u32, now: NaiveDateTime) -> Option<ReminderIntent> {
        if wishlist_count == 0 {
            return None;
        }

        let fire_at =
            next_weekday_at(now, self.rules.wishlist_weekday, self.rules.wishlist_hour)?;

        Some(ReminderIntent {
            trigger: ReminderTrigger {
                fire_at,
                repeat: Repeat::Weekly,
            },
            title: "Your wishlist".to_string(),
            body: format!(
                "You have {} {} on your wishlist. Time to take a look?",
                wishlist_count,
                games_word(wishlist_count)
            ),
            payload: ReminderPayload::Wishlist { wishlist_count },
        })
    }

    /// Monthly collection summary; skipped for an empty catalog
    pub fn monthly_stats(
        &self,
        stats: &GameStatistics,
        now: NaiveDateTime,
    ) -> Option<ReminderIntent> {
        if stats.is_empty() {
            return None;
        }

        let fire_at =
            next_month_day_at(now, self.rules.stats_day_of_month, self.rules.stats_hour)?;

        Some(ReminderIntent {
            trigger: ReminderTrigger {
                fire_at,
                repeat: Repeat::Monthly,
            },
            title: "Your collection this month".to_string(),
            body: format!(
                "{} {} worth ${:.2}. {} added this month!",
                stats.total,
                games_word(stats.total),
                stats.total_value,
                stats.new_this_month
            ),
            payload: ReminderPayload::Stats {
                total: stats.total,
                new_this_month: stats.new_this_month,
                total_value: stats.total_value,
            },
        })
    }

    /// One-shot reminder a few days out while unviewed games exist
    pub fn new_games_nudge(&self, new_count: u32, now: NaiveDateTime) -> Option<ReminderIntent> {
        if new_count == 0 {
            return None;
        }

        let day = now.date() + Duration::days(self.rules.new_games_delay_days);
        let trigger = once_after(at_hour(day, self.rules.new_games_hour)?, now)?;

        Some(ReminderIntent {
            trigger,
            title: "Unviewed games waiting".to_string(),
            body: format!(
                "{} {} waiting for you to check out!",
                new_count,
                games_word(new_count)
            ),
            payload: ReminderPayload::NewGames { new_count },
        })
    }

    /// Per-game reminders (release, sale) for one record
    pub fn evaluate_game(&self, game: &Game, now: NaiveDateTime) -> Vec<ReminderIntent> {
        [self.release_eve(game, now), self.sale_ending(game, now)]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Catalog-wide reminders (wishlist, stats, new games)
    pub fn evaluate_periodic(
        &self,
        stats: &GameStatistics,
        now: NaiveDateTime,
    ) -> Vec<ReminderIntent> {
        [
            self.wishlist_weekly(stats.wishlist_count, now),
            self.monthly_stats(stats, now),
            self.new_games_nudge(stats.new_count, now),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn at_hour(date: NaiveDate, hour: u32) -> Option<NaiveDateTime> {
    date.and_hms_opt(hour, 0, 0)
}

/// Past-time guard for one-shot triggers
fn once_after(fire_at: NaiveDateTime, now: NaiveDateTime) -> Option<ReminderTrigger> {
    (fire_at > now).then(|| ReminderTrigger::once(fire_at))
}

/// First `weekday` at `hour` strictly after `now`
fn next_weekday_at(now: NaiveDateTime, weekday: Weekday, hour: u32) -> Option<NaiveDateTime> {
    let days_ahead = (7 + weekday.num_days_from_monday() - now.weekday().num_days_from_monday()) % 7;
    let candidate = at_hour(now.date() + Duration::days(i64::from(days_ahead)), hour)?;
    if candidate > now {
        Some(candidate)
    } else {
        Some(candidate + Duration::days(7))
    }
}

/// First `day` of a month at `hour` strictly after `now`
fn next_month_day_at(now: NaiveDateTime, day: u32, hour: u32) -> Option<NaiveDateTime> {
    let this_month = NaiveDate::from_ymd_opt(now.year(), now.month(), day)?;
    let candidate = at_hour(this_month, hour)?;
    if candidate > now {
        Some(candidate)
    } else {
        candidate.checked_add_months(Months::new(1))
    }
}

fn games_word(count: u32) -> &'static str {
    if count == 1 {
        "game"
    } else {
        "games"
    }
}
