// src/services/reminder_service.rs
//
// Turns policy decisions into scheduled reminders and keeps the handles
// stored on each game in step with the backend.
//
// RULES:
// - Every sync cancels the recorded handle before scheduling a new one
// - A refused reminder clears the stored handle; the record itself stays
// - Only persistence errors are returned, after undoing the new schedule

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::game::{Game, ReminderHandles};
use crate::domain::reminder::{ReminderHandle, ReminderPolicy, ScheduledReminder};
use crate::error::AppResult;
use crate::repositories::GameRepository;
use crate::services::{ReminderScheduler, StatisticsService};

pub struct ReminderService {
    scheduler: Arc<ReminderScheduler>,
    game_repo: Arc<dyn GameRepository>,
    statistics: Arc<StatisticsService>,
    policy: ReminderPolicy,
}

impl ReminderService {
    pub fn new(
        scheduler: Arc<ReminderScheduler>,
        game_repo: Arc<dyn GameRepository>,
        statistics: Arc<StatisticsService>,
        policy: ReminderPolicy,
    ) -> Self {
        Self {
            scheduler,
            game_repo,
            statistics,
            policy,
        }
    }

    pub async fn sync_release_reminder(
        &self,
        game: &mut Game,
        now: NaiveDateTime,
    ) -> AppResult<Option<ReminderHandle>> {
        if let Some(old) = &game.reminders.release {
            self.scheduler.cancel(old).await;
        }

        let handle = match self.policy.release_eve(game, now) {
            Some(intent) => self.scheduler.schedule(&intent).await,
            None => None,
        };

        let handles = ReminderHandles {
            release: handle.clone(),
            sale: game.reminders.sale.clone(),
        };
        self.commit_handles(game, handles, handle.as_ref()).await?;
        Ok(handle)
    }

    pub async fn sync_sale_reminder(
        &self,
        game: &mut Game,
        now: NaiveDateTime,
    ) -> AppResult<Option<ReminderHandle>> {
        if let Some(old) = &game.reminders.sale {
            self.scheduler.cancel(old).await;
        }

        let handle = match self.policy.sale_ending(game, now) {
            Some(intent) => self.scheduler.schedule(&intent).await,
            None => None,
        };

        let handles = ReminderHandles {
            release: game.reminders.release.clone(),
            sale: handle.clone(),
        };
        self.commit_handles(game, handles, handle.as_ref()).await?;
        Ok(handle)
    }

    /// Both per-game reminders
    pub async fn sync_game_reminders(&self, game: &mut Game, now: NaiveDateTime) -> AppResult<()> {
        self.sync_release_reminder(game, now).await?;
        self.sync_sale_reminder(game, now).await?;
        Ok(())
    }

    /// Cancel both handles of a game that is about to be deleted
    pub async fn cancel_game_reminders(&self, game: &Game) {
        self.scheduler.cancel_many(game.reminders.iter()).await;
    }

    /// Replace the outstanding catalog-wide reminders with fresh ones.
    /// Returns how many were scheduled.
    pub async fn refresh_periodic(&self, now: NaiveDateTime) -> AppResult<usize> {
        let stats = self.statistics.calculate(now)?;

        match self.scheduler.list_scheduled().await {
            Ok(scheduled) => {
                let stale = scheduled
                    .iter()
                    .filter(|r| r.payload.kind().is_periodic())
                    .map(|r| &r.handle);
                self.scheduler.cancel_many(stale).await;
            }
            Err(e) => log::warn!("Could not list scheduled reminders: {}", e),
        }

        let mut scheduled = 0;
        for intent in self.policy.evaluate_periodic(&stats, now) {
            if self.scheduler.schedule(&intent).await.is_some() {
                scheduled += 1;
            }
        }
        Ok(scheduled)
    }

    /// Cancel every scheduled reminder. Backend failures are logged and
    /// reported as zero so that a bulk delete can still go ahead.
    pub async fn clear_all(&self) -> usize {
        match self.scheduler.cancel_all().await {
            Ok(cancelled) => cancelled,
            Err(e) => {
                log::warn!("Could not cancel scheduled reminders: {}", e);
                0
            }
        }
    }

    pub async fn list_scheduled(&self) -> AppResult<Vec<ScheduledReminder>> {
        self.scheduler.list_scheduled().await
    }

    pub async fn send_immediate(&self, title: &str, body: &str) -> AppResult<()> {
        self.scheduler.send_immediate(title, body).await
    }

    /// Persist `handles`. If that fails, the freshly scheduled reminder is
    /// cancelled so the backend holds nothing the record does not know about.
    async fn commit_handles(
        &self,
        game: &mut Game,
        handles: ReminderHandles,
        fresh: Option<&ReminderHandle>,
    ) -> AppResult<()> {
        if handles == game.reminders {
            return Ok(());
        }
        if let Err(e) = self.game_repo.update_reminder_handles(game.id, &handles) {
            if let Some(fresh) = fresh {
                log::warn!("Handle for game {} not stored, cancelling {}", game.id, fresh);
                self.scheduler.cancel(fresh).await;
            }
            return Err(e);
        }
        game.reminders = handles;
        Ok(())
    }
}
