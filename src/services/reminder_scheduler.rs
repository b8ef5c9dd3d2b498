// src/services/reminder_scheduler.rs
//
// Reminder Scheduler Adapter
//
// Thin layer over the notification backend. Scheduling problems never
// reach the caller: a refused reminder is logged and reported as `None`,
// and cancelling an unknown handle does nothing.

use std::sync::Arc;

use crate::domain::reminder::{ReminderHandle, ReminderIntent, ScheduledReminder};
use crate::error::AppResult;
use crate::events::{EventBus, ReminderScheduled, ReminderSchedulingFailed};
use crate::integrations::NotificationBackend;

pub struct ReminderScheduler {
    backend: Arc<dyn NotificationBackend>,
    event_bus: Arc<EventBus>,
}

impl ReminderScheduler {
    pub fn new(backend: Arc<dyn NotificationBackend>, event_bus: Arc<EventBus>) -> Self {
        Self { backend, event_bus }
    }

    /// Returns the backend handle, or None if the reminder could not be set
    pub async fn schedule(&self, intent: &ReminderIntent) -> Option<ReminderHandle> {
        let game_id = intent.payload.game_id();

        match self.backend.schedule(intent).await {
            Ok(handle) => {
                log::info!(
                    "Scheduled {} reminder {} at {}",
                    intent.kind(),
                    handle,
                    intent.trigger.fire_at
                );
                self.event_bus.emit(ReminderScheduled::new(
                    handle.clone(),
                    intent.kind(),
                    intent.trigger.fire_at,
                    game_id,
                ));
                Some(handle)
            }
            Err(e) => {
                log::warn!("Could not schedule {} reminder: {}", intent.kind(), e);
                self.event_bus.emit(ReminderSchedulingFailed::new(
                    intent.kind(),
                    game_id,
                    e.to_string(),
                ));
                None
            }
        }
    }

    pub async fn cancel(&self, handle: &ReminderHandle) {
        match self.backend.cancel(handle).await {
            Ok(true) => log::debug!("Cancelled reminder {}", handle),
            Ok(false) => log::debug!("Reminder {} was already gone", handle),
            Err(e) => log::warn!("Could not cancel reminder {}: {}", handle, e),
        }
    }

    pub async fn cancel_many<'a, I>(&self, handles: I)
    where
        I: IntoIterator<Item = &'a ReminderHandle>,
    {
        for handle in handles {
            self.cancel(handle).await;
        }
    }

    pub async fn cancel_all(&self) -> AppResult<usize> {
        let cancelled = self.backend.cancel_all().await?;
        log::info!("Cancelled {} scheduled reminders", cancelled);
        Ok(cancelled)
    }

    pub async fn list_scheduled(&self) -> AppResult<Vec<ScheduledReminder>> {
        self.backend.list_scheduled().await
    }

    pub async fn send_immediate(&self, title: &str, body: &str) -> AppResult<()> {
        self.backend.send_immediate(title, body).await
    }
}
