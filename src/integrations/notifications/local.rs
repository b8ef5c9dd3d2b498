// src/integrations/notifications/local.rs
//
// SQLite-backed notification backend
//
// Scheduled reminders live in the `scheduled_reminders` table so they
// survive restarts. `deliver_due` plays the role of the OS firing them:
// due reminders are removed (or re-armed when recurring) and pushed onto
// the delivery channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use tokio::sync::mpsc;

use super::backend::NotificationBackend;
use crate::db::ConnectionPool;
use crate::domain::reminder::{
    DeliveredReminder, ReminderHandle, ReminderIntent, ReminderPayload, ReminderTrigger, Repeat,
    ScheduledReminder,
};
use crate::error::{AppError, AppResult};

const FIRE_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub struct LocalNotificationBackend {
    pool: Arc<ConnectionPool>,
    permission_granted: AtomicBool,
    deliveries: Option<mpsc::Sender<DeliveredReminder>>,
}

impl LocalNotificationBackend {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self {
            pool,
            permission_granted: AtomicBool::new(true),
            deliveries: None,
        }
    }

    /// Delivered reminders are also sent to `sender`
    pub fn with_delivery_channel(mut self, sender: mpsc::Sender<DeliveredReminder>) -> Self {
        self.deliveries = Some(sender);
        self
    }

    /// Simulates the user granting or revoking notification permission
    pub fn set_permission(&self, granted: bool) {
        self.permission_granted.store(granted, Ordering::SeqCst);
    }

    pub fn has_permission(&self) -> bool {
        self.permission_granted.load(Ordering::SeqCst)
    }

    fn ensure_permission(&self) -> AppResult<()> {
        if self.has_permission() {
            Ok(())
        } else {
            Err(AppError::Scheduling(
                "Notification permission not granted".to_string(),
            ))
        }
    }

    /// Fire every reminder due at `now`.
    ///
    /// One-shot reminders are removed; recurring ones move to their first
    /// occurrence after `now`.
    pub async fn deliver_due(&self, now: NaiveDateTime) -> AppResult<Vec<DeliveredReminder>> {
        let due = {
            let conn = self.pool.get()?;
            take_due(&conn, now)?
        };

        let delivered: Vec<DeliveredReminder> = due
            .into_iter()
            .map(|reminder| DeliveredReminder {
                handle: reminder.handle,
                title: reminder.title,
                body: reminder.body,
                payload: Some(reminder.payload),
                delivered_at: now,
            })
            .collect();

        for reminder in &delivered {
            log::info!("Delivered reminder {}: {}", reminder.handle, reminder.title);
            self.forward(reminder.clone()).await;
        }

        Ok(delivered)
    }

    async fn forward(&self, reminder: DeliveredReminder) {
        if let Some(sender) = &self.deliveries {
            if sender.send(reminder).await.is_err() {
                log::warn!("Delivery channel closed, reminder dropped");
            }
        }
    }

    fn row_to_reminder(row: &Row) -> Result<ScheduledReminder, rusqlite::Error> {
        let fire_at: String = row.get("fire_at")?;
        let fire_at = NaiveDateTime::parse_from_str(&fire_at, FIRE_AT_FORMAT)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let repeat: String = row.get("repeat")?;
        let repeat = repeat
            .parse::<Repeat>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(e.into()))?;

        let payload: String = row.get("payload")?;
        let payload: ReminderPayload = serde_json::from_str(&payload)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(ScheduledReminder {
            handle: ReminderHandle::new(row.get::<_, String>("handle")?),
            trigger: ReminderTrigger { fire_at, repeat },
            title: row.get("title")?,
            body: row.get("body")?,
            payload,
        })
    }
}

fn take_due(conn: &Connection, now: NaiveDateTime) -> AppResult<Vec<ScheduledReminder>> {
    let tx = conn.unchecked_transaction()?;

    let due: Vec<ScheduledReminder> = {
        let mut stmt = tx.prepare(
            "SELECT handle, fire_at, repeat, title, body, payload
             FROM scheduled_reminders
             WHERE fire_at <= ?1
             ORDER BY fire_at ASC",
        )?;
        let rows = stmt
            .query_map(
                params![now.format(FIRE_AT_FORMAT).to_string()],
                LocalNotificationBackend::row_to_reminder,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        rows
    };

    for reminder in &due {
        match next_fire_after(&reminder.trigger, now) {
            Some(next) => {
                tx.execute(
                    "UPDATE scheduled_reminders SET fire_at = ?2 WHERE handle = ?1",
                    params![
                        reminder.handle.as_str(),
                        next.format(FIRE_AT_FORMAT).to_string()
                    ],
                )?;
            }
            None => {
                tx.execute(
                    "DELETE FROM scheduled_reminders WHERE handle = ?1",
                    params![reminder.handle.as_str()],
                )?;
            }
        }
    }

    tx.commit()?;
    Ok(due)
}

/// First occurrence strictly after `now`, or None for one-shot triggers
fn next_fire_after(trigger: &ReminderTrigger, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let mut current = *trigger;
    loop {
        let next = current.next_occurrence()?;
        if next > now {
            return Some(next);
        }
        current.fire_at = next;
    }
}

#[async_trait]
impl NotificationBackend for LocalNotificationBackend {
    async fn schedule(&self, intent: &ReminderIntent) -> AppResult<ReminderHandle> {
        self.ensure_permission()?;

        let handle = ReminderHandle::generate();
        let payload = serde_json::to_string(&intent.payload)?;
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO scheduled_reminders (
                handle, kind, fire_at, repeat, title, body, payload, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                handle.as_str(),
                intent.kind().as_str(),
                intent.trigger.fire_at.format(FIRE_AT_FORMAT).to_string(),
                intent.trigger.repeat.to_string(),
                intent.title,
                intent.body,
                payload,
                Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;

        log::debug!(
            "Scheduled {} reminder {} for {}",
            intent.kind(),
            handle,
            intent.trigger.fire_at
        );
        Ok(handle)
    }

    async fn cancel(&self, handle: &ReminderHandle) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let rows_affected = conn.execute(
            "DELETE FROM scheduled_reminders WHERE handle = ?1",
            params![handle.as_str()],
        )?;
        Ok(rows_affected > 0)
    }

    async fn cancel_all(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let removed = conn.execute("DELETE FROM scheduled_reminders", [])?;
        Ok(removed)
    }

    async fn list_scheduled(&self) -> AppResult<Vec<ScheduledReminder>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT handle, fire_at, repeat, title, body, payload
             FROM scheduled_reminders
             ORDER BY fire_at ASC, handle ASC",
        )?;
        let reminders = stmt
            .query_map([], Self::row_to_reminder)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reminders)
    }

    async fn send_immediate(&self, title: &str, body: &str) -> AppResult<()> {
        self.ensure_permission()?;

        let reminder = DeliveredReminder {
            handle: ReminderHandle::generate(),
            title: title.to_string(),
            body: body.to_string(),
            payload: None,
            delivered_at: Local::now().naive_local(),
        };
        log::info!("Notification: {} - {}", reminder.title, reminder.body);
        self.forward(reminder).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_connection_pool, initialize_database};
    use crate::domain::game::entity::tests::at;
    use tempfile::TempDir;

    fn backend() -> (TempDir, LocalNotificationBackend) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool(&dir.path().join("reminders.db"), 2).unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        (dir, LocalNotificationBackend::new(Arc::new(pool)))
    }

    fn release_intent(fire_at: NaiveDateTime) -> ReminderIntent {
        ReminderIntent {
            trigger: ReminderTrigger::once(fire_at),
            title: "Releasing tomorrow".to_string(),
            body: "Hades II".to_string(),
            payload: ReminderPayload::Release {
                game_id: 1,
                title: "Hades II".to_string(),
            },
        }
    }

    fn wishlist_intent(fire_at: NaiveDateTime) -> ReminderIntent {
        ReminderIntent {
            trigger: ReminderTrigger {
                fire_at,
                repeat: Repeat::Weekly,
            },
            title: "Wishlist".to_string(),
            body: "2 games".to_string(),
            payload: ReminderPayload::Wishlist { wishlist_count: 2 },
        }
    }

    #[tokio::test]
    async fn test_schedule_list_and_cancel() {
        let (_dir, backend) = backend();
        let handle = backend.schedule(&release_intent(at(2026, 3, 9, 10))).await.unwrap();

        let scheduled = backend.list_scheduled().await.unwrap();
        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].handle, handle);
        assert_eq!(scheduled[0].trigger.fire_at, at(2026, 3, 9, 10));
        assert_eq!(scheduled[0].payload.game_id(), Some(1));

        assert!(backend.cancel(&handle).await.unwrap());
        assert!(!backend.cancel(&handle).await.unwrap());
        assert!(backend.list_scheduled().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_revoked_permission_refuses_scheduling() {
        let (_dir, backend) = backend();
        backend.set_permission(false);

        let result = backend.schedule(&release_intent(at(2026, 3, 9, 10))).await;
        assert!(matches!(result, Err(AppError::Scheduling(_))));
        assert!(backend.send_immediate("Test", "body").await.is_err());
        assert!(backend.list_scheduled().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_all_counts_removed() {
        let (_dir, backend) = backend();
        backend.schedule(&release_intent(at(2026, 3, 9, 10))).await.unwrap();
        backend.schedule(&wishlist_intent(at(2026, 3, 2, 12))).await.unwrap();

        assert_eq!(backend.cancel_all().await.unwrap(), 2);
        assert_eq!(backend.cancel_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deliver_due_fires_and_rearms() {
        let (tx, mut rx) = mpsc::channel(8);
        let (_dir, backend) = backend();
        let backend = backend.with_delivery_channel(tx);

        backend.schedule(&release_intent(at(2026, 3, 9, 10))).await.unwrap();
        let weekly = backend.schedule(&wishlist_intent(at(2026, 3, 2, 12))).await.unwrap();

        assert!(backend.deliver_due(at(2026, 3, 1, 12)).await.unwrap().is_empty());

        // Both are due; the weekly one skips ahead past `now`
        let delivered = backend.deliver_due(at(2026, 3, 10, 9)).await.unwrap();
        assert_eq!(delivered.len(), 2);
        assert_eq!(rx.recv().await.unwrap().handle, weekly);

        let remaining = backend.list_scheduled().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].handle, weekly);
        assert_eq!(remaining[0].trigger.fire_at, at(2026, 3, 16, 12));
    }

    #[tokio::test]
    async fn test_send_immediate_reaches_channel() {
        let (tx, mut rx) = mpsc::channel(1);
        let (_dir, backend) = backend();
        let backend = backend.with_delivery_channel(tx);

        backend.send_immediate("Test", "It works").await.unwrap();

        let delivered = rx.recv().await.unwrap();
        assert_eq!(delivered.title, "Test");
        assert!(delivered.payload.is_none());
    }
}
