// src/integrations/notifications/backend.rs
//
// Notification backend contract
//
// RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Handles are opaque outside the backend
// - Failures are returned, never swallowed; the caller decides

use async_trait::async_trait;

use crate::domain::reminder::{ReminderHandle, ReminderIntent, ScheduledReminder};
use crate::error::AppResult;

/// A host service able to show notifications at a future time
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Register a reminder and return the handle identifying it
    async fn schedule(&self, intent: &ReminderIntent) -> AppResult<ReminderHandle>;

    /// Returns false if the handle was unknown or already fired
    async fn cancel(&self, handle: &ReminderHandle) -> AppResult<bool>;

    /// Returns the number of cancelled reminders
    async fn cancel_all(&self) -> AppResult<usize>;

    async fn list_scheduled(&self) -> AppResult<Vec<ScheduledReminder>>;

    /// Show a notification right away, without scheduling it
    async fn send_immediate(&self, title: &str, body: &str) -> AppResult<()>;
}
