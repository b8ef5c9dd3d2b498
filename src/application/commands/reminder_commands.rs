// src/application/commands/reminder_commands.rs

use crate::application::dto::ScheduledReminderDto;
use crate::application::error_handling::ErrorResponse;
use crate::application::state::AppState;
use crate::domain::reminder::{ReminderPayload, ReminderResponse};
use crate::services::ActionOutcome;

/// Reminders currently held by the notification backend
pub async fn list_reminders(state: &AppState) -> Result<Vec<ScheduledReminderDto>, ErrorResponse> {
    let reminders = state.reminder_service.list_scheduled().await?;
    Ok(reminders.into_iter().map(ScheduledReminderDto::from).collect())
}

/// Recompute the wishlist, monthly and new-games reminders
pub async fn refresh_reminders(state: &AppState) -> Result<usize, ErrorResponse> {
    Ok(state.reminder_service.refresh_periodic(state.now()).await?)
}

/// Show a notification right away to check the backend works
pub async fn send_test_notification(state: &AppState) -> Result<(), ErrorResponse> {
    state
        .reminder_service
        .send_immediate("GameShelf", "Notifications are working")
        .await?;
    Ok(())
}

/// Handle the user's response to a delivered reminder
pub async fn respond_to_reminder(
    state: &AppState,
    action_identifier: String,
    payload: Option<ReminderPayload>,
) -> Result<ActionOutcome, ErrorResponse> {
    let response = ReminderResponse::new(action_identifier, payload);
    Ok(state.action_router.dispatch(&response, state.now()).await?)
}
