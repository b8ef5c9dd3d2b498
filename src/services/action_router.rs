// src/services/action_router.rs
//
// Routes the user's response to a delivered reminder.
// Holds no state of its own.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::domain::game::GameId;
use crate::domain::reminder::{DeliveredReminder, ReminderAction, ReminderResponse};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, ReminderActionHandled};
use crate::services::{GameService, ReminderService};

/// What the host should do after an action was handled
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "game_id", rename_all = "kebab-case")]
pub enum ActionOutcome {
    ShowGame(Option<GameId>),
    ShowWishlist,
    ShowStatistics,
    ShowNewGames,
    /// Carries the id even when the record was already gone
    Deleted(GameId),
    Ignored,
}

pub struct ActionRouter {
    game_service: Arc<GameService>,
    reminder_service: Arc<ReminderService>,
    event_bus: Arc<EventBus>,
}

impl ActionRouter {
    pub fn new(
        game_service: Arc<GameService>,
        reminder_service: Arc<ReminderService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            game_service,
            reminder_service,
            event_bus,
        }
    }

    pub async fn dispatch(
        &self,
        response: &ReminderResponse,
        now: NaiveDateTime,
    ) -> AppResult<ActionOutcome> {
        let game_id = response.payload.as_ref().and_then(|p| p.game_id());

        let Some(action) = ReminderAction::from_identifier(&response.action_identifier) else {
            log::warn!(
                "Ignoring unknown reminder action '{}'",
                response.action_identifier
            );
            return Ok(ActionOutcome::Ignored);
        };

        let outcome = match action {
            ReminderAction::View => ActionOutcome::ShowGame(game_id),
            ReminderAction::ViewWishlist => ActionOutcome::ShowWishlist,
            ReminderAction::ViewStats => ActionOutcome::ShowStatistics,
            ReminderAction::ViewNew => ActionOutcome::ShowNewGames,
            ReminderAction::RemindLater | ReminderAction::Dismiss => ActionOutcome::Ignored,
            ReminderAction::Delete => match game_id {
                Some(id) => self.delete_game(id, now).await?,
                None => {
                    log::warn!("Delete action without a game, ignoring");
                    ActionOutcome::Ignored
                }
            },
        };

        log::info!("Reminder action '{}' -> {:?}", action.identifier(), outcome);
        self.event_bus.emit(ReminderActionHandled::new(
            action.identifier().to_string(),
            game_id,
        ));
        Ok(outcome)
    }

    /// A reminder was shown without any user interaction
    pub fn on_notice(&self, reminder: &DeliveredReminder) {
        log::info!("Reminder shown: {} ({})", reminder.title, reminder.handle);
    }

    /// Handle responses until every sender is dropped.
    /// Returns the number of responses received.
    pub async fn run(&self, mut receiver: mpsc::Receiver<ReminderResponse>) -> usize {
        let mut handled = 0;
        while let Some(response) = receiver.recv().await {
            handled += 1;
            let now = Local::now().naive_local();
            if let Err(e) = self.dispatch(&response, now).await {
                log::error!(
                    "Reminder action '{}' failed: {}",
                    response.action_identifier,
                    e
                );
            }
        }
        log::debug!("Action router stopped after {} responses", handled);
        handled
    }

    async fn delete_game(&self, game_id: GameId, now: NaiveDateTime) -> AppResult<ActionOutcome> {
        if let Some(game) = self.game_service.get_game(game_id)? {
            self.reminder_service.cancel_game_reminders(&game).await;
        }

        match self.game_service.delete_game(game_id) {
            Ok(()) => {}
            Err(AppError::NotFound(_)) => {
                log::info!("Game {} was already deleted", game_id);
            }
            Err(e) => return Err(e),
        }

        self.reminder_service.refresh_periodic(now).await?;
        Ok(ActionOutcome::Deleted(game_id))
    }
}
