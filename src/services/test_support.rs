// src/services/test_support.rs
//
// Shared wiring for service tests: a real on-disk store plus any
// notification backend.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tempfile::TempDir;

use crate::db::{create_connection_pool, initialize_database};
use crate::domain::game::entity::tests::{at, date};
use crate::domain::game::NewGame;
use crate::domain::reminder::ReminderPolicy;
use crate::events::EventBus;
use crate::integrations::{LocalNotificationBackend, NotificationBackend};
use crate::repositories::{GameRepository, SqliteGameRepository};
use crate::services::{
    ActionRouter, GameService, ReminderScheduler, ReminderService, StatisticsService,
};

/// Sunday 2026-03-01, 09:00 local
pub(crate) fn now() -> NaiveDateTime {
    at(2026, 3, 1, 9)
}

pub(crate) fn new_game(title: &str, price: f64) -> NewGame {
    NewGame::new(title, "Adventure", price, date(2025, 6, 1))
}

pub(crate) struct Harness {
    _dir: TempDir,
    pub repo: Arc<dyn GameRepository>,
    pub event_bus: Arc<EventBus>,
    pub games: Arc<GameService>,
    pub statistics: Arc<StatisticsService>,
    pub reminders: Arc<ReminderService>,
    pub router: ActionRouter,
}

impl Harness {
    pub fn with_backend(backend: Arc<dyn NotificationBackend>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool(&dir.path().join("shelf.db"), 4).unwrap();
        initialize_database(&pool.get().unwrap()).unwrap();
        Self::wire(dir, Arc::new(pool), backend)
    }

    /// Harness backed by the SQLite notification backend
    pub fn local() -> (Self, Arc<LocalNotificationBackend>) {
        let dir = tempfile::tempdir().unwrap();
        let pool = Arc::new(create_connection_pool(&dir.path().join("shelf.db"), 4).unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();

        let backend = Arc::new(LocalNotificationBackend::new(Arc::clone(&pool)));
        let harness = Self::wire(dir, pool, backend.clone());
        (harness, backend)
    }

    fn wire(
        dir: TempDir,
        pool: Arc<crate::db::ConnectionPool>,
        backend: Arc<dyn NotificationBackend>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let repo: Arc<dyn GameRepository> = Arc::new(SqliteGameRepository::new(pool));

        let games = Arc::new(GameService::new(Arc::clone(&repo), Arc::clone(&event_bus)));
        let statistics = Arc::new(StatisticsService::new(Arc::clone(&repo)));
        let scheduler = Arc::new(ReminderScheduler::new(backend, Arc::clone(&event_bus)));
        let reminders = Arc::new(ReminderService::new(
            scheduler,
            Arc::clone(&repo),
            Arc::clone(&statistics),
            ReminderPolicy::default(),
        ));
        let router = ActionRouter::new(
            Arc::clone(&games),
            Arc::clone(&reminders),
            Arc::clone(&event_bus),
        );

        Self {
            _dir: dir,
            repo,
            event_bus,
            games,
            statistics,
            reminders,
            router,
        }
    }
}
