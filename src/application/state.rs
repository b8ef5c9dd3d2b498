// src/application/state.rs

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use crate::config::CatalogConfig;
use crate::db::{create_connection_pool, get_connection, initialize_database, ConnectionPool};
use crate::domain::reminder::ReminderPolicy;
use crate::error::AppResult;
use crate::events::EventBus;
use crate::integrations::NotificationBackend;
use crate::repositories::{GameRepository, SqliteGameRepository};
use crate::services::{
    ActionRouter, GameService, ReminderScheduler, ReminderService, StatisticsService,
};

/// Where commands read the current local time from
#[derive(Debug, Clone, Copy)]
enum Clock {
    System,
    Fixed(NaiveDateTime),
}

/// Application state shared by every command.
/// All fields are Arc-wrapped so the host can hand clones to tasks.
pub struct AppState {
    pub pool: Arc<ConnectionPool>,
    pub event_bus: Arc<EventBus>,
    pub game_service: Arc<GameService>,
    pub statistics_service: Arc<StatisticsService>,
    pub reminder_service: Arc<ReminderService>,
    pub action_router: Arc<ActionRouter>,
    clock: Clock,
}

impl AppState {
    /// Wire repositories and services over an initialized pool.
    /// Fails when the configured reminder rules are invalid.
    pub fn build(
        pool: Arc<ConnectionPool>,
        backend: Arc<dyn NotificationBackend>,
        config: &CatalogConfig,
    ) -> AppResult<Self> {
        // 1. INFRASTRUCTURE
        let event_bus = Arc::new(EventBus::with_capacity(config.event_log_capacity));

        // 2. REPOSITORIES
        let game_repo: Arc<dyn GameRepository> =
            Arc::new(SqliteGameRepository::new(pool.clone()));

        // 3. SERVICES
        let game_service = Arc::new(GameService::new(game_repo.clone(), event_bus.clone()));
        let statistics_service = Arc::new(StatisticsService::new(game_repo.clone()));
        let scheduler = Arc::new(ReminderScheduler::new(backend, event_bus.clone()));
        let reminder_service = Arc::new(ReminderService::new(
            scheduler,
            game_repo,
            statistics_service.clone(),
            ReminderPolicy::new(config.rules.clone())?,
        ));
        let action_router = Arc::new(ActionRouter::new(
            game_service.clone(),
            reminder_service.clone(),
            event_bus.clone(),
        ));

        Ok(Self {
            pool,
            event_bus,
            game_service,
            statistics_service,
            reminder_service,
            action_router,
            clock: Clock::System,
        })
    }

    /// Pin the clock, so every command sees the same `now`
    pub fn with_fixed_clock(mut self, now: NaiveDateTime) -> Self {
        self.clock = Clock::Fixed(now);
        self
    }

    /// Current local wall-clock time
    pub fn now(&self) -> NaiveDateTime {
        match self.clock {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(now) => now,
        }
    }
}

/// Open the pool described by `config` and bring the schema up to date
pub fn open_database(config: &CatalogConfig) -> AppResult<Arc<ConnectionPool>> {
    let pool = create_connection_pool(&config.database_path, config.pool_size)?;
    {
        let conn = get_connection(&pool)?;
        initialize_database(&conn)?;
    }
    log::info!("Opened catalog at {}", config.database_path.display());
    Ok(Arc::new(pool))
}
