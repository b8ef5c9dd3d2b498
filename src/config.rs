// src/config.rs
//
// Runtime configuration, read from the environment with defaults.

use std::path::PathBuf;

use crate::db::get_database_path;
use crate::domain::reminder::ReminderRules;
use crate::error::AppResult;
use crate::events::DEFAULT_EVENT_LOG_CAPACITY;

/// Database file location override
pub const DB_PATH_ENV: &str = "GAMESHELF_DB";
/// Connection pool size override
pub const POOL_SIZE_ENV: &str = "GAMESHELF_POOL_SIZE";
/// Number of recent events kept in memory
pub const EVENT_LOG_CAPACITY_ENV: &str = "GAMESHELF_EVENT_LOG_CAPACITY";

fn default_pool_size() -> u32 {
    4
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub database_path: PathBuf,
    pub pool_size: u32,
    pub rules: ReminderRules,
    pub event_log_capacity: usize,
}

impl CatalogConfig {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            pool_size: default_pool_size(),
            rules: ReminderRules::default(),
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }

    pub fn from_env() -> AppResult<Self> {
        let database_path = match std::env::var_os(DB_PATH_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => get_database_path()?,
        };

        let pool_size = std::env::var(POOL_SIZE_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|size: &u32| *size > 0)
            .unwrap_or_else(default_pool_size);

        let event_log_capacity = std::env::var(EVENT_LOG_CAPACITY_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|capacity: &usize| *capacity > 0)
            .unwrap_or(DEFAULT_EVENT_LOG_CAPACITY);

        Ok(Self {
            database_path,
            pool_size,
            rules: ReminderRules::default(),
            event_log_capacity,
        })
    }

    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }
}
