// src/services/statistics_service.rs
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::game::GameSort;
use crate::domain::statistics::GameStatistics;
use crate::error::AppResult;
use crate::repositories::GameRepository;

/// Recomputes catalog statistics on demand; nothing is cached
pub struct StatisticsService {
    game_repo: Arc<dyn GameRepository>,
}

impl StatisticsService {
    pub fn new(game_repo: Arc<dyn GameRepository>) -> Self {
        Self { game_repo }
    }

    pub fn calculate(&self, now: NaiveDateTime) -> AppResult<GameStatistics> {
        let games = self.game_repo.list_all(GameSort::DateDesc)?;
        let stats = GameStatistics::from_games(&games, now);

        log::debug!(
            "Statistics: {} games, {} on sale, total value {:.2}",
            stats.total,
            stats.on_sale_count,
            stats.total_value
        );
        Ok(stats)
    }
}
