// src/services/game_service.rs
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::game::{
    validate_game, validate_new_game, Game, GameFilter, GameId, GamePatch, GameSort, NewGame,
};
use crate::error::{AppError, AppResult};
use crate::events::{
    CatalogCleared, EventBus, GameCreated, GameDeleted, GameUpdated, SaleApplied, SaleRemoved,
};
use crate::repositories::GameRepository;

#[derive(Debug, Clone)]
pub struct SetSaleRequest {
    pub game_id: GameId,
    pub discount_percent: u32,
    /// First day the sale no longer applies
    pub sale_end_date: NaiveDate,
}

/// Record store operations. Never touches reminders or statistics.
pub struct GameService {
    game_repo: Arc<dyn GameRepository>,
    event_bus: Arc<EventBus>,
}

impl GameService {
    pub fn new(game_repo: Arc<dyn GameRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            game_repo,
            event_bus,
        }
    }

    pub fn create_game(&self, request: NewGame) -> AppResult<Game> {
        let request = request.normalized();
        validate_new_game(&request)?;

        let game = self.game_repo.insert(&request)?;
        log::info!("Created game {} ({})", game.id, game.title);

        self.event_bus
            .emit(GameCreated::new(game.id, game.title.clone()));
        Ok(game)
    }

    pub fn get_game(&self, game_id: GameId) -> AppResult<Option<Game>> {
        self.game_repo.get_by_id(game_id)
    }

    /// Like `get_game`, but a missing record is an error
    pub fn require_game(&self, game_id: GameId) -> AppResult<Game> {
        self.game_repo
            .get_by_id(game_id)?
            .ok_or(AppError::NotFound(game_id))
    }

    pub fn list_games(&self, sort: GameSort) -> AppResult<Vec<Game>> {
        self.game_repo.list_all(sort)
    }

    pub fn update_game(&self, game_id: GameId, patch: GamePatch) -> AppResult<Game> {
        let mut game = self.require_game(game_id)?;
        if patch.is_empty() {
            return Ok(game);
        }

        game.apply_patch(patch);
        validate_game(&game)?;
        self.persist(&game)?;
        Ok(game)
    }

    pub fn delete_game(&self, game_id: GameId) -> AppResult<()> {
        self.game_repo.delete(game_id)?;
        log::info!("Deleted game {}", game_id);

        self.event_bus.emit(GameDeleted::new(game_id));
        Ok(())
    }

    /// Returns the number of removed records
    pub fn delete_all_games(&self) -> AppResult<usize> {
        let removed = self.game_repo.delete_all()?;
        log::info!("Cleared catalog ({} games)", removed);

        self.event_bus.emit(CatalogCleared::new(removed));
        Ok(removed)
    }

    pub fn search_games(&self, text: &str) -> AppResult<Vec<Game>> {
        self.game_repo.search(text)
    }

    pub fn filter_games(&self, filter: GameFilter, now: NaiveDateTime) -> AppResult<Vec<Game>> {
        self.game_repo.list_by_filter(filter, now.date())
    }

    pub fn wishlist_games(&self) -> AppResult<Vec<Game>> {
        self.game_repo
            .list_by_filter(GameFilter::Wishlist, NaiveDate::MIN)
    }

    pub fn new_games(&self) -> AppResult<Vec<Game>> {
        self.game_repo.list_by_filter(GameFilter::New, NaiveDate::MIN)
    }

    pub fn games_on_sale(&self, now: NaiveDateTime) -> AppResult<Vec<Game>> {
        self.filter_games(GameFilter::Sale, now)
    }

    pub fn upcoming_games(&self, now: NaiveDateTime) -> AppResult<Vec<Game>> {
        self.filter_games(GameFilter::Upcoming, now)
    }

    pub fn toggle_sold(&self, game_id: GameId) -> AppResult<Game> {
        let mut game = self.require_game(game_id)?;
        game.toggle_sold();
        self.persist(&game)?;
        Ok(game)
    }

    pub fn toggle_wishlist(&self, game_id: GameId) -> AppResult<Game> {
        let mut game = self.require_game(game_id)?;
        game.toggle_wishlist();
        self.persist(&game)?;
        Ok(game)
    }

    /// Clears the "new" marker. Already viewed records are left untouched.
    pub fn mark_viewed(&self, game_id: GameId) -> AppResult<Game> {
        let mut game = self.require_game(game_id)?;
        if game.mark_viewed() {
            self.persist(&game)?;
        }
        Ok(game)
    }

    pub fn set_sale(&self, request: SetSaleRequest, now: NaiveDateTime) -> AppResult<Game> {
        let mut game = self.require_game(request.game_id)?;

        game.apply_sale(request.discount_percent, request.sale_end_date, now.date())?;
        validate_game(&game)?;
        self.persist(&game)?;

        self.event_bus.emit(SaleApplied::new(
            game.id,
            request.discount_percent,
            game.price,
        ));
        Ok(game)
    }

    pub fn remove_sale(&self, game_id: GameId) -> AppResult<Game> {
        let mut game = self.require_game(game_id)?;

        if game.remove_sale() {
            self.persist(&game)?;
            self.event_bus.emit(SaleRemoved::new(game.id, game.price));
        }
        Ok(game)
    }

    /// Pretty-printed JSON backup of every record, oldest first
    pub fn export_json(&self) -> AppResult<String> {
        let games = self.game_repo.list_all(GameSort::DateAsc)?;
        Ok(serde_json::to_string_pretty(&games)?)
    }

    fn persist(&self, game: &Game) -> AppResult<()> {
        self.game_repo.save(game)?;
        self.event_bus.emit(GameUpdated::new(game.id));
        Ok(())
    }
}
