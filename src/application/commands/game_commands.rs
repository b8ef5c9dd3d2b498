// src/application/commands/game_commands.rs
//
// Game Command Handlers
//
// RULES:
// - Accept DTOs, return DTOs
// - Every mutation is followed by a reminder sync
// - Reminder trouble never fails a mutation that already succeeded

use crate::application::dto::{parse_date, CreateGameDto, GameDto, SetSaleDto, UpdateGameDto};
use crate::application::error_handling::ErrorResponse;
use crate::application::state::AppState;
use crate::domain::game::{Game, GameFilter, GameId, GameSort};
use crate::error::AppError;
use crate::services::SetSaleRequest;

type CommandResult<T> = Result<T, ErrorResponse>;

/// List all games
pub async fn list_games(state: &AppState, sort: GameSort) -> CommandResult<Vec<GameDto>> {
    let games = state.game_service.list_games(sort)?;
    Ok(GameDto::from_games(games, state.now()))
}

/// Get a single game by id
pub async fn get_game(state: &AppState, game_id: GameId) -> CommandResult<Option<GameDto>> {
    let game = state.game_service.get_game(game_id)?;
    Ok(game.map(|g| GameDto::from_game(g, state.now())))
}

/// Open the detail view of a game, clearing its "new" marker
pub async fn open_game(state: &AppState, game_id: GameId) -> CommandResult<GameDto> {
    let was_new = state.game_service.require_game(game_id)?.is_new;
    let game = state.game_service.mark_viewed(game_id)?;
    if was_new {
        refresh_periodic(state).await;
    }
    Ok(GameDto::from_game(game, state.now()))
}

pub async fn create_game(state: &AppState, dto: CreateGameDto) -> CommandResult<GameDto> {
    let request = dto.into_new_game().map_err(AppError::from)?;
    let mut game = state.game_service.create_game(request)?;

    sync_game(state, &mut game).await;
    refresh_periodic(state).await;
    Ok(GameDto::from_game(game, state.now()))
}

pub async fn update_game(
    state: &AppState,
    game_id: GameId,
    dto: UpdateGameDto,
) -> CommandResult<GameDto> {
    let patch = dto.into_patch().map_err(AppError::from)?;
    let release_changed = patch.affects_release_reminder();
    let sale_changed = patch.affects_sale_reminder();

    let mut game = state.game_service.update_game(game_id, patch)?;
    let now = state.now();

    if release_changed {
        if let Err(e) = state
            .reminder_service
            .sync_release_reminder(&mut game, now)
            .await
        {
            log::warn!("Release reminder for game {} not updated: {}", game.id, e);
        }
    }
    if sale_changed {
        if let Err(e) = state.reminder_service.sync_sale_reminder(&mut game, now).await {
            log::warn!("Sale reminder for game {} not updated: {}", game.id, e);
        }
    }
    refresh_periodic(state).await;
    Ok(GameDto::from_game(game, now))
}

pub async fn delete_game(state: &AppState, game_id: GameId) -> CommandResult<()> {
    let game = state.game_service.require_game(game_id)?;
    state.reminder_service.cancel_game_reminders(&game).await;
    state.game_service.delete_game(game_id)?;

    refresh_periodic(state).await;
    Ok(())
}

/// Remove every game. Reminders are cancelled first.
pub async fn clear_catalog(state: &AppState) -> CommandResult<usize> {
    state.reminder_service.clear_all().await;
    let removed = state.game_service.delete_all_games()?;
    Ok(removed)
}

pub async fn search_games(state: &AppState, text: String) -> CommandResult<Vec<GameDto>> {
    let games = state.game_service.search_games(&text)?;
    Ok(GameDto::from_games(games, state.now()))
}

pub async fn filter_games(state: &AppState, filter: GameFilter) -> CommandResult<Vec<GameDto>> {
    let now = state.now();
    let games = state.game_service.filter_games(filter, now)?;
    Ok(GameDto::from_games(games, now))
}

pub async fn toggle_sold(state: &AppState, game_id: GameId) -> CommandResult<GameDto> {
    let game = state.game_service.toggle_sold(game_id)?;
    Ok(GameDto::from_game(game, state.now()))
}

pub async fn toggle_wishlist(state: &AppState, game_id: GameId) -> CommandResult<GameDto> {
    let game = state.game_service.toggle_wishlist(game_id)?;
    refresh_periodic(state).await;
    Ok(GameDto::from_game(game, state.now()))
}

pub async fn set_sale(state: &AppState, dto: SetSaleDto) -> CommandResult<GameDto> {
    let sale_end_date = parse_date(&dto.sale_end_date).map_err(AppError::from)?;
    let now = state.now();

    let mut game = state.game_service.set_sale(
        SetSaleRequest {
            game_id: dto.game_id,
            discount_percent: dto.discount_percent,
            sale_end_date,
        },
        now,
    )?;

    if let Err(e) = state.reminder_service.sync_sale_reminder(&mut game, now).await {
        log::warn!("Sale reminder for game {} not updated: {}", game.id, e);
    }
    refresh_periodic(state).await;
    Ok(GameDto::from_game(game, now))
}

pub async fn remove_sale(state: &AppState, game_id: GameId) -> CommandResult<GameDto> {
    let mut game = state.game_service.remove_sale(game_id)?;
    let now = state.now();

    if let Err(e) = state.reminder_service.sync_sale_reminder(&mut game, now).await {
        log::warn!("Sale reminder for game {} not cleared: {}", game.id, e);
    }
    refresh_periodic(state).await;
    Ok(GameDto::from_game(game, now))
}

/// Pretty-printed JSON backup of the catalog
pub async fn export_catalog(state: &AppState) -> CommandResult<String> {
    Ok(state.game_service.export_json()?)
}

async fn sync_game(state: &AppState, game: &mut Game) {
    if let Err(e) = state
        .reminder_service
        .sync_game_reminders(game, state.now())
        .await
    {
        log::warn!("Reminders for game {} not updated: {}", game.id, e);
    }
}

async fn refresh_periodic(state: &AppState) {
    if let Err(e) = state.reminder_service.refresh_periodic(state.now()).await {
        log::warn!("Periodic reminders not refreshed: {}", e);
    }
}
