// src/repositories/game_repository.rs
//
// Game persistence

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::game::{
    Game, GameFilter, GameId, GameSort, NewGame, Rating, ReminderHandles, SaleState,
};
use crate::domain::reminder::ReminderHandle;
use crate::error::{AppError, AppResult};

pub trait GameRepository: Send + Sync {
    /// Insert and return the stored record with its assigned id
    fn insert(&self, game: &NewGame) -> AppResult<Game>;
    /// Overwrite every mutable column of an existing record
    fn save(&self, game: &Game) -> AppResult<()>;
    fn get_by_id(&self, id: GameId) -> AppResult<Option<Game>>;
    fn list_all(&self, sort: GameSort) -> AppResult<Vec<Game>>;
    /// Case-insensitive substring match on title or description
    fn search(&self, text: &str) -> AppResult<Vec<Game>>;
    fn list_by_filter(&self, filter: GameFilter, today: NaiveDate) -> AppResult<Vec<Game>>;
    fn update_reminder_handles(&self, id: GameId, handles: &ReminderHandles) -> AppResult<()>;
    fn delete(&self, id: GameId) -> AppResult<()>;
    /// Returns the number of removed records
    fn delete_all(&self) -> AppResult<usize>;
    fn count(&self) -> AppResult<i64>;
}

const GAME_COLUMNS: &str = "id, title, price, description, category, image, release_date, rating,
    sold, is_wishlist, is_new, original_price, discount_percent, sale_end_date,
    notification_id, sale_notification_id, notify_on_release, created_at, updated_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteGameRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteGameRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to Game - returns rusqlite::Error for query_map compatibility
    fn row_to_game(row: &Row) -> Result<Game, rusqlite::Error> {
        let rating_str: String = row.get("rating")?;
        let rating = rating_str
            .parse::<Rating>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let release_date = parse_date(&row.get::<_, String>("release_date")?)?;

        let original_price: Option<f64> = row.get("original_price")?;
        let discount_percent: Option<i64> = row.get("discount_percent")?;
        let sale_end_date: Option<String> = row.get("sale_end_date")?;
        let sale = match (original_price, discount_percent, sale_end_date) {
            (Some(original_price), Some(discount_percent), Some(end)) => Some(SaleState {
                original_price,
                discount_percent: u32::try_from(discount_percent)
                    .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?,
                sale_end_date: parse_date(&end)?,
            }),
            _ => None,
        };

        let release_handle: Option<String> = row.get("notification_id")?;
        let sale_handle: Option<String> = row.get("sale_notification_id")?;

        let created_at = parse_timestamp(&row.get::<_, String>("created_at")?)?;
        let updated_at = row
            .get::<_, Option<String>>("updated_at")?
            .map(|s| parse_timestamp(&s))
            .transpose()?
            .unwrap_or(created_at);

        Ok(Game {
            id: row.get("id")?,
            title: row.get("title")?,
            price: row.get("price")?,
            description: row.get("description")?,
            category: row.get("category")?,
            image: row.get("image")?,
            release_date,
            rating,
            sold: row.get("sold")?,
            is_wishlist: row.get("is_wishlist")?,
            is_new: row.get("is_new")?,
            sale,
            reminders: ReminderHandles {
                release: release_handle.map(ReminderHandle::new),
                sale: sale_handle.map(ReminderHandle::new),
            },
            notify_on_release: row.get("notify_on_release")?,
            created_at,
            updated_at,
        })
    }

    fn query_games(&self, sql: &str, params: impl rusqlite::Params) -> AppResult<Vec<Game>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(sql)?;
        let games: Vec<Game> = stmt
            .query_map(params, Self::row_to_game)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(games)
    }
}

impl GameRepository for SqliteGameRepository {
    fn insert(&self, game: &NewGame) -> AppResult<Game> {
        let conn = self.pool.get()?;
        let now = format_timestamp(Utc::now());

        conn.execute(
            "INSERT INTO games (
                title, price, description, category, image, release_date, rating,
                sold, is_wishlist, is_new, notify_on_release, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, 1, ?9, ?10, ?10)",
            params![
                game.title,
                game.price,
                game.description,
                game.category,
                game.image,
                game.release_date.format(DATE_FORMAT).to_string(),
                game.rating.to_string(),
                game.is_wishlist,
                game.notify_on_release,
                now,
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_by_id(id)?.ok_or(AppError::NotFound(id))
    }

    fn save(&self, game: &Game) -> AppResult<()> {
        let conn = self.pool.get()?;
        let sale = game.sale.as_ref();

        let rows_affected = conn.execute(
            "UPDATE games SET
                title = ?2, price = ?3, description = ?4, category = ?5, image = ?6,
                release_date = ?7, rating = ?8, sold = ?9, is_wishlist = ?10, is_new = ?11,
                original_price = ?12, discount_percent = ?13, sale_end_date = ?14,
                notification_id = ?15, sale_notification_id = ?16, notify_on_release = ?17,
                updated_at = ?18
             WHERE id = ?1",
            params![
                game.id,
                game.title,
                game.price,
                game.description,
                game.category,
                game.image,
                game.release_date.format(DATE_FORMAT).to_string(),
                game.rating.to_string(),
                game.sold,
                game.is_wishlist,
                game.is_new,
                sale.map(|s| s.original_price),
                sale.map(|s| i64::from(s.discount_percent)),
                sale.map(|s| s.sale_end_date.format(DATE_FORMAT).to_string()),
                game.reminders.release.as_ref().map(|h| h.as_str()),
                game.reminders.sale.as_ref().map(|h| h.as_str()),
                game.notify_on_release,
                format_timestamp(game.updated_at),
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound(game.id));
        }

        Ok(())
    }

    fn get_by_id(&self, id: GameId) -> AppResult<Option<Game>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM games WHERE id = ?1", GAME_COLUMNS))?;

        match stmt.query_row(params![id], Self::row_to_game) {
            Ok(game) => Ok(Some(game)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self, sort: GameSort) -> AppResult<Vec<Game>> {
        let mut games = self.query_games(
            &format!("SELECT {} FROM games ORDER BY {}", GAME_COLUMNS, sort.order_by()),
            [],
        )?;
        sort.sort_in_memory(&mut games);
        Ok(games)
    }

    fn search(&self, text: &str) -> AppResult<Vec<Game>> {
        // SQLite's LIKE folds ASCII only; match in Rust so any script works
        let needle = text.trim().to_lowercase();
        let games = self.list_all(GameSort::DateDesc)?;
        if needle.is_empty() {
            return Ok(games);
        }

        Ok(games
            .into_iter()
            .filter(|game| {
                game.title.to_lowercase().contains(&needle)
                    || game
                        .description
                        .as_deref()
                        .map_or(false, |d| d.to_lowercase().contains(&needle))
            })
            .collect())
    }

    fn list_by_filter(&self, filter: GameFilter, today: NaiveDate) -> AppResult<Vec<Game>> {
        let order = GameSort::DateDesc.order_by();
        let today = today.format(DATE_FORMAT).to_string();

        match filter {
            GameFilter::All => self.list_all(GameSort::DateDesc),
            GameFilter::Wishlist => self.query_games(
                &format!("SELECT {} FROM games WHERE is_wishlist = 1 ORDER BY {}", GAME_COLUMNS, order),
                [],
            ),
            GameFilter::New => self.query_games(
                &format!("SELECT {} FROM games WHERE is_new = 1 ORDER BY {}", GAME_COLUMNS, order),
                [],
            ),
            GameFilter::Sold => self.query_games(
                &format!("SELECT {} FROM games WHERE sold = 1 ORDER BY {}", GAME_COLUMNS, order),
                [],
            ),
            GameFilter::Sale => self.query_games(
                &format!(
                    "SELECT {} FROM games
                     WHERE original_price IS NOT NULL
                       AND discount_percent IS NOT NULL
                       AND sale_end_date IS NOT NULL
                       AND sale_end_date > ?1
                     ORDER BY {}",
                    GAME_COLUMNS, order
                ),
                params![today],
            ),
            GameFilter::Upcoming => self.query_games(
                &format!(
                    "SELECT {} FROM games WHERE release_date > ?1 ORDER BY release_date ASC, id DESC",
                    GAME_COLUMNS
                ),
                params![today],
            ),
        }
    }

    fn update_reminder_handles(&self, id: GameId, handles: &ReminderHandles) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute(
            "UPDATE games SET notification_id = ?2, sale_notification_id = ?3, updated_at = ?4
             WHERE id = ?1",
            params![
                id,
                handles.release.as_ref().map(|h| h.as_str()),
                handles.sale.as_ref().map(|h| h.as_str()),
                format_timestamp(Utc::now()),
            ],
        )?;

        if rows_affected == 0 {
            return Err(AppError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, id: GameId) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn.execute("DELETE FROM games WHERE id = ?1", params![id])?;

        if rows_affected == 0 {
            return Err(AppError::NotFound(id));
        }

        Ok(())
    }

    fn delete_all(&self) -> AppResult<usize> {
        let conn = self.pool.get()?;
        let removed = conn.execute("DELETE FROM games", [])?;
        Ok(removed)
    }

    fn count(&self) -> AppResult<i64> {
        let conn = self.pool.get()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// Fixed-width UTC timestamps so text ordering matches time ordering
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn parse_date(value: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}
