pub mod entity;
pub mod invariants;
pub mod query;

pub use entity::{Game, GameId, GamePatch, NewGame, Rating, ReminderHandles, SaleState};
pub use invariants::{validate_game, validate_new_game};
pub use query::{GameFilter, GameSort};
