//! Critical Statistics Invariants:
//!
//! 1. Statistics are ALWAYS derived, NEVER primary
//! 2. Statistics can be recalculated at any time
//! 3. Statistics NEVER alter domain state
//! 4. Aggregates over an empty catalog are zero, never NaN
//! 5. "On sale" uses exactly the same rule as `Game::is_on_sale`

pub mod entity;
pub use entity::GameStatistics;
