// src/application/commands/statistics_commands.rs

use crate::application::dto::{DatabaseInfoDto, StatisticsDto};
use crate::application::error_handling::ErrorResponse;
use crate::application::state::AppState;
use crate::db::{get_connection, get_database_stats, verify_database_integrity};

/// Catalog statistics, recomputed from the current records
pub async fn get_statistics(state: &AppState) -> Result<StatisticsDto, ErrorResponse> {
    let stats = state.statistics_service.calculate(state.now())?;
    Ok(StatisticsDto::from(stats))
}

/// Schema version, file size and row counts, after an integrity check
pub async fn get_database_info(state: &AppState) -> Result<DatabaseInfoDto, ErrorResponse> {
    let conn = get_connection(&state.pool)?;
    verify_database_integrity(&conn)?;
    Ok(get_database_stats(&conn)?.into())
}
