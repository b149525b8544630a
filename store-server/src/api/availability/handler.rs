//! Availability API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::scheduling::ledger;
use crate::utils::AppResult;
use crate::utils::time;
use shared::models::DayAvailability;

/// Query params for an availability listing
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
}

/// GET /api/stores/:store_id/availability?date=YYYY-MM-DD - 查询某天可预约槽位
///
/// 建议性读路径：返回的剩余容量可能在下单前被并发抢占，
/// book 时由协调器重新权威校验。
pub async fn list(
    State(state): State<ServerState>,
    Path(store_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<DayAvailability>> {
    let date = time::parse_date(&query.date)?;
    let slots =
        ledger::list_available_slots(&state.pool, store_id, date, state.config.timezone).await?;

    Ok(Json(DayAvailability {
        date: query.date,
        slots,
    }))
}
