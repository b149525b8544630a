//! Schedule Config API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::schedule_config;
use crate::utils::{AppError, AppResult};
use crate::utils::time;
use shared::models::{StoreScheduleConfig, StoreScheduleConfigUpsert};

/// GET /api/stores/:store_id/schedule-config - 获取排班配置
pub async fn get(
    State(state): State<ServerState>,
    Path(store_id): Path<i64>,
) -> AppResult<Json<StoreScheduleConfig>> {
    let config = schedule_config::find_by_store(&state.pool, store_id)
        .await?
        .ok_or_else(|| {
            AppError::business_rule(format!("Store {store_id} has no schedule configuration"))
        })?;
    Ok(Json(config))
}

/// PUT /api/stores/:store_id/schedule-config - 更新排班配置
///
/// 仅管理端调用；配置只会更新，从不删除。
pub async fn update(
    State(state): State<ServerState>,
    Path(store_id): Path<i64>,
    Json(payload): Json<StoreScheduleConfigUpsert>,
) -> AppResult<Json<StoreScheduleConfig>> {
    let start = time::parse_time(&payload.start_time)?;
    let end = time::parse_time(&payload.end_time)?;
    if start >= end {
        return Err(AppError::validation(format!(
            "start_time {} must be before end_time {}",
            payload.start_time, payload.end_time
        )));
    }
    if payload.slot_interval_minutes <= 0 {
        return Err(AppError::validation(format!(
            "slot_interval_minutes must be positive, got {}",
            payload.slot_interval_minutes
        )));
    }
    if payload.capacity_per_slot < 1 {
        return Err(AppError::validation(format!(
            "capacity_per_slot must be at least 1, got {}",
            payload.capacity_per_slot
        )));
    }

    let config = schedule_config::upsert(&state.pool, store_id, payload).await?;

    tracing::info!(store_id, "Schedule configuration updated");
    Ok(Json(config))
}
