//! Schedule Config Repository
//!
//! One row per store; upserted by administrators, never deleted.

use super::{RepoError, RepoResult};
use shared::models::{StoreScheduleConfig, StoreScheduleConfigUpsert};
use sqlx::SqlitePool;

const CONFIG_SELECT: &str = "SELECT store_id, start_time, end_time, slot_interval_minutes, capacity_per_slot, operating_days, created_at, updated_at FROM schedule_config";

pub async fn find_by_store(
    pool: &SqlitePool,
    store_id: i64,
) -> RepoResult<Option<StoreScheduleConfig>> {
    let sql = format!("{} WHERE store_id = ?", CONFIG_SELECT);
    let config = sqlx::query_as::<_, StoreScheduleConfig>(&sql)
        .bind(store_id)
        .fetch_optional(pool)
        .await?;
    Ok(config)
}

pub async fn upsert(
    pool: &SqlitePool,
    store_id: i64,
    data: StoreScheduleConfigUpsert,
) -> RepoResult<StoreScheduleConfig> {
    if data.slot_interval_minutes <= 0 {
        return Err(RepoError::Validation(format!(
            "slot_interval_minutes must be positive: {}",
            data.slot_interval_minutes
        )));
    }
    if data.capacity_per_slot < 1 {
        return Err(RepoError::Validation(format!(
            "capacity_per_slot must be at least 1: {}",
            data.capacity_per_slot
        )));
    }

    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO schedule_config (store_id, start_time, end_time, slot_interval_minutes, capacity_per_slot, operating_days, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) \
         ON CONFLICT (store_id) DO UPDATE SET \
           start_time = excluded.start_time, \
           end_time = excluded.end_time, \
           slot_interval_minutes = excluded.slot_interval_minutes, \
           capacity_per_slot = excluded.capacity_per_slot, \
           operating_days = excluded.operating_days, \
           updated_at = excluded.updated_at",
    )
    .bind(store_id)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(data.slot_interval_minutes)
    .bind(data.capacity_per_slot)
    .bind(data.operating_days)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_store(pool, store_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to upsert schedule config".into()))
}
