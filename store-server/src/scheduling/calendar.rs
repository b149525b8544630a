//! 营业日历
//!
//! 回答两个问题：门店某天营业吗？营业时段是什么？
//! 纯粹由当前 `schedule_config` 决定，数据库访问只为加载配置行。

use chrono::{Datelike, NaiveDate, NaiveTime};
use sqlx::SqlitePool;

use super::{ScheduleError, ScheduleResult};
use crate::db::repository::{RepoError, schedule_config};
use shared::models::StoreScheduleConfig;

/// Daily operating window derived from a store's schedule config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingWindow {
    /// First slot start
    pub start: NaiveTime,
    /// Closing time; no slot starts at or after it
    pub end: NaiveTime,
    /// Minutes between slot starts
    pub interval_minutes: i64,
}

/// Load the store's schedule configuration.
///
/// A missing row is a setup error, never an empty result: callers must
/// surface it to administrators instead of rendering "no slots".
pub async fn load_config(pool: &SqlitePool, store_id: i64) -> ScheduleResult<StoreScheduleConfig> {
    schedule_config::find_by_store(pool, store_id)
        .await?
        .ok_or(ScheduleError::ConfigNotFound(store_id))
}

/// Whether the config operates on the given date's weekday (0 = Sunday)
pub fn operates_on(config: &StoreScheduleConfig, date: NaiveDate) -> bool {
    let weekday = date.weekday().num_days_from_sunday() as u8;
    config.operating_days.contains(weekday)
}

/// Parse the config's window fields.
///
/// The fields are validated on write, so a parse failure here means the
/// row was corrupted outside the API.
pub fn operating_window(config: &StoreScheduleConfig) -> ScheduleResult<OperatingWindow> {
    let start = parse_window_time(&config.start_time, config.store_id)?;
    let end = parse_window_time(&config.end_time, config.store_id)?;
    Ok(OperatingWindow {
        start,
        end,
        interval_minutes: config.slot_interval_minutes,
    })
}

fn parse_window_time(value: &str, store_id: i64) -> ScheduleResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
        ScheduleError::Storage(RepoError::Validation(format!(
            "Corrupt schedule_config time '{value}' for store {store_id}"
        )))
    })
}

/// `isOperatingDay` contract: config lookup + weekday check
pub async fn is_operating_day(
    pool: &SqlitePool,
    store_id: i64,
    date: NaiveDate,
) -> ScheduleResult<bool> {
    let config = load_config(pool, store_id).await?;
    Ok(operates_on(&config, date))
}
