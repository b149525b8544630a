//! 集成测试公共工具：临时数据库 + 种子数据

use chrono::{Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use sqlx::SqlitePool;
use tempfile::TempDir;

use store_server::db::DbService;
use store_server::db::repository::{client, order, schedule_config};
use store_server::utils::time::store_local_now;
use shared::models::{OperatingDays, Order, StoreScheduleConfig, StoreScheduleConfigUpsert};

pub const STORE: i64 = 1;
pub const TZ: Tz = chrono_tz::America::Sao_Paulo;

/// Temp-dir backed database; the dir lives as long as the handle
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

pub async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("test.db");
    let db = DbService::new(&path.to_string_lossy())
        .await
        .expect("test database");
    TestDb {
        pool: db.pool,
        _dir: dir,
    }
}

pub async fn seed_config(
    pool: &SqlitePool,
    start_time: &str,
    end_time: &str,
    interval: i64,
    capacity: i64,
    days: &[u8],
) -> StoreScheduleConfig {
    schedule_config::upsert(
        pool,
        STORE,
        StoreScheduleConfigUpsert {
            start_time: start_time.into(),
            end_time: end_time.into(),
            slot_interval_minutes: interval,
            capacity_per_slot: capacity,
            operating_days: OperatingDays::from_weekdays(days),
        },
    )
    .await
    .expect("seed config")
}

/// Client + order pair; booking links to the order by number
pub async fn seed_order(pool: &SqlitePool, number: &str) -> Order {
    let c = client::create(pool, STORE, "Cliente Teste", Some("11 99999-0000"), None)
        .await
        .expect("seed client");
    order::create(pool, STORE, c.id, number)
        .await
        .expect("seed order")
}

/// Next date after today (store-local) with the given weekday (0 = Sunday);
/// always strictly in the future, so slots on it can never be "past".
pub fn next_weekday(weekday: u8) -> NaiveDate {
    let (today, _) = store_local_now(TZ);
    let mut date = today + Duration::days(1);
    while date.weekday().num_days_from_sunday() as u8 != weekday {
        date += Duration::days(1);
    }
    date
}

pub fn yesterday() -> NaiveDate {
    let (today, _) = store_local_now(TZ);
    today - Duration::days(1)
}
