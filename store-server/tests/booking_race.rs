//! 并发预约竞态测试
//!
//! 核心不变量：任意时刻每个槽位的非取消预约数 ≤ capacity_per_slot，
//! 真并发下也成立。N 个并发预约打同一槽位，恰好 k 个成功。

mod common;

use chrono::NaiveTime;

use common::{STORE, TZ, next_weekday, seed_config, seed_order, test_db};
use store_server::db::repository::appointment;
use store_server::scheduling::{BookingCoordinator, ScheduleError, SlotLocks};

const CAPACITY: i64 = 2;
const BOOKERS: usize = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_bookings_never_oversell_a_slot() {
    let db = test_db().await;
    seed_config(&db.pool, "08:00", "10:00", 60, CAPACITY, &[1, 2, 3, 4, 5, 6]).await;

    let mut numbers = Vec::new();
    for i in 0..BOOKERS {
        let number = format!("PED-1{i:03}");
        seed_order(&db.pool, &number).await;
        numbers.push(number);
    }

    let coord = BookingCoordinator::new(db.pool.clone(), SlotLocks::new(), TZ);
    let date = next_weekday(2);
    let time = NaiveTime::parse_from_str("08:00", "%H:%M").unwrap();

    let mut handles = Vec::new();
    for number in numbers {
        let coord = coord.clone();
        handles.push(tokio::spawn(async move {
            coord.book(STORE, &number, date, time, None).await
        }));
    }

    let mut won = 0usize;
    let mut slot_full = 0usize;
    for handle in handles {
        match handle.await.expect("booker task") {
            Ok(_) => won += 1,
            Err(ScheduleError::SlotFull { .. }) => slot_full += 1,
            Err(other) => panic!("unexpected booking error: {other}"),
        }
    }

    // exactly k winners, everyone else lost the race cleanly
    assert_eq!(won, CAPACITY as usize);
    assert_eq!(slot_full, BOOKERS - CAPACITY as usize);

    // the persisted ledger agrees
    let booked = appointment::count_active_for_slot(
        &db.pool,
        STORE,
        &date.format("%Y-%m-%d").to_string(),
        "08:00",
    )
    .await
    .unwrap();
    assert_eq!(booked, CAPACITY);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_slots_do_not_contend() {
    let db = test_db().await;
    seed_config(&db.pool, "08:00", "12:00", 60, 1, &[1, 2, 3, 4, 5, 6]).await;

    let times = ["08:00", "09:00", "10:00", "11:00"];
    for (i, _) in times.iter().enumerate() {
        seed_order(&db.pool, &format!("PED-2{i:03}")).await;
    }

    let coord = BookingCoordinator::new(db.pool.clone(), SlotLocks::new(), TZ);
    let date = next_weekday(3);

    let mut handles = Vec::new();
    for (i, slot) in times.iter().enumerate() {
        let coord = coord.clone();
        let time = NaiveTime::parse_from_str(slot, "%H:%M").unwrap();
        let number = format!("PED-2{i:03}");
        handles.push(tokio::spawn(async move {
            coord.book(STORE, &number, date, time, None).await
        }));
    }

    // capacity 1 per slot, one booker per slot: everyone wins
    for handle in handles {
        handle.await.expect("booker task").expect("booking");
    }
}
