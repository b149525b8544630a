//! 预约全流程集成测试
//!
//! 覆盖完整预约场景：槽位生成 → 订满 → 容量恢复，以及各种拒绝路径。

mod common;

use chrono::NaiveTime;
use sqlx::SqlitePool;

use common::{STORE, TZ, next_weekday, seed_config, seed_order, test_db, yesterday};
use shared::models::{AppointmentStatus, AvailableSlot};
use store_server::db::repository::{appointment, order};
use store_server::scheduling::{BookingCoordinator, ScheduleError, SlotLocks, ledger, slots};

fn t(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

fn coordinator(pool: &SqlitePool) -> BookingCoordinator {
    BookingCoordinator::new(pool.clone(), SlotLocks::new(), TZ)
}

#[tokio::test]
async fn books_until_slot_full_and_frees_on_cancel() {
    let db = test_db().await;
    seed_config(&db.pool, "08:00", "10:00", 60, 2, &[1, 2, 3, 4, 5, 6]).await;
    let date = next_weekday(2); // a Tuesday

    let generated: Vec<String> = slots::generate_slots(&db.pool, STORE, date)
        .await
        .unwrap()
        .iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();
    assert_eq!(generated, vec!["08:00", "09:00"]);

    let order_a = seed_order(&db.pool, "PED-001").await;
    seed_order(&db.pool, "PED-002").await;
    seed_order(&db.pool, "PED-003").await;

    let coord = coordinator(&db.pool);
    let first = coord
        .book(STORE, "PED-001", date, t("08:00"), Some("troca de pneus"))
        .await
        .unwrap();
    assert_eq!(first.status, AppointmentStatus::Confirmado);
    assert_eq!(first.order_id, order_a.id);

    coord
        .book(STORE, "PED-002", date, t("08:00"), None)
        .await
        .unwrap();

    // capacity 2 is exhausted: third booking loses
    let err = coord
        .book(STORE, "PED-003", date, t("08:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::SlotFull { .. }));

    assert_eq!(
        ledger::remaining_capacity(&db.pool, STORE, date, t("08:00"))
            .await
            .unwrap(),
        0
    );
    assert_eq!(
        ledger::remaining_capacity(&db.pool, STORE, date, t("09:00"))
            .await
            .unwrap(),
        2
    );

    // booking flagged the linked order
    let reloaded = order::find_by_id(&db.pool, STORE, order_a.id)
        .await
        .unwrap()
        .unwrap();
    assert!(reloaded.has_appointment);

    // cancellation frees capacity immediately and clears the flag
    let cancelled = coord.cancel(STORE, first.id).await.unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelado);
    assert_eq!(
        ledger::remaining_capacity(&db.pool, STORE, date, t("08:00"))
            .await
            .unwrap(),
        1
    );
    let reloaded = order::find_by_id(&db.pool, STORE, order_a.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!reloaded.has_appointment);

    // availability listing reflects the ledger
    let listing = ledger::list_available_slots(&db.pool, STORE, date, TZ)
        .await
        .unwrap();
    assert_eq!(
        listing,
        vec![
            AvailableSlot { time: "08:00".into(), remaining: 1 },
            AvailableSlot { time: "09:00".into(), remaining: 2 },
        ]
    );
}

#[tokio::test]
async fn rejects_slot_off_the_generated_grid() {
    let db = test_db().await;
    seed_config(&db.pool, "08:00", "10:00", 60, 2, &[1, 2, 3, 4, 5, 6]).await;
    seed_order(&db.pool, "PED-010").await;
    let date = next_weekday(2);

    // 10:00 equals end_time, so it is outside the grid
    let err = coordinator(&db.pool)
        .book(STORE, "PED-010", date, t("10:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidSlot { .. }));
}

#[tokio::test]
async fn rejects_non_operating_day() {
    let db = test_db().await;
    seed_config(&db.pool, "08:00", "10:00", 60, 2, &[1, 2, 3, 4, 5, 6]).await;
    seed_order(&db.pool, "PED-020").await;
    let sunday = next_weekday(0);

    assert!(
        slots::generate_slots(&db.pool, STORE, sunday)
            .await
            .unwrap()
            .is_empty()
    );
    let err = coordinator(&db.pool)
        .book(STORE, "PED-020", sunday, t("08:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidSlot { .. }));
}

#[tokio::test]
async fn rejects_past_slots_but_generator_stays_timeless() {
    let db = test_db().await;
    // all seven days so yesterday is on the grid
    seed_config(&db.pool, "08:00", "10:00", 60, 2, &[0, 1, 2, 3, 4, 5, 6]).await;
    seed_order(&db.pool, "PED-030").await;

    let err = coordinator(&db.pool)
        .book(STORE, "PED-030", yesterday(), t("08:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::SlotInPast { .. }));

    // ledger excludes the past date entirely, the generator does not
    assert!(
        ledger::list_available_slots(&db.pool, STORE, yesterday(), TZ)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        slots::generate_slots(&db.pool, STORE, yesterday())
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn missing_config_is_a_setup_error_not_an_empty_list() {
    let db = test_db().await;
    seed_order(&db.pool, "PED-040").await;
    let date = next_weekday(2);

    let err = slots::generate_slots(&db.pool, STORE, date).await.unwrap_err();
    assert!(matches!(err, ScheduleError::ConfigNotFound(s) if s == STORE));

    let err = ledger::list_available_slots(&db.pool, STORE, date, TZ)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::ConfigNotFound(_)));

    let err = coordinator(&db.pool)
        .book(STORE, "PED-040", date, t("08:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::ConfigNotFound(_)));
}

#[tokio::test]
async fn cancel_is_idempotent_with_a_single_recorded_transition() {
    let db = test_db().await;
    seed_config(&db.pool, "08:00", "10:00", 60, 2, &[1, 2, 3, 4, 5, 6]).await;
    seed_order(&db.pool, "PED-050").await;
    let date = next_weekday(3);

    let coord = coordinator(&db.pool);
    let appt = coord
        .book(STORE, "PED-050", date, t("09:00"), None)
        .await
        .unwrap();

    let first = coord.cancel(STORE, appt.id).await.unwrap();
    let second = coord.cancel(STORE, appt.id).await.unwrap();

    assert_eq!(first.status, AppointmentStatus::Cancelado);
    assert_eq!(second.status, AppointmentStatus::Cancelado);
    // no second transition recorded
    assert_eq!(first.updated_at, second.updated_at);
}

#[tokio::test]
async fn complete_is_terminal_and_keeps_capacity_consumed() {
    let db = test_db().await;
    seed_config(&db.pool, "08:00", "10:00", 60, 2, &[1, 2, 3, 4, 5, 6]).await;
    seed_order(&db.pool, "PED-060").await;
    let date = next_weekday(4);

    let coord = coordinator(&db.pool);
    let appt = coord
        .book(STORE, "PED-060", date, t("08:00"), None)
        .await
        .unwrap();

    let done = coord.complete(STORE, appt.id).await.unwrap();
    assert_eq!(done.status, AppointmentStatus::Concluido);

    // completing again is a no-op returning the terminal state
    let again = coord.complete(STORE, appt.id).await.unwrap();
    assert_eq!(again.updated_at, done.updated_at);

    // a completed appointment still consumes capacity (only cancelado frees)
    assert_eq!(
        ledger::remaining_capacity(&db.pool, STORE, date, t("08:00"))
            .await
            .unwrap(),
        1
    );

    // and cannot be cancelled afterwards
    let err = coord.cancel(STORE, appt.id).await.unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidTransition { .. }));
}

#[tokio::test]
async fn one_active_appointment_per_order() {
    let db = test_db().await;
    seed_config(&db.pool, "08:00", "10:00", 60, 2, &[1, 2, 3, 4, 5, 6]).await;
    seed_order(&db.pool, "PED-070").await;
    let date = next_weekday(5);

    let coord = coordinator(&db.pool);
    let appt = coord
        .book(STORE, "PED-070", date, t("08:00"), None)
        .await
        .unwrap();

    let err = coord
        .book(STORE, "PED-070", date, t("09:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::OrderAlreadyBooked(_)));

    // cancelling releases the order for a new booking
    coord.cancel(STORE, appt.id).await.unwrap();
    coord
        .book(STORE, "PED-070", date, t("09:00"), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn unknown_order_and_appointment_are_not_found() {
    let db = test_db().await;
    seed_config(&db.pool, "08:00", "10:00", 60, 2, &[1, 2, 3, 4, 5, 6]).await;
    let date = next_weekday(2);

    let coord = coordinator(&db.pool);
    let err = coord
        .book(STORE, "PED-NAO-EXISTE", date, t("08:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScheduleError::OrderNotFound(_)));

    let err = coord.cancel(STORE, 424242).await.unwrap_err();
    assert!(matches!(err, ScheduleError::AppointmentNotFound(424242)));
}

#[tokio::test]
async fn store_scoping_isolates_tenants() {
    let db = test_db().await;
    seed_config(&db.pool, "08:00", "10:00", 60, 2, &[1, 2, 3, 4, 5, 6]).await;
    seed_order(&db.pool, "PED-080").await;
    let date = next_weekday(2);

    let coord = coordinator(&db.pool);
    let appt = coord
        .book(STORE, "PED-080", date, t("08:00"), None)
        .await
        .unwrap();

    // another store cannot see or mutate the appointment
    let other_store = STORE + 1;
    assert!(
        appointment::find_by_id(&db.pool, other_store, appt.id)
            .await
            .unwrap()
            .is_none()
    );
    let err = coord.cancel(other_store, appt.id).await.unwrap_err();
    assert!(matches!(err, ScheduleError::AppointmentNotFound(_)));
}
