//! Appointment Repository
//!
//! Ledger reads are plain SELECTs; mutating access happens only through
//! the booking coordinator, which passes its transaction in as the
//! executor so the capacity check and the write share one atomic unit.

use std::collections::HashMap;

use super::RepoResult;
use shared::models::{Appointment, AppointmentStatus};
use sqlx::{Sqlite, SqlitePool};

const APPOINTMENT_SELECT: &str = "SELECT id, store_id, order_id, client_id, date, time, status, observacoes, created_at, updated_at FROM appointment";

pub async fn find_by_id(
    pool: &SqlitePool,
    store_id: i64,
    id: i64,
) -> RepoResult<Option<Appointment>> {
    let sql = format!("{} WHERE store_id = ? AND id = ?", APPOINTMENT_SELECT);
    let appt = sqlx::query_as::<_, Appointment>(&sql)
        .bind(store_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(appt)
}

pub async fn find_by_date(
    pool: &SqlitePool,
    store_id: i64,
    date: &str,
) -> RepoResult<Vec<Appointment>> {
    let sql = format!(
        "{} WHERE store_id = ? AND date = ? ORDER BY time, id",
        APPOINTMENT_SELECT
    );
    let appts = sqlx::query_as::<_, Appointment>(&sql)
        .bind(store_id)
        .bind(date)
        .fetch_all(pool)
        .await?;
    Ok(appts)
}

pub async fn find_by_date_range(
    pool: &SqlitePool,
    store_id: i64,
    start_date: &str,
    end_date: &str,
) -> RepoResult<Vec<Appointment>> {
    let sql = format!(
        "{} WHERE store_id = ? AND date >= ? AND date <= ? ORDER BY date, time, id",
        APPOINTMENT_SELECT
    );
    let appts = sqlx::query_as::<_, Appointment>(&sql)
        .bind(store_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_all(pool)
        .await?;
    Ok(appts)
}

/// Active (non-cancelled) appointment holding the given order, if any.
///
/// Executor-generic: the coordinator checks this inside its transaction.
pub async fn find_active_by_order<'e, E>(
    executor: E,
    order_id: i64,
) -> RepoResult<Option<Appointment>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let sql = format!(
        "{} WHERE order_id = ? AND status != 'cancelado' LIMIT 1",
        APPOINTMENT_SELECT
    );
    let appt = sqlx::query_as::<_, Appointment>(&sql)
        .bind(order_id)
        .fetch_optional(executor)
        .await?;
    Ok(appt)
}

/// Booked (non-cancelled) counts per slot time for one date, in a single
/// grouped query so availability listings avoid N+1 round-trips.
pub async fn booked_counts_for_date(
    pool: &SqlitePool,
    store_id: i64,
    date: &str,
) -> RepoResult<HashMap<String, i64>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT time, COUNT(*) FROM appointment \
         WHERE store_id = ? AND date = ? AND status != 'cancelado' \
         GROUP BY time",
    )
    .bind(store_id)
    .bind(date)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().collect())
}

/// Booked (non-cancelled) count for one slot.
///
/// Executor-generic: the coordinator calls this inside its transaction.
pub async fn count_active_for_slot<'e, E>(
    executor: E,
    store_id: i64,
    date: &str,
    time: &str,
) -> RepoResult<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM appointment \
         WHERE store_id = ? AND date = ? AND time = ? AND status != 'cancelado'",
    )
    .bind(store_id)
    .bind(date)
    .bind(time)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

/// Insert a new appointment in `confirmado` status.
///
/// Executor-generic for the same reason as [`count_active_for_slot`].
pub async fn insert_confirmed<'e, E>(
    executor: E,
    store_id: i64,
    order_id: i64,
    client_id: i64,
    date: &str,
    time: &str,
    observacoes: Option<&str>,
) -> RepoResult<Appointment>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO appointment (id, store_id, order_id, client_id, date, time, status, observacoes, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'confirmado', ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(store_id)
    .bind(order_id)
    .bind(client_id)
    .bind(date)
    .bind(time)
    .bind(observacoes)
    .bind(now)
    .execute(executor)
    .await?;

    Ok(Appointment {
        id,
        store_id,
        order_id,
        client_id,
        date: date.to_string(),
        time: time.to_string(),
        status: AppointmentStatus::Confirmado,
        observacoes: observacoes.map(str::to_string),
        created_at: now,
        updated_at: now,
    })
}

/// Guarded status transition: only applies when the row is still in
/// `from`. Returns whether a row was updated.
pub async fn transition_status<'e, E>(
    executor: E,
    store_id: i64,
    id: i64,
    from: AppointmentStatus,
    to: AppointmentStatus,
) -> RepoResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE appointment SET status = ?1, updated_at = ?2 \
         WHERE store_id = ?3 AND id = ?4 AND status = ?5",
    )
    .bind(to)
    .bind(now)
    .bind(store_id)
    .bind(id)
    .bind(from)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn update_observacoes(
    pool: &SqlitePool,
    store_id: i64,
    id: i64,
    observacoes: Option<&str>,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE appointment SET observacoes = ?1, updated_at = ?2 \
         WHERE store_id = ?3 AND id = ?4",
    )
    .bind(observacoes)
    .bind(now)
    .bind(store_id)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
