//! Order Repository
//!
//! Orders belong to the checkout subsystem; the scheduling core reads
//! them by number and flips a single flag on successful booking.

use super::{RepoError, RepoResult};
use shared::models::Order;
use sqlx::{Sqlite, SqlitePool};

const ORDER_SELECT: &str = "SELECT id, store_id, client_id, number, has_appointment, created_at, updated_at FROM customer_order";

pub async fn find_by_number(
    pool: &SqlitePool,
    store_id: i64,
    number: &str,
) -> RepoResult<Option<Order>> {
    let sql = format!("{} WHERE store_id = ? AND number = ?", ORDER_SELECT);
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(store_id)
        .bind(number)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

pub async fn find_by_id(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{} WHERE store_id = ? AND id = ?", ORDER_SELECT);
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(store_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Flip the appointment flag. Executor-generic so the booking
/// coordinator can run it inside the same transaction as the insert.
pub async fn set_has_appointment<'e, E>(executor: E, order_id: i64, has: bool) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let now = shared::util::now_millis();
    sqlx::query("UPDATE customer_order SET has_appointment = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(has)
        .bind(now)
        .bind(order_id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Register an order projection (called by the checkout integration; also
/// the seed path for tests).
pub async fn create(
    pool: &SqlitePool,
    store_id: i64,
    client_id: i64,
    number: &str,
) -> RepoResult<Order> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO customer_order (id, store_id, client_id, number, has_appointment, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
    )
    .bind(id)
    .bind(store_id)
    .bind(client_id)
    .bind(number)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}
