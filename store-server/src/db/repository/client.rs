//! Client Repository

use super::{RepoError, RepoResult};
use shared::models::Client;
use sqlx::SqlitePool;

const CLIENT_SELECT: &str =
    "SELECT id, store_id, name, phone, email, created_at, updated_at FROM client";

pub async fn find_by_id(pool: &SqlitePool, store_id: i64, id: i64) -> RepoResult<Option<Client>> {
    let sql = format!("{} WHERE store_id = ? AND id = ?", CLIENT_SELECT);
    let client = sqlx::query_as::<_, Client>(&sql)
        .bind(store_id)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(client)
}

/// Register a client projection (profile subsystem integration; also the
/// seed path for tests).
pub async fn create(
    pool: &SqlitePool,
    store_id: i64,
    name: &str,
    phone: Option<&str>,
    email: Option<&str>,
) -> RepoResult<Client> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO client (id, store_id, name, phone, email, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(store_id)
    .bind(name)
    .bind(phone)
    .bind(email)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, store_id, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create client".into()))
}
