//! PostgreSQL-backed `HistoryRepository` using Diesel.
//!
//! Entries live in `user_history`, ordered by their serial `id`. Appends
//! and trimming run in one transaction so concurrent writers never leave a
//! user above the cap.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::ports::{HistoryPersistenceError, HistoryRepository};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_user_repository::load_history;
use super::models::NewHistoryRow;
use super::pool::{DbPool, PoolError};
use super::schema::{user_history, users};

/// Diesel implementation of [`HistoryRepository`].
#[derive(Clone)]
pub struct DieselHistoryRepository {
    pool: DbPool,
}

impl DieselHistoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> HistoryPersistenceError {
    map_pool_error(error, HistoryPersistenceError::connection)
}

fn diesel_error(error: &diesel::result::Error) -> HistoryPersistenceError {
    map_diesel_error(
        error,
        HistoryPersistenceError::query,
        HistoryPersistenceError::connection,
    )
}

async fn user_exists(conn: &mut AsyncPgConnection, user_id: Uuid) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(users::table.find(user_id)))
        .get_result(conn)
        .await
}

/// Number of rows to keep, saturating for absurdly large caps.
fn keep_count(limit: usize) -> i64 {
    i64::try_from(limit.max(1)).unwrap_or(i64::MAX)
}

#[async_trait]
impl HistoryRepository for DieselHistoryRepository {
    async fn append(
        &self,
        user_id: &UserId,
        command: &str,
        limit: usize,
    ) -> Result<bool, HistoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let uuid = *user_id.as_uuid();
        let keep = keep_count(limit);

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                if !user_exists(conn, uuid).await? {
                    return Ok(false);
                }
                diesel::insert_into(user_history::table)
                    .values(&NewHistoryRow {
                        user_id: uuid,
                        command,
                    })
                    .execute(conn)
                    .await?;

                let stale: Vec<i64> = user_history::table
                    .filter(user_history::user_id.eq(uuid))
                    .order_by(user_history::id.desc())
                    .offset(keep)
                    .select(user_history::id)
                    .load(conn)
                    .await?;
                if !stale.is_empty() {
                    diesel::delete(user_history::table.filter(user_history::id.eq_any(stale)))
                        .execute(conn)
                        .await?;
                }
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| diesel_error(&err))
    }

    async fn list(&self, user_id: &UserId) -> Result<Option<Vec<String>>, HistoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let uuid = *user_id.as_uuid();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                if !user_exists(conn, uuid).await? {
                    return Ok(None);
                }
                load_history(conn, uuid).await.map(Some)
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| diesel_error(&err))
    }

    async fn clear(&self, user_id: &UserId) -> Result<bool, HistoryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let uuid = *user_id.as_uuid();

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                if !user_exists(conn, uuid).await? {
                    return Ok(false);
                }
                diesel::delete(user_history::table.filter(user_history::user_id.eq(uuid)))
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| diesel_error(&err))
    }
}
