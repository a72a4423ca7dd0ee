//! PostgreSQL-backed `UserRepository` using Diesel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{
    AssistantImage, AssistantName, AssistantProfileUpdate, DisplayName, EmailAddress, User,
    UserId, UserParts,
};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{AssistantProfileChangeset, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{user_history, users};

diesel::define_sql_function! {
    /// SQL `lower(text)`.
    fn lower(value: Text) -> Text;
}

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: &diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Entries for `user_id`, oldest first.
pub(super) async fn load_history(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
) -> QueryResult<Vec<String>> {
    user_history::table
        .filter(user_history::user_id.eq(user_id))
        .order_by(user_history::id.asc())
        .select(user_history::command)
        .load(conn)
        .await
}

/// Rebuild a domain user from a row.
///
/// Required columns must validate. Optional assistant fields that no longer
/// validate are dropped with a warning so one bad value cannot lock the
/// account out.
fn row_to_user(row: UserRow, history: Vec<String>) -> Result<User, UserPersistenceError> {
    let invalid = |err| UserPersistenceError::query(format!("stored user is invalid: {err}"));
    let name = DisplayName::new(&row.name).map_err(invalid)?;
    let email = EmailAddress::new(&row.email).map_err(invalid)?;

    let assistant_name = row
        .assistant_name
        .as_deref()
        .and_then(|value| match AssistantName::new(value) {
            Ok(name) => Some(name),
            Err(err) => {
                warn!(user_id = %row.id, error = %err, "ignoring stored assistant name");
                None
            }
        });
    let assistant_image = row
        .assistant_image
        .as_deref()
        .and_then(|value| match AssistantImage::new(value) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!(user_id = %row.id, error = %err, "ignoring stored assistant image");
                None
            }
        });

    Ok(User::from(UserParts {
        id: UserId::from_uuid(row.id),
        name,
        email,
        assistant_name,
        assistant_image,
        history,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            password_hash,
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate_email(user.email().as_ref())
                } else {
                    diesel_error(&err)
                }
            })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let uuid = *id.as_uuid();

        let loaded = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let row: Option<UserRow> = users::table
                        .find(uuid)
                        .select(UserRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    match row {
                        Some(row) => {
                            let history = load_history(conn, uuid).await?;
                            Ok(Some((row, history)))
                        }
                        None => Ok(None),
                    }
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| diesel_error(&err))?;

        loaded
            .map(|(row, history)| row_to_user(row, history))
            .transpose()
    }

    async fn find_credentials(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(&err))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let history = load_history(&mut conn, row.id)
            .await
            .map_err(|err| diesel_error(&err))?;
        let password_hash = row.password_hash.clone();
        let user = row_to_user(row, history)?;
        Ok(Some(StoredCredentials {
            user,
            password_hash,
        }))
    }

    async fn email_exists(&self, lookup_key: &str) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::select(diesel::dsl::exists(
            users::table.filter(lower(users::email).eq(lookup_key)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(|err| diesel_error(&err))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &AssistantProfileUpdate,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let uuid = *id.as_uuid();
        let changes = AssistantProfileChangeset {
            assistant_name: update.assistant_name.as_ref().map(AsRef::as_ref),
            assistant_image: update.assistant_image.as_ref().map(AsRef::as_ref),
            updated_at,
        };

        let row: Option<UserRow> = diesel::update(users::table.find(uuid))
            .set(&changes)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| diesel_error(&err))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let history = load_history(&mut conn, uuid)
            .await
            .map_err(|err| diesel_error(&err))?;
        row_to_user(row, history).map(Some)
    }
}
