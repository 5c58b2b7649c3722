//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The adapter owns all SQL and translates backend failures into the port's
//! sentinel error kinds. Unique violations on the email column become
//! `DuplicateUser`; queries matching no row become `UserNotFound`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::user::{NewUser, User, UserId};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Debug, Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::internal(error)
}

fn is_unique_violation(error: &diesel::result::Error) -> bool {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

fn log_diesel_error(error: &diesel::result::Error) {
    use diesel::result::Error as DieselError;

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }
}

fn map_save_error(error: diesel::result::Error) -> UserRepositoryError {
    log_diesel_error(&error);
    if is_unique_violation(&error) {
        UserRepositoryError::duplicate_user(error)
    } else {
        UserRepositoryError::failed_to_save(error)
    }
}

fn map_update_error(error: diesel::result::Error) -> UserRepositoryError {
    log_diesel_error(&error);
    if is_unique_violation(&error) {
        UserRepositoryError::duplicate_user(error)
    } else {
        UserRepositoryError::failed_to_update(error)
    }
}

fn map_query_error(error: diesel::result::Error) -> UserRepositoryError {
    log_diesel_error(&error);
    UserRepositoryError::internal(error)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn save(&self, user: NewUser) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(NewUserRow::from(&user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_save_error)?;

        Ok(User::from(row))
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.value())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;

        row.map(User::from)
            .ok_or_else(UserRepositoryError::user_not_found)
    }

    async fn update(&self, user: User) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // `returning` + `optional` distinguishes a missing row from other
        // update failures without a second query.
        let row: Option<UserRow> = diesel::update(users::table.find(user.id.value()))
            .set(UserChangeset::from(&user))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_update_error)?;

        row.map(User::from)
            .ok_or_else(UserRepositoryError::user_not_found)
    }

    async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order(users::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_query_error)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let exists: Option<i64> = users::table
            .find(id.value())
            .select(users::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;
        if exists.is_none() {
            return Err(UserRepositoryError::user_not_found());
        }

        diesel::delete(users::table.find(id.value()))
            .execute(&mut conn)
            .await
            .map_err(map_query_error)?;

        Ok(())
    }
}
