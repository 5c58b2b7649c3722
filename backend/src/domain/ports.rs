//! Domain ports describing how the use-case layer reaches storage.
//!
//! The repository port exposes a sentinel error taxonomy so adapters map
//! their backend failures into predictable kinds. Callers compare errors by
//! [`UserRepositoryError::kind`]; the original cause stays reachable through
//! [`std::error::Error::source`].

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use super::user::{NewUser, User, UserId};

/// Boxed cause retained when wrapping a lower-level failure.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync>;

/// Failure kinds surfaced by [`UserRepository`] adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRepositoryErrorKind {
    /// Unique constraint on the email column was violated.
    DuplicateUser,
    /// Insert failed for a reason other than a duplicate.
    FailedToSave,
    /// Update failed for a reason other than a duplicate or missing row.
    FailedToUpdate,
    /// No row matched the requested id.
    UserNotFound,
    /// Any other storage failure.
    Internal,
}

impl fmt::Display for UserRepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::DuplicateUser => "duplicate user",
            Self::FailedToSave => "failed to save user",
            Self::FailedToUpdate => "failed to update user",
            Self::UserNotFound => "user not found",
            Self::Internal => "internal error",
        };
        f.write_str(message)
    }
}

/// Error raised by repository adapters, compared by kind.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct UserRepositoryError {
    kind: UserRepositoryErrorKind,
    #[source]
    source: Option<BoxedCause>,
}

impl UserRepositoryError {
    /// Construct an error without an underlying cause.
    pub fn new(kind: UserRepositoryErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Construct an error wrapping the lower-level cause.
    pub fn with_source(kind: UserRepositoryErrorKind, source: impl Into<BoxedCause>) -> Self {
        Self {
            kind,
            source: Some(source.into()),
        }
    }

    /// Failure kind for comparisons across layer boundaries.
    pub fn kind(&self) -> UserRepositoryErrorKind {
        self.kind
    }

    /// Helper for unique-constraint violations.
    pub fn duplicate_user(source: impl Into<BoxedCause>) -> Self {
        Self::with_source(UserRepositoryErrorKind::DuplicateUser, source)
    }

    /// Helper for insert failures.
    pub fn failed_to_save(source: impl Into<BoxedCause>) -> Self {
        Self::with_source(UserRepositoryErrorKind::FailedToSave, source)
    }

    /// Helper for update failures.
    pub fn failed_to_update(source: impl Into<BoxedCause>) -> Self {
        Self::with_source(UserRepositoryErrorKind::FailedToUpdate, source)
    }

    /// Helper for lookups that matched no row.
    pub fn user_not_found() -> Self {
        Self::new(UserRepositoryErrorKind::UserNotFound)
    }

    /// Helper for any other storage failure.
    pub fn internal(source: impl Into<BoxedCause>) -> Self {
        Self::with_source(UserRepositoryErrorKind::Internal, source)
    }
}

/// Persistence port for user records.
///
/// Implementations are the sole owners of SQL and backend error codes; they
/// must translate those into [`UserRepositoryError`] kinds as documented on
/// each method.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new row and return it with the storage-assigned id.
    ///
    /// A unique violation maps to `DuplicateUser`; anything else to
    /// `FailedToSave`.
    async fn save(&self, user: NewUser) -> Result<User, UserRepositoryError>;

    /// Fetch a row by primary key. Missing rows map to `UserNotFound`.
    async fn find_by_id(&self, id: UserId) -> Result<User, UserRepositoryError>;

    /// Overwrite the row matching `user.id` and return the stored state.
    ///
    /// Zero affected rows map to `UserNotFound`, a unique violation to
    /// `DuplicateUser`, and anything else to `FailedToUpdate`.
    async fn update(&self, user: User) -> Result<User, UserRepositoryError>;

    /// Fetch every row. Storage failures map to `Internal`.
    async fn find_all(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Remove the row by primary key, checking existence first.
    async fn delete(&self, id: UserId) -> Result<(), UserRepositoryError>;
}
