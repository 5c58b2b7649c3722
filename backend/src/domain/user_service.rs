//! Use-case service orchestrating repository calls.
//!
//! The service mirrors the repository operations 1:1 and owns its own
//! sentinel taxonomy. Repository errors are re-wrapped, never passed through,
//! so transport adapters only ever match on [`UserServiceErrorKind`] while
//! the repository cause stays inspectable via the error chain.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::ports::{BoxedCause, UserRepository, UserRepositoryError, UserRepositoryErrorKind};
use super::user::{NewUser, User, UserId};

/// Failure kinds surfaced by the use-case layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserServiceErrorKind {
    DuplicateUser,
    FailedToSave,
    FailedToUpdate,
    UserNotFound,
    Internal,
}

impl fmt::Display for UserServiceErrorKind {
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

/// Error raised by the use-case layer, compared by kind.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct UserServiceError {
    kind: UserServiceErrorKind,
    #[source]
    source: Option<BoxedCause>,
}

impl UserServiceError {
    /// Construct an error without an underlying cause.
    pub fn new(kind: UserServiceErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Construct an error wrapping the lower-level cause.
    pub fn with_source(kind: UserServiceErrorKind, source: impl Into<BoxedCause>) -> Self {
        Self {
            kind,
            source: Some(source.into()),
        }
    }

    /// Failure kind for comparisons across layer boundaries.
    pub fn kind(&self) -> UserServiceErrorKind {
        self.kind
    }
}

/// Driving port consumed by transport adapters.
///
/// Mirrors [`UserRepository`] so handlers stay decoupled from storage while
/// the service performs the per-layer error re-mapping.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserUseCase: Send + Sync {
    /// Persist a validated draft and return the stored record.
    async fn create(&self, user: NewUser) -> Result<User, UserServiceError>;

    /// Fetch a single user by id.
    async fn find_by_id(&self, id: UserId) -> Result<User, UserServiceError>;

    /// Store the full state of an existing user.
    async fn update(&self, user: User) -> Result<User, UserServiceError>;

    /// Fetch all users.
    async fn find_all(&self) -> Result<Vec<User>, UserServiceError>;

    /// Remove a user by id.
    async fn delete(&self, id: UserId) -> Result<(), UserServiceError>;
}

/// Use-case implementation backed by a repository port.
#[derive(Clone)]
pub struct UserService<R> {
    repo: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    fn map_create_error(error: UserRepositoryError) -> UserServiceError {
        let kind = match error.kind() {
            UserRepositoryErrorKind::DuplicateUser => UserServiceErrorKind::DuplicateUser,
            UserRepositoryErrorKind::FailedToSave => UserServiceErrorKind::FailedToSave,
            _ => UserServiceErrorKind::Internal,
        };
        UserServiceError::with_source(kind, error)
    }

    fn map_lookup_error(error: UserRepositoryError) -> UserServiceError {
        let kind = match error.kind() {
            UserRepositoryErrorKind::UserNotFound => UserServiceErrorKind::UserNotFound,
            _ => UserServiceErrorKind::Internal,
        };
        UserServiceError::with_source(kind, error)
    }

    fn map_update_error(error: UserRepositoryError) -> UserServiceError {
        let kind = match error.kind() {
            UserRepositoryErrorKind::DuplicateUser => UserServiceErrorKind::DuplicateUser,
            UserRepositoryErrorKind::FailedToUpdate => UserServiceErrorKind::FailedToUpdate,
            UserRepositoryErrorKind::UserNotFound => UserServiceErrorKind::UserNotFound,
            _ => UserServiceErrorKind::Internal,
        };
        UserServiceError::with_source(kind, error)
    }
}

#[async_trait]
impl<R> UserUseCase for UserService<R>
where
    R: UserRepository,
{
    async fn create(&self, user: NewUser) -> Result<User, UserServiceError> {
        self.repo.save(user).await.map_err(Self::map_create_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, UserServiceError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(Self::map_lookup_error)
    }

    async fn update(&self, user: User) -> Result<User, UserServiceError> {
        self.repo.update(user).await.map_err(Self::map_update_error)
    }

    async fn find_all(&self) -> Result<Vec<User>, UserServiceError> {
        self.repo
            .find_all()
            .await
            .map_err(|error| UserServiceError::with_source(UserServiceErrorKind::Internal, error))
    }

    async fn delete(&self, id: UserId) -> Result<(), UserServiceError> {
        self.repo.delete(id).await.map_err(Self::map_lookup_error)
    }
}
