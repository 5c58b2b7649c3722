//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain use-case port and remain testable without I/O.

use std::sync::Arc;

use crate::domain::user_service::UserUseCase;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserUseCase>,
}

impl HttpState {
    /// Construct state from the user use-case port.
    pub fn new(users: Arc<dyn UserUseCase>) -> Self {
        Self { users }
    }
}
