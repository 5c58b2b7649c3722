//! HTTP inbound adapter exposing the REST endpoints.

pub mod envelope;
pub mod error;
pub mod health;
pub mod state;
pub mod users;

pub use error::{ApiError, ApiResult};
