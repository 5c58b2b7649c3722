//! Domain entities, ports, and the use-case service.
//!
//! Types here are transport and storage agnostic. Inbound adapters translate
//! them to JSON payloads; the persistence adapter maps them onto table rows.
//! Each layer owns its own sentinel error taxonomy so failures can be matched
//! by kind without reaching across layer boundaries.

pub mod ports;
pub mod user;
pub mod user_service;


pub use self::user::{NewUser, ParseUserIdError, User, UserId, UserUpdate, UserValidationError};
pub use self::user_service::{UserService, UserServiceError, UserServiceErrorKind, UserUseCase};
