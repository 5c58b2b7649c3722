//! User management backend library.
//!
//! The crate follows a hexagonal layout: `domain` holds the entities,
//! validation, ports, and the use-case service; `inbound` adapts HTTP to the
//! domain; `outbound` adapts the domain ports to PostgreSQL via Diesel; and
//! `server` wires the pieces together for the binary.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::trace::Trace;
