//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Register / login / logout with email + password
//! - Server-side sessions referenced by a signed `X-Session-ID` cookie
//! - Sliding expiration: sessions past the refresh threshold are rotated
//! - Role gating: POST/PUT/DELETE require ADMIN, reads any role
//!
//! ## Security Model
//! - Passwords hashed with salted PBKDF2-HMAC-SHA256
//! - One active session per user; login revokes earlier sessions
//! - Hard expiry, expired sessions are deleted on access

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::{AuthContext, SessionStore};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{auth_middleware_state, auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
