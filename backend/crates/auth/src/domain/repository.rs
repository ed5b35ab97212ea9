//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Methods documented as atomic must commit all of their writes or none.

use chrono::{DateTime, Utc};
use kernel::id::{SessionId, UserId};

use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Find user by normalised email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Check if email exists
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Insert the user and its first session (atomic).
    /// A duplicate email yields `AuthError::EmailTaken`.
    async fn create_with_session(&self, user: &User, session: &AuthSession) -> AuthResult<()>;
}

/// Auth session repository trait
#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    /// Create a new session
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    /// Session plus its owning user in one read.
    /// `None` when either is missing.
    async fn find_with_user(&self, session_id: SessionId)
    -> AuthResult<Option<(AuthSession, User)>>;

    /// Delete a session, returns whether it existed
    async fn delete(&self, session_id: SessionId) -> AuthResult<bool>;

    /// Delete all sessions for a user
    async fn delete_all_for_user(&self, user_id: UserId) -> AuthResult<u64>;

    /// Delete every session of `session.user_id` and insert `session` (atomic)
    async fn replace_all_for_user(&self, session: &AuthSession) -> AuthResult<u64>;

    /// Delete `old` and insert `new` (atomic).
    /// Returns `false` without inserting when `old` was already gone.
    async fn rotate(&self, old: SessionId, new: &AuthSession) -> AuthResult<bool>;

    /// Clean up sessions expired at `now`
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}
