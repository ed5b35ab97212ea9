//! Session Store
//!
//! Issues, resolves, rotates and removes sessions on top of
//! [`AuthSessionRepository`], applying the configured lifetime.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{SessionId, UserId};

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::AuthSessionRepository;
use crate::error::AuthResult;

pub struct SessionStore<S>
where
    S: AuthSessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SessionStore<S>
where
    S: AuthSessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Fresh session object for `user_id`, not persisted
    pub fn issue(&self, user_id: UserId) -> AuthSession {
        AuthSession::new(user_id, Utc::now(), self.config.session_ttl)
    }

    /// Persist a new session alongside any existing ones
    pub async fn create(&self, user_id: UserId) -> AuthResult<AuthSession> {
        let session = self.issue(user_id);
        self.session_repo.create(&session).await?;
        Ok(session)
    }

    /// Persist a new session and revoke every earlier one of the user
    pub async fn create_exclusive(&self, user_id: UserId) -> AuthResult<AuthSession> {
        let session = self.issue(user_id);
        let revoked = self.session_repo.replace_all_for_user(&session).await?;

        tracing::debug!(
            user_id = %user_id,
            revoked,
            "Revoked earlier sessions"
        );
        Ok(session)
    }

    pub async fn lookup(&self, session_id: SessionId) -> AuthResult<Option<(AuthSession, User)>> {
        self.session_repo.find_with_user(session_id).await
    }

    pub async fn delete(&self, session_id: SessionId) -> AuthResult<bool> {
        self.session_repo.delete(session_id).await
    }

    pub async fn delete_for_user(&self, user_id: UserId) -> AuthResult<u64> {
        self.session_repo.delete_all_for_user(user_id).await
    }

    /// Replace `old` with a successor carrying a fresh id and window.
    /// `None` when a concurrent request already rotated or deleted `old`.
    pub async fn refresh(&self, old: &AuthSession) -> AuthResult<Option<AuthSession>> {
        let new = old.successor(Utc::now(), self.config.session_ttl);
        if self.session_repo.rotate(old.session_id, &new).await? {
            Ok(Some(new))
        } else {
            Ok(None)
        }
    }

    /// Remove every session already past its expiration
    pub async fn sweep_expired(&self) -> AuthResult<u64> {
        let deleted = self.session_repo.cleanup_expired(Utc::now()).await?;
        if deleted > 0 {
            tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");
        }
        Ok(deleted)
    }

    /// Signed cookie value for `session`
    pub fn token_for(&self, session: &AuthSession) -> String {
        session_token::encode(&self.config.session_secret, session.session_id)
    }

    /// Verify and parse a cookie value
    pub fn parse_token(&self, token: &str) -> Option<SessionId> {
        session_token::decode(&self.config.session_secret, token)
    }
}
