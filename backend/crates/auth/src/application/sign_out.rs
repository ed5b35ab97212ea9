//! Sign Out Use Case
//!
//! Invalidates a user session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_store::SessionStore;
use crate::domain::repository::AuthSessionRepository;
use crate::error::{AuthError, AuthResult};

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: AuthSessionRepository,
{
    sessions: SessionStore<S>,
}

impl<S> SignOutUseCase<S>
where
    S: AuthSessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            sessions: SessionStore::new(session_repo, config),
        }
    }

    /// Sign out from the presented session.
    ///
    /// A token that does not verify or names an unknown session still
    /// succeeds; the caller clears the cookie either way.
    pub async fn execute(&self, session_token: Option<&str>) -> AuthResult<()> {
        let token = session_token.ok_or(AuthError::SessionMissing)?;

        let Some(session_id) = self.sessions.parse_token(token) else {
            tracing::debug!("Sign out with unverifiable token");
            return Ok(());
        };

        if self.sessions.delete(session_id).await? {
            tracing::info!(session_id = %session_id, "User signed out");
        }
        Ok(())
    }
}
