//! Check Session Use Case
//!
//! Resolves the caller from a session token, enforcing hard expiry and
//! rotating sessions that passed the refresh threshold.

use std::sync::Arc;

use axum::http::Method;
use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::application::session_store::SessionStore;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::AuthSessionRepository;
use crate::error::{AuthError, AuthResult};

/// Resolved caller, attached to the request for downstream handlers
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
    /// Session the request is now authenticated by
    pub session: AuthSession,
    /// Set when this request rotated the session; its token must be
    /// written back to the client
    pub new_session: Option<AuthSession>,
}

impl AuthContext {
    /// Read verbs pass for every role, POST/PUT/DELETE need ADMIN
    pub fn authorize(&self, method: &Method) -> AuthResult<()> {
        if is_mutating(method) && !self.user.can_mutate() {
            return Err(AuthError::Forbidden);
        }
        Ok(())
    }
}

pub fn is_mutating(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::DELETE)
}

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: AuthSessionRepository,
{
    sessions: SessionStore<S>,
    config: Arc<AuthConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: AuthSessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            sessions: SessionStore::new(session_repo, config.clone()),
            config,
        }
    }

    pub async fn execute(&self, session_token: Option<&str>) -> AuthResult<AuthContext> {
        let token = session_token.ok_or(AuthError::SessionMissing)?;
        let session_id = self
            .sessions
            .parse_token(token)
            .ok_or(AuthError::SessionInvalid)?;

        let (session, user) = self
            .sessions
            .lookup(session_id)
            .await?
            .ok_or(AuthError::SessionInvalid)?;

        let now = Utc::now();

        if session.is_expired_at(now) {
            self.sessions.delete(session.session_id).await?;
            tracing::debug!(session_id = %session.session_id, "Expired session removed");
            return Err(AuthError::SessionExpired);
        }

        if !session.needs_refresh_at(now, self.config.session_refresh_after) {
            return Ok(AuthContext {
                user,
                session,
                new_session: None,
            });
        }

        match self.sessions.refresh(&session).await? {
            Some(new_session) => {
                tracing::debug!(
                    user_id = %user.user_id,
                    old_session_id = %session.session_id,
                    session_id = %new_session.session_id,
                    "Session refreshed"
                );
                Ok(AuthContext {
                    user,
                    session: new_session.clone(),
                    new_session: Some(new_session),
                })
            }
            None => {
                // A concurrent request rotated it first; this one was
                // valid when it arrived and proceeds without a new cookie.
                tracing::debug!(
                    session_id = %session.session_id,
                    "Session already rotated by a concurrent request"
                );
                Ok(AuthContext {
                    user,
                    session,
                    new_session: None,
                })
            }
        }
    }

    /// Signed cookie value for a freshly rotated session
    pub fn token_for(&self, session: &AuthSession) -> String {
        self.sessions.token_for(session)
    }
}
