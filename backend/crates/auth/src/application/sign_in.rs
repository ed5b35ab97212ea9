//! Sign In Use Case
//!
//! Authenticates a user and creates a session, revoking earlier ones.

use std::sync::Arc;

use platform::crypto::to_base64;

use crate::application::config::AuthConfig;
use crate::application::session_store::SessionStore;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    pub user: User,
    pub session: AuthSession,
    /// Signed cookie value
    pub session_token: String,
}

impl std::fmt::Debug for SignInOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignInOutput")
            .field("user", &self.user)
            .field("session", &self.session)
            .field("session_token", &"[REDACTED]")
            .finish()
    }
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository + AuthSessionRepository,
{
    repo: Arc<R>,
    sessions: SessionStore<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository + AuthSessionRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            sessions: SessionStore::new(repo.clone(), config.clone()),
            repo,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // Malformed input is reported exactly like a wrong password
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let hasher = &self.config.password_hasher;
        let Some(user) = self.repo.find_by_email(&email).await? else {
            // Spend the same derivation time as a real check
            let decoy = UserPassword::from_db(to_base64(&vec![0u8; hasher.salt_size() + 32]));
            let _ = decoy.verify(&raw_password, hasher);
            return Err(AuthError::InvalidCredentials);
        };

        if !user.password_hash.verify(&raw_password, hasher) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = self.sessions.create_exclusive(user.user_id).await?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            "User signed in"
        );

        let session_token = self.sessions.token_for(&session);
        Ok(SignInOutput {
            user,
            session,
            session_token,
        })
    }
}
