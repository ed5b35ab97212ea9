//! Sign Up Use Case
//!
//! Registers a WORKER user and opens its first session.

use std::sync::Arc;

use kernel::error::validation::ValidationErrors;

use crate::application::config::AuthConfig;
use crate::application::session_store::SessionStore;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    person_name::PersonName,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
}

/// Sign up output
pub struct SignUpOutput {
    pub user: User,
    pub session: AuthSession,
    /// Signed cookie value
    pub session_token: String,
}

impl std::fmt::Debug for SignUpOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpOutput")
            .field("user", &self.user)
            .field("session", &self.session)
            .field("session_token", &"[REDACTED]")
            .finish()
    }
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserRepository + AuthSessionRepository,
{
    repo: Arc<R>,
    sessions: SessionStore<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignUpUseCase<R>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        // Report every bad field at once
        let mut errors = ValidationErrors::new();
        let email = errors.check("email", Email::new(input.email));
        let password = errors.check("password", RawPassword::new(input.password));
        let first_name = errors.check("first_name", PersonName::new(&input.first_name));
        let last_name = errors.check("last_name", PersonName::new(&input.last_name));
        let middle_name = errors.check(
            "middle_name",
            PersonName::optional(input.middle_name.as_deref()),
        );

        let (Some(email), Some(password), Some(first_name), Some(last_name), Some(middle_name)) =
            (email, password, first_name, last_name, middle_name)
        else {
            return Err(AuthError::Validation(errors));
        };

        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = UserPassword::from_raw(&password, &self.config.password_hasher);
        let user = User::new(
            email,
            first_name,
            last_name,
            middle_name,
            password_hash,
            UserRole::Worker,
        );
        let session = self.sessions.issue(user.user_id);

        // Unique violation from a concurrent sign up surfaces as EmailTaken
        self.repo.create_with_session(&user, &session).await?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            "User registered"
        );

        let session_token = self.sessions.token_for(&session);
        Ok(SignUpOutput {
            user,
            session,
            session_token,
        })
    }
}
