//! In-memory repository for tests
//!
//! Implements the same repository traits as [`PgAuthRepository`]
//! (`crate::infra::postgres`). A single mutex makes every method atomic.
//!
//! [`PgAuthRepository`]: crate::infra::postgres::PgAuthRepository

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use kernel::id::{SessionId, UserId};

use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    sessions: HashMap<SessionId, AuthSession>,
}

#[derive(Clone, Default)]
pub struct InMemoryAuthRepository {
    state: Arc<Mutex<State>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking test must not poison the others sharing this store
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seed a user directly, e.g. an ADMIN that registration cannot create
    pub fn insert_user(&self, user: User) {
        self.lock().users.insert(user.user_id, user);
    }

    /// Seed a session directly, e.g. one created in the past
    pub fn insert_session(&self, session: AuthSession) {
        self.lock().sessions.insert(session.session_id, session);
    }

    /// Remove a user and cascade its sessions
    pub fn remove_user(&self, user_id: UserId) {
        let mut state = self.lock();
        state.users.remove(&user_id);
        state.sessions.retain(|_, s| s.user_id != user_id);
    }

    pub fn contains_session(&self, session_id: SessionId) -> bool {
        self.lock().sessions.contains_key(&session_id)
    }

    pub fn sessions_for(&self, user_id: UserId) -> Vec<AuthSession> {
        self.lock()
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.lock()
            .users
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned()
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.lock().users.values().any(|u| &u.email == email))
    }

    async fn create_with_session(&self, user: &User, session: &AuthSession) -> AuthResult<()> {
        let mut state = self.lock();
        if state.users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        state.users.insert(user.user_id, user.clone());
        state.sessions.insert(session.session_id, session.clone());
        Ok(())
    }
}

impl AuthSessionRepository for InMemoryAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        self.insert_session(session.clone());
        Ok(())
    }

    async fn find_with_user(
        &self,
        session_id: SessionId,
    ) -> AuthResult<Option<(AuthSession, User)>> {
        let state = self.lock();
        let found = state.sessions.get(&session_id).and_then(|session| {
            state
                .users
                .get(&session.user_id)
                .map(|user| (session.clone(), user.clone()))
        });
        Ok(found)
    }

    async fn delete(&self, session_id: SessionId) -> AuthResult<bool> {
        Ok(self.lock().sessions.remove(&session_id).is_some())
    }

    async fn delete_all_for_user(&self, user_id: UserId) -> AuthResult<u64> {
        let mut state = self.lock();
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn replace_all_for_user(&self, session: &AuthSession) -> AuthResult<u64> {
        let mut state = self.lock();
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.user_id != session.user_id);
        let removed = (before - state.sessions.len()) as u64;
        state.sessions.insert(session.session_id, session.clone());
        Ok(removed)
    }

    async fn rotate(&self, old: SessionId, new: &AuthSession) -> AuthResult<bool> {
        let mut state = self.lock();
        if state.sessions.remove(&old).is_none() {
            return Ok(false);
        }
        state.sessions.insert(new.session_id, new.clone());
        Ok(true)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut state = self.lock();
        let before = state.sessions.len();
        state.sessions.retain(|_, s| !s.is_expired_at(now));
        Ok((before - state.sessions.len()) as u64)
    }
}
