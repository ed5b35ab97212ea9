//! Auth Session Entity
//!
//! Server-side session referenced by the signed cookie token.
//! Lifecycle: `ACTIVE -> (refresh) -> ACTIVE'` (old id gone) `-> DELETED`
//! on expiry or logout.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{SessionId, UserId};

/// Auth session entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    /// Always later than `created_at`
    pub expiration_at: DateTime<Utc>,
}

impl AuthSession {
    /// Create a new session starting at `now`
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user_id: UserId, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            session_id: SessionId::new(),
            user_id,
            created_at: now,
            expiration_at: now + ttl,
        }
    }

    /// Hard expiry, no grace period
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expiration_at
    }

    /// Past the sliding refresh threshold measured from creation
    pub fn needs_refresh_at(&self, now: DateTime<Utc>, refresh_after: Duration) -> bool {
        now >= self.created_at + refresh_after
    }

    /// Successor session for the same user
    pub fn successor(&self, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self::new(self.user_id, now, ttl)
    }
}
