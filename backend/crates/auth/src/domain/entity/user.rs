//! User Entity
//!
//! Identity record. Immutable after registration.

use chrono::{NaiveDate, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_password::UserPassword, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, lower-cased login identifier
    pub email: Email,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub middle_name: Option<PersonName>,
    pub password_hash: UserPassword,
    pub created_at: NaiveDate,
    pub user_role: UserRole,
}

impl User {
    /// Create a new user dated today
    pub fn new(
        email: Email,
        first_name: PersonName,
        last_name: PersonName,
        middle_name: Option<PersonName>,
        password_hash: UserPassword,
        user_role: UserRole,
    ) -> Self {
        Self {
            user_id: UserId::new(),
            email,
            first_name,
            last_name,
            middle_name,
            password_hash,
            created_at: Utc::now().date_naive(),
            user_role,
        }
    }

    /// Mutations require ADMIN
    pub fn can_mutate(&self) -> bool {
        self.user_role.is_admin()
    }
}
