use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a user. Stored as the Postgres enum `role_enum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    Worker,
}

impl UserRole {
    /// Database enum label
    #[inline]
    pub const fn db_code(&self) -> &'static str {
        match self {
            UserRole::Admin => "ADMIN",
            UserRole::Worker => "WORKER",
        }
    }

    /// Lower-case API representation
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Worker => "worker",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Parse a database enum label
    #[inline]
    pub fn from_db_code(code: &str) -> Option<Self> {
        match code {
            "ADMIN" => Some(UserRole::Admin),
            "WORKER" => Some(UserRole::Worker),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_from_db_code() {
        assert_eq!(UserRole::from_db_code("ADMIN"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_db_code("WORKER"), Some(UserRole::Worker));
        assert_eq!(UserRole::from_db_code("admin"), None);
    }

    #[test]
    fn test_user_role_display() {
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::Worker.to_string(), "worker");
        assert_eq!(
            serde_json::to_string(&UserRole::Worker).unwrap(),
            "\"worker\""
        );
    }

    #[test]
    fn test_user_role_checks() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Worker.is_admin());
        assert_eq!(UserRole::default(), UserRole::Worker);
    }
}
