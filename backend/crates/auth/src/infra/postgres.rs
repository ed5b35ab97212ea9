//! PostgreSQL Repository Implementations

use chrono::{DateTime, NaiveDate, Utc};
use kernel::id::{SessionId, UserId};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Row mapping
// ============================================================================

const USER_COLUMNS: &str = r#"
    u.user_id,
    u.email,
    u.first_name,
    u.last_name,
    u.middle_name,
    u.hashed_password,
    u.created_at AS user_created_at,
    u.role::TEXT AS role
"#;

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    middle_name: Option<String>,
    hashed_password: String,
    user_created_at: NaiveDate,
    role: String,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let user_role = UserRole::from_db_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Unknown role value: {}", self.role)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.user_id),
            email: Email::from_db(self.email),
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            middle_name: self.middle_name.map(PersonName::from_db),
            password_hash: UserPassword::from_db(self.hashed_password),
            created_at: self.user_created_at,
            user_role,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionWithUserRow {
    session_id: Uuid,
    created_at: DateTime<Utc>,
    expiration_at: DateTime<Utc>,
    #[sqlx(flatten)]
    user: UserRow,
}

async fn insert_session(
    tx: &mut Transaction<'_, Postgres>,
    session: &AuthSession,
) -> AuthResult<()> {
    sqlx::query(
        r#"
        INSERT INTO user_sessions (session_id, user_id, created_at, expiration_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(session.session_id.as_uuid())
    .bind(session.user_id.as_uuid())
    .bind(session.created_at)
    .bind(session.expiration_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users u WHERE u.email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn create_with_session(&self, user: &User, session: &AuthSession) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (
                user_id,
                email,
                first_name,
                last_name,
                middle_name,
                hashed_password,
                created_at,
                role
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8::role_enum)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.middle_name.as_ref().map(PersonName::as_str))
        .bind(user.password_hash.as_str())
        .bind(user.created_at)
        .bind(user.user_role.db_code())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::EmailTaken
            } else {
                AuthError::Database(e)
            }
        })?;

        insert_session(&mut tx, session).await?;
        tx.commit().await?;

        Ok(())
    }
}

// ============================================================================
// Auth Session Repository Implementation
// ============================================================================

impl AuthSessionRepository for PgAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_session(&mut tx, session).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_with_user(
        &self,
        session_id: SessionId,
    ) -> AuthResult<Option<(AuthSession, User)>> {
        let row = sqlx::query_as::<_, SessionWithUserRow>(&format!(
            r#"
            SELECT
                s.session_id,
                s.created_at,
                s.expiration_at,
                {USER_COLUMNS}
            FROM user_sessions s
            JOIN users u ON u.user_id = s.user_id
            WHERE s.session_id = $1
            "#
        ))
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = row.user.into_user()?;
        let session = AuthSession {
            session_id: SessionId::from_uuid(row.session_id),
            user_id: user.user_id,
            created_at: row.created_at,
            expiration_at: row.expiration_at,
        };

        Ok(Some((session, user)))
    }

    async fn delete(&self, session_id: SessionId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM user_sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn delete_all_for_user(&self, user_id: UserId) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn replace_all_for_user(&self, session: &AuthSession) -> AuthResult<u64> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(session.user_id.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        insert_session(&mut tx, session).await?;
        tx.commit().await?;

        Ok(deleted)
    }

    async fn rotate(&self, old: SessionId, new: &AuthSession) -> AuthResult<bool> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM user_sessions WHERE session_id = $1")
            .bind(old.as_uuid())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            // Dropping the transaction rolls it back
            return Ok(false);
        }

        insert_session(&mut tx, new).await?;
        tx.commit().await?;

        Ok(true)
    }

    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM user_sessions WHERE expiration_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }
}
