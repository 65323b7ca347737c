//! Postgres repositories for users, sessions, and the login log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clubee_core::{LoginLogId, UserId};
use clubee_platform_access::{
    ExternalProfile, LoginLogEntry, LoginLogStore, Registration, Session, SessionId,
    SessionStore, StoreError, User, UserStore,
};
use rootcause::Report;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use tracing::instrument;

/// Row type for user queries.
#[derive(FromRow)]
struct UserRow {
    id: String,
    google_id: String,
    display_name: String,
    email: Option<String>,
    photo: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self) -> Result<User, Report<StoreError>> {
        let id = UserId::from_str(&self.id)
            .map_err(|e| StoreError::read("user", format!("invalid user id '{}': {e}", self.id)))?;
        Ok(User::with_all_fields(
            id,
            self.google_id,
            self.display_name,
            self.email,
            self.photo,
            self.created_at,
            self.updated_at,
        ))
    }
}

/// Row type for session queries.
#[derive(FromRow)]
struct SessionRow {
    id: String,
    principal: Vec<u8>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session::with_all_fields(
            SessionId::new(row.id),
            row.principal,
            row.created_at,
            row.expires_at,
        )
    }
}

/// Row type for login log queries.
#[derive(FromRow)]
struct LoginLogRow {
    id: String,
    user_id: String,
    email: Option<String>,
    date: DateTime<Utc>,
}

impl LoginLogRow {
    fn try_into_entry(self) -> Result<LoginLogEntry, Report<StoreError>> {
        let id = LoginLogId::from_str(&self.id)
            .map_err(|e| StoreError::read("login log", e.to_string()))?;
        let user_id = UserId::from_str(&self.user_id)
            .map_err(|e| StoreError::read("login log", e.to_string()))?;
        Ok(LoginLogEntry {
            id,
            user_id,
            email: self.email,
            date: self.date,
        })
    }
}

const USER_COLUMNS: &str = "id, google_id, display_name, email, photo, created_at, updated_at";

/// Repository for user operations.
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        column: &str,
        value: String,
    ) -> Result<Option<User>, Report<StoreError>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1"))
                .bind(value)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::read("user", e))?;

        row.map(UserRow::try_into_user).transpose()
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Report<StoreError>> {
        self.fetch_one_where("id", id.to_string()).await
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, Report<StoreError>> {
        self.fetch_one_where("google_id", subject.to_string()).await
    }

    #[instrument(skip(self, profile), fields(google_id = %profile.subject))]
    async fn find_or_create(
        &self,
        profile: &ExternalProfile,
    ) -> Result<Registration, Report<StoreError>> {
        let candidate = User::from_profile(profile);

        // The unique index on google_id decides concurrent first logins.
        let inserted = sqlx::query(
            r#"
            INSERT INTO users (id, google_id, display_name, email, photo, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (google_id) DO NOTHING
            "#,
        )
        .bind(candidate.id().to_string())
        .bind(candidate.subject())
        .bind(candidate.display_name())
        .bind(candidate.email())
        .bind(candidate.photo())
        .bind(candidate.created_at())
        .bind(candidate.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::write("user", e))?
        .rows_affected();

        if inserted == 1 {
            tracing::info!(user_id = %candidate.id(), "created user");
            return Ok(Registration {
                user: candidate,
                is_new_user: true,
            });
        }

        let user = self
            .find_by_subject(&profile.subject)
            .await?
            .ok_or_else(|| StoreError::read("user", "user vanished after conflicting insert"))?;
        Ok(Registration {
            user,
            is_new_user: false,
        })
    }
}

/// Repository for session operations.
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn create(&self, session: &Session) -> Result<(), Report<StoreError>> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, principal, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(session.id().as_str())
        .bind(session.principal())
        .bind(session.created_at())
        .bind(session.expires_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::write("session", e))?;

        Ok(())
    }

    async fn find(&self, id: &SessionId) -> Result<Option<Session>, Report<StoreError>> {
        let row: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, principal, created_at, expires_at
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::read("session", e))?;

        Ok(row.map(Session::from))
    }

    async fn touch(
        &self,
        id: &SessionId,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Report<StoreError>> {
        sqlx::query("UPDATE sessions SET expires_at = $2 WHERE id = $1")
            .bind(id.as_str())
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::write("session", e))?;

        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), Report<StoreError>> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::write("session", e))?;

        Ok(())
    }

    async fn delete_expired(&self) -> Result<u64, Report<StoreError>> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::write("session", e))?;

        Ok(result.rows_affected())
    }
}

/// Repository for the login audit log.
pub struct LoginLogRepository {
    pool: PgPool,
}

impl LoginLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoginLogStore for LoginLogRepository {
    async fn append(&self, entry: &LoginLogEntry) -> Result<(), Report<StoreError>> {
        sqlx::query(
            r#"
            INSERT INTO login_logs (id, user_id, email, date)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.user_id.to_string())
        .bind(entry.email.as_deref())
        .bind(entry.date)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::write("login log", e))?;

        Ok(())
    }

    async fn recent(&self) -> Result<Vec<LoginLogEntry>, Report<StoreError>> {
        let rows: Vec<LoginLogRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, email, date
            FROM login_logs
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::read("login log", e))?;

        rows.into_iter().map(LoginLogRow::try_into_entry).collect()
    }
}
