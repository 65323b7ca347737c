//! Postgres repositories for zunzuns and trail progress.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clubee_content::{ContentError, Progress, ProgressStore, ProgressUpdate, Zunzun, ZunzunStore};
use clubee_core::{ProgressId, UserId, ZunzunId};
use rootcause::Report;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;

/// Row type for zunzun queries.
#[derive(FromRow)]
struct ZunzunRow {
    id: String,
    author_id: Option<String>,
    author: String,
    text: String,
    is_anonymous: bool,
    likes: i32,
    created_at: DateTime<Utc>,
}

impl ZunzunRow {
    fn try_into_zunzun(self) -> Result<Zunzun, Report<ContentError>> {
        let id = ZunzunId::from_str(&self.id)
            .map_err(|e| ContentError::storage("read zunzun", e))?;
        let author_id = self
            .author_id
            .as_deref()
            .map(UserId::from_str)
            .transpose()
            .map_err(|e| ContentError::storage("read zunzun", e))?;
        Ok(Zunzun {
            id,
            author_id,
            author: self.author,
            text: self.text,
            is_anonymous: self.is_anonymous,
            likes: u32::try_from(self.likes).unwrap_or_default(),
            created_at: self.created_at,
        })
    }
}

/// Row type for progress queries.
#[derive(FromRow)]
struct ProgressRow {
    id: String,
    user_id: String,
    trail: String,
    activity_id: String,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProgressRow {
    fn try_into_progress(self) -> Result<Progress, Report<ContentError>> {
        let id = ProgressId::from_str(&self.id)
            .map_err(|e| ContentError::storage("read progress", e))?;
        let user_id = UserId::from_str(&self.user_id)
            .map_err(|e| ContentError::storage("read progress", e))?;
        Ok(Progress {
            id,
            user_id,
            trail: self.trail,
            activity_id: self.activity_id,
            completed: self.completed,
            completed_at: self.completed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Repository for zunzun posts.
pub struct ZunzunRepository {
    pool: PgPool,
}

impl ZunzunRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ZunzunStore for ZunzunRepository {
    async fn create(&self, zunzun: &Zunzun) -> Result<(), Report<ContentError>> {
        sqlx::query(
            r#"
            INSERT INTO zunzuns (id, author_id, author, text, is_anonymous, likes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(zunzun.id.to_string())
        .bind(zunzun.author_id.map(|id| id.to_string()))
        .bind(&zunzun.author)
        .bind(&zunzun.text)
        .bind(zunzun.is_anonymous)
        .bind(i32::try_from(zunzun.likes).unwrap_or(i32::MAX))
        .bind(zunzun.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| ContentError::storage("save zunzun", e))?;

        Ok(())
    }

    async fn list_recent(&self) -> Result<Vec<Zunzun>, Report<ContentError>> {
        let rows: Vec<ZunzunRow> = sqlx::query_as(
            r#"
            SELECT id, author_id, author, text, is_anonymous, likes, created_at
            FROM zunzuns
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ContentError::storage("list zunzuns", e))?;

        rows.into_iter().map(ZunzunRow::try_into_zunzun).collect()
    }
}

/// Repository for trail progress.
pub struct ProgressRepository {
    pool: PgPool,
}

impl ProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressStore for ProgressRepository {
    async fn upsert(&self, update: &ProgressUpdate) -> Result<Progress, Report<ContentError>> {
        let candidate = Progress::from_update(update);

        let row: ProgressRow = sqlx::query_as(
            r#"
            INSERT INTO progress
                (id, user_id, trail, activity_id, completed, completed_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, trail, activity_id) DO UPDATE
            SET completed = EXCLUDED.completed,
                completed_at = EXCLUDED.completed_at,
                updated_at = EXCLUDED.updated_at
            RETURNING id, user_id, trail, activity_id, completed, completed_at, created_at, updated_at
            "#,
        )
        .bind(candidate.id.to_string())
        .bind(candidate.user_id.to_string())
        .bind(&candidate.trail)
        .bind(&candidate.activity_id)
        .bind(candidate.completed)
        .bind(candidate.completed_at)
        .bind(candidate.created_at)
        .bind(candidate.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ContentError::storage("save progress", e))?;

        row.try_into_progress()
    }

    async fn list_for_trail(
        &self,
        user_id: UserId,
        trail: &str,
    ) -> Result<Vec<Progress>, Report<ContentError>> {
        let rows: Vec<ProgressRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, trail, activity_id, completed, completed_at, created_at, updated_at
            FROM progress
            WHERE user_id = $1 AND trail = $2
            ORDER BY created_at
            "#,
        )
        .bind(user_id.to_string())
        .bind(trail)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ContentError::storage("load progress", e))?;

        rows.into_iter().map(ProgressRow::try_into_progress).collect()
    }
}
