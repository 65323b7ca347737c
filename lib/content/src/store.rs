//! Storage seams for zunzuns and trail progress.

use async_trait::async_trait;
use clubee_core::UserId;
use rootcause::Report;

use crate::error::ContentError;
use crate::progress::{Progress, ProgressUpdate};
use crate::zunzun::Zunzun;

/// Persistence for zunzun posts.
#[async_trait]
pub trait ZunzunStore: Send + Sync {
    async fn create(&self, zunzun: &Zunzun) -> Result<(), Report<ContentError>>;

    /// Lists zunzuns, newest first.
    async fn list_recent(&self) -> Result<Vec<Zunzun>, Report<ContentError>>;
}

/// Persistence for per-user trail progress.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Inserts or updates the record keyed by (user, trail, activity) and
    /// returns the stored state.
    async fn upsert(&self, update: &ProgressUpdate) -> Result<Progress, Report<ContentError>>;

    /// Lists a user's records for one trail.
    async fn list_for_trail(
        &self,
        user_id: UserId,
        trail: &str,
    ) -> Result<Vec<Progress>, Report<ContentError>>;
}
