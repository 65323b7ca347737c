//! In-memory content stores for development and tests.

use async_trait::async_trait;
use clubee_core::UserId;
use rootcause::Report;
use tokio::sync::RwLock;

use crate::error::ContentError;
use crate::progress::{Progress, ProgressUpdate};
use crate::store::{ProgressStore, ZunzunStore};
use crate::zunzun::Zunzun;

/// In-memory [`ZunzunStore`].
#[derive(Debug, Default)]
pub struct InMemoryZunzunStore {
    zunzuns: RwLock<Vec<Zunzun>>,
}

impl InMemoryZunzunStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ZunzunStore for InMemoryZunzunStore {
    async fn create(&self, zunzun: &Zunzun) -> Result<(), Report<ContentError>> {
        self.zunzuns.write().await.push(zunzun.clone());
        Ok(())
    }

    async fn list_recent(&self) -> Result<Vec<Zunzun>, Report<ContentError>> {
        let mut zunzuns = self.zunzuns.read().await.clone();
        // Reversed first so ties keep the latest insert on top.
        zunzuns.reverse();
        zunzuns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(zunzuns)
    }
}

/// In-memory [`ProgressStore`].
#[derive(Debug, Default)]
pub struct InMemoryProgressStore {
    records: RwLock<Vec<Progress>>,
}

impl InMemoryProgressStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn upsert(&self, update: &ProgressUpdate) -> Result<Progress, Report<ContentError>> {
        let mut records = self.records.write().await;
        if let Some(existing) = records.iter_mut().find(|r| r.matches(update)) {
            existing.apply(update);
            return Ok(existing.clone());
        }
        let record = Progress::from_update(update);
        records.push(record.clone());
        Ok(record)
    }

    async fn list_for_trail(
        &self,
        user_id: UserId,
        trail: &str,
    ) -> Result<Vec<Progress>, Report<ContentError>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id && r.trail == trail)
            .cloned()
            .collect())
    }
}
