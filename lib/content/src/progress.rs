//! Trail progress records.
//!
//! One record per (user, trail, activity). Saving the same key again updates
//! the existing record rather than adding another.

use chrono::{DateTime, Utc};
use clubee_core::{ProgressId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// A validated request to set an activity's completion state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    user_id: UserId,
    trail: String,
    activity_id: String,
    completed: bool,
}

impl ProgressUpdate {
    /// # Errors
    ///
    /// Returns `ContentError::Invalid` when `trail` or `activity_id` is empty.
    pub fn new(
        user_id: UserId,
        trail: String,
        activity_id: String,
        completed: bool,
    ) -> Result<Self, ContentError> {
        if trail.is_empty() {
            return Err(ContentError::invalid("trail", "must not be empty"));
        }
        if activity_id.is_empty() {
            return Err(ContentError::invalid("activityId", "must not be empty"));
        }
        Ok(Self {
            user_id,
            trail,
            activity_id,
            completed,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn trail(&self) -> &str {
        &self.trail
    }

    #[must_use]
    pub fn activity_id(&self) -> &str {
        &self.activity_id
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Completion timestamp implied by this update at `now`.
    #[must_use]
    pub fn completed_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.completed.then_some(now)
    }
}

/// Stored completion state of one activity on one trail for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub id: ProgressId,
    pub user_id: UserId,
    pub trail: String,
    pub activity_id: String,
    pub completed: bool,
    /// Set while `completed` is true.
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Progress {
    /// Creates a record from an update.
    #[must_use]
    pub fn from_update(update: &ProgressUpdate) -> Self {
        let now = Utc::now();
        Self {
            id: ProgressId::new(),
            user_id: update.user_id,
            trail: update.trail.clone(),
            activity_id: update.activity_id.clone(),
            completed: update.completed,
            completed_at: update.completed_at(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies an update for the same key in place.
    pub fn apply(&mut self, update: &ProgressUpdate) {
        let now = Utc::now();
        self.completed = update.completed;
        self.completed_at = update.completed_at(now);
        self.updated_at = now;
    }

    /// Returns true if this record is the one `update` targets.
    #[must_use]
    pub fn matches(&self, update: &ProgressUpdate) -> bool {
        self.user_id == update.user_id
            && self.trail == update.trail
            && self.activity_id == update.activity_id
    }
}
