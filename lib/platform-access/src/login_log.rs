//! Login audit log.
//!
//! Every successful OAuth callback appends one [`LoginLogEntry`]. Writing the
//! entry is best-effort: a failure is logged and never interrupts the login.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clubee_core::{LoginLogId, UserId};
use rootcause::Report;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::LoginLogStore;

/// One successful authentication. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginLogEntry {
    pub id: LoginLogId,
    pub user_id: UserId,
    /// The user's email at login time; absent when the user has none.
    pub email: Option<String>,
    pub date: DateTime<Utc>,
}

impl LoginLogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(user_id: UserId, email: Option<String>) -> Self {
        Self {
            id: LoginLogId::new(),
            user_id,
            email,
            date: Utc::now(),
        }
    }
}

/// Records logins into a [`LoginLogStore`].
#[derive(Clone)]
pub struct LoginAudit {
    store: Arc<dyn LoginLogStore>,
}

impl LoginAudit {
    #[must_use]
    pub fn new(store: Arc<dyn LoginLogStore>) -> Self {
        Self { store }
    }

    /// Appends a login entry. Failures are logged and swallowed.
    ///
    /// Returns the entry when it was written.
    pub async fn record(&self, user_id: UserId, email: Option<&str>) -> Option<LoginLogEntry> {
        let entry = LoginLogEntry::new(user_id, email.map(str::to_string));
        match self.store.append(&entry).await {
            Ok(()) => {
                tracing::info!(user_id = %user_id, "login recorded");
                Some(entry)
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "failed to record login");
                None
            }
        }
    }

    /// Lists recorded logins, newest first.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the log cannot be read.
    pub async fn recent(&self) -> Result<Vec<LoginLogEntry>, Report<StoreError>> {
        self.store.recent().await
    }
}
