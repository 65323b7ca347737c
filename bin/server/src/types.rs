//! JSON shapes returned to the browser app.

use chrono::{DateTime, Utc};
use clubee_content::{Progress, Zunzun};
use clubee_platform_access::{LoginLogEntry, User};
use serde::{Deserialize, Serialize};

/// The signed-in user.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub google_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            google_id: user.subject().to_string(),
            display_name: user.display_name().to_string(),
            email: user.email().map(str::to_string),
            photo: user.photo().map(str::to_string),
            created_at: user.created_at(),
        }
    }
}

/// One login audit entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginLogInfo {
    pub id: String,
    pub user_id: String,
    pub email: Option<String>,
    pub date: DateTime<Utc>,
}

impl From<LoginLogEntry> for LoginLogInfo {
    fn from(entry: LoginLogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            user_id: entry.user_id.to_string(),
            email: entry.email,
            date: entry.date,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZunzunInfo {
    pub id: String,
    pub author: String,
    pub text: String,
    pub date: DateTime<Utc>,
    pub likes: u32,
    pub is_anonymous: bool,
}

impl From<Zunzun> for ZunzunInfo {
    fn from(zunzun: Zunzun) -> Self {
        Self {
            id: zunzun.id.to_string(),
            author: zunzun.author,
            text: zunzun.text,
            date: zunzun.created_at,
            likes: zunzun.likes,
            is_anonymous: zunzun.is_anonymous,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInfo {
    pub id: String,
    pub user_id: String,
    pub trail: String,
    pub activity_id: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Progress> for ProgressInfo {
    fn from(record: Progress) -> Self {
        Self {
            id: record.id.to_string(),
            user_id: record.user_id.to_string(),
            trail: record.trail,
            activity_id: record.activity_id,
            completed: record.completed,
            completed_at: record.completed_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Body of `POST /api/zunzuns`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewZunzunRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

/// Body of `POST /api/progress`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    #[serde(default)]
    pub trail: String,
    #[serde(default)]
    pub activity_id: String,
    pub completed: bool,
}
