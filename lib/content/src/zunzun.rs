//! Zunzun posts.
//!
//! A zunzun is a short public message. Anonymous zunzuns keep the author's id
//! for moderation but display a fixed label instead of the author's name.

use chrono::{DateTime, Utc};
use clubee_core::{UserId, ZunzunId};
use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Longest accepted zunzun, in characters.
pub const MAX_TEXT_CHARS: usize = 280;

/// Author label shown on anonymous zunzuns.
pub const ANONYMOUS_AUTHOR: &str = "Abelha Anônima 🤫";

/// A validated request to publish a zunzun.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewZunzun {
    text: String,
    is_anonymous: bool,
}

impl NewZunzun {
    /// Validates the text: it must be non-empty and at most
    /// [`MAX_TEXT_CHARS`] characters. An emoji outside the BMP counts once,
    /// not as two UTF-16 units.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Invalid` for empty or oversized text.
    pub fn new(text: String, is_anonymous: bool) -> Result<Self, ContentError> {
        if text.is_empty() {
            return Err(ContentError::invalid("text", "must not be empty"));
        }
        let chars = text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(ContentError::invalid(
                "text",
                format!("{chars} characters exceeds the {MAX_TEXT_CHARS} limit"),
            ));
        }
        Ok(Self { text, is_anonymous })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.is_anonymous
    }
}

/// A published zunzun.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zunzun {
    pub id: ZunzunId,
    /// The posting user, when known.
    pub author_id: Option<UserId>,
    /// Name shown to readers.
    pub author: String,
    pub text: String,
    pub is_anonymous: bool,
    pub likes: u32,
    pub created_at: DateTime<Utc>,
}

impl Zunzun {
    /// Publishes a zunzun for `author_id`, labelled with `author_name` unless
    /// anonymous.
    #[must_use]
    pub fn publish(draft: NewZunzun, author_id: UserId, author_name: &str) -> Self {
        let author = if draft.is_anonymous {
            ANONYMOUS_AUTHOR.to_string()
        } else {
            author_name.to_string()
        };
        Self {
            id: ZunzunId::new(),
            author_id: Some(author_id),
            author,
            text: draft.text,
            is_anonymous: draft.is_anonymous,
            likes: 0,
            created_at: Utc::now(),
        }
    }
}
