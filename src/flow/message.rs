//! Chat transcript messages

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Assistant,
}

/// One chat turn. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub author: Author,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(author: Author, content: impl Into<String>) -> Self {
        Self {
            id: super::generate_id(),
            content: content.into(),
            author,
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Author::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Author::Assistant, content)
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }
}

/// Render a timestamp as local `HH:MM` for the transcript display
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M").to_string()
}
