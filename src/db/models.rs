use chrono::Duration;
use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

/// Matches the `VARCHAR(200)` text columns of `questions` and `choices`.
pub const TEXT_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: Uuid,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
}

impl Question {
    /// True when the question went out during the day before `now`.
    /// Questions dated in the future are never recent.
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        now - Duration::days(1) <= self.pub_date && self.pub_date <= now
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Choice {
    pub id: Uuid,
    pub question_id: Uuid,
    pub choice_text: String,
    pub votes: i32,
}
