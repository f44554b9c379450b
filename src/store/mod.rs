//! Persistence seam between the handlers and the storage backends.
//!
//! Handlers only see [`PollStore`]. [`PgPollStore`] backs it with PostgreSQL, and
//! [`MemoryPollStore`] keeps everything in process for local runs and the test suite.

mod memory;
mod postgres;

pub use memory::MemoryPollStore;
pub use postgres::PgPollStore;

use crate::db::models::{Choice, Question};
use crate::error::PollError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait PollStore: Send + Sync {
    async fn create_question(
        &self,
        question_text: &str,
        pub_date: DateTime<Utc>,
    ) -> Result<Question, PollError>;

    /// Creates the question and all of its choices as one unit: on failure nothing
    /// is left behind.
    async fn create_question_with_choices(
        &self,
        question_text: &str,
        pub_date: DateTime<Utc>,
        choice_texts: &[String],
    ) -> Result<(Question, Vec<Choice>), PollError>;

    async fn question(&self, question_id: Uuid) -> Result<Option<Question>, PollError>;

    /// Newest `pub_date` first, ties ordered by text, at most `limit` entries.
    async fn latest_questions(&self, limit: usize) -> Result<Vec<Question>, PollError>;

    /// Removes the question together with all of its choices.
    async fn delete_question(&self, question_id: Uuid) -> Result<bool, PollError>;

    /// Fails with [`PollError::QuestionNotFound`] for an unknown question.
    async fn create_choice(&self, question_id: Uuid, choice_text: &str)
    -> Result<Choice, PollError>;

    async fn choice(&self, choice_id: Uuid) -> Result<Option<Choice>, PollError>;

    async fn choices(&self, question_id: Uuid) -> Result<Vec<Choice>, PollError>;

    /// Adds exactly one vote in a single atomic step. Returns false, without touching
    /// any tally, when `choice_id` is not a choice of `question_id`.
    async fn record_vote(&self, question_id: Uuid, choice_id: Uuid) -> Result<bool, PollError>;
}
