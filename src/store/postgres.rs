use super::PollStore;
use crate::db::{self, DbPool};
use crate::db::models::{Choice, Question};
use crate::error::PollError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct PgPollStore {
    pool: DbPool,
}

impl PgPollStore {
    pub fn new(pool: DbPool) -> Self {
        PgPollStore { pool }
    }
}

#[async_trait]
impl PollStore for PgPollStore {
    async fn create_question(
        &self,
        question_text: &str,
        pub_date: DateTime<Utc>,
    ) -> Result<Question, PollError> {
        Ok(db::create_question(&self.pool, question_text, pub_date).await?)
    }

    async fn create_question_with_choices(
        &self,
        question_text: &str,
        pub_date: DateTime<Utc>,
        choice_texts: &[String],
    ) -> Result<(Question, Vec<Choice>), PollError> {
        Ok(db::create_question_with_choices(&self.pool, question_text, pub_date, choice_texts)
            .await?)
    }

    async fn question(&self, question_id: Uuid) -> Result<Option<Question>, PollError> {
        Ok(db::get_question(&self.pool, question_id).await?)
    }

    async fn latest_questions(&self, limit: usize) -> Result<Vec<Question>, PollError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(db::get_latest_questions(&self.pool, limit).await?)
    }

    async fn delete_question(&self, question_id: Uuid) -> Result<bool, PollError> {
        Ok(db::delete_question(&self.pool, question_id).await?)
    }

    async fn create_choice(
        &self,
        question_id: Uuid,
        choice_text: &str,
    ) -> Result<Choice, PollError> {
        db::add_choice(&self.pool, question_id, choice_text)
            .await?
            .ok_or(PollError::QuestionNotFound)
    }

    async fn choice(&self, choice_id: Uuid) -> Result<Option<Choice>, PollError> {
        Ok(db::get_choice(&self.pool, choice_id).await?)
    }

    async fn choices(&self, question_id: Uuid) -> Result<Vec<Choice>, PollError> {
        Ok(db::get_choices(&self.pool, question_id).await?)
    }

    async fn record_vote(&self, question_id: Uuid, choice_id: Uuid) -> Result<bool, PollError> {
        Ok(db::increment_votes(&self.pool, question_id, choice_id).await?)
    }
}
