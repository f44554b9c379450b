use super::PollStore;
use crate::db::models::{Choice, Question};
use crate::error::PollError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default, Debug)]
struct Tables {
    questions: HashMap<Uuid, Question>,
    choices: HashMap<Uuid, Choice>,
}

/// Every operation runs under one lock, so a vote is a single step just like the
/// `UPDATE ... SET votes = votes + 1` of the PostgreSQL store.
#[derive(Clone, Default, Debug)]
pub struct MemoryPollStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryPollStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_choices<'a>(choices: impl Iterator<Item = &'a Choice>) -> Vec<Choice> {
    let mut choices: Vec<Choice> = choices.cloned().collect();
    choices.sort_by(|a, b| a.choice_text.cmp(&b.choice_text).then(a.id.cmp(&b.id)));
    choices
}

#[async_trait]
impl PollStore for MemoryPollStore {
    async fn create_question(
        &self,
        question_text: &str,
        pub_date: DateTime<Utc>,
    ) -> Result<Question, PollError> {
        let question = Question {
            id: Uuid::new_v4(),
            question_text: question_text.to_string(),
            pub_date,
        };

        let mut tables = self.tables.lock().await;
        tables.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn create_question_with_choices(
        &self,
        question_text: &str,
        pub_date: DateTime<Utc>,
        choice_texts: &[String],
    ) -> Result<(Question, Vec<Choice>), PollError> {
        let question = Question {
            id: Uuid::new_v4(),
            question_text: question_text.to_string(),
            pub_date,
        };
        let choices: Vec<Choice> = choice_texts
            .iter()
            .map(|text| Choice {
                id: Uuid::new_v4(),
                question_id: question.id,
                choice_text: text.clone(),
                votes: 0,
            })
            .collect();

        let mut tables = self.tables.lock().await;
        tables.questions.insert(question.id, question.clone());
        for choice in &choices {
            tables.choices.insert(choice.id, choice.clone());
        }
        Ok((question, choices))
    }

    async fn question(&self, question_id: Uuid) -> Result<Option<Question>, PollError> {
        let tables = self.tables.lock().await;
        Ok(tables.questions.get(&question_id).cloned())
    }

    async fn latest_questions(&self, limit: usize) -> Result<Vec<Question>, PollError> {
        let tables = self.tables.lock().await;
        let mut questions: Vec<Question> = tables.questions.values().cloned().collect();
        drop(tables);

        questions.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then_with(|| a.question_text.cmp(&b.question_text))
        });
        questions.truncate(limit);
        Ok(questions)
    }

    async fn delete_question(&self, question_id: Uuid) -> Result<bool, PollError> {
        let mut tables = self.tables.lock().await;
        if tables.questions.remove(&question_id).is_none() {
            return Ok(false);
        }
        tables
            .choices
            .retain(|_, choice| choice.question_id != question_id);
        Ok(true)
    }

    async fn create_choice(
        &self,
        question_id: Uuid,
        choice_text: &str,
    ) -> Result<Choice, PollError> {
        let mut tables = self.tables.lock().await;
        if !tables.questions.contains_key(&question_id) {
            return Err(PollError::QuestionNotFound);
        }

        let choice = Choice {
            id: Uuid::new_v4(),
            question_id,
            choice_text: choice_text.to_string(),
            votes: 0,
        };
        tables.choices.insert(choice.id, choice.clone());
        Ok(choice)
    }

    async fn choice(&self, choice_id: Uuid) -> Result<Option<Choice>, PollError> {
        let tables = self.tables.lock().await;
        Ok(tables.choices.get(&choice_id).cloned())
    }

    async fn choices(&self, question_id: Uuid) -> Result<Vec<Choice>, PollError> {
        let tables = self.tables.lock().await;
        Ok(sorted_choices(
            tables
                .choices
                .values()
                .filter(|choice| choice.question_id == question_id),
        ))
    }

    async fn record_vote(&self, question_id: Uuid, choice_id: Uuid) -> Result<bool, PollError> {
        let mut tables = self.tables.lock().await;
        match tables.choices.get_mut(&choice_id) {
            Some(choice) if choice.question_id == question_id => {
                choice.votes += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
