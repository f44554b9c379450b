use crate::db::connection::DbPool;
use crate::db::models::{Choice, Question};
use sqlx::Error;
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;

pub async fn create_question(
    pool: &DbPool,
    question_text: &str,
    pub_date: DateTime<Utc>,
) -> Result<Question, Error> {
    let question_id = Uuid::new_v4();

    let question = sqlx::query_as::<_, Question>(
        "INSERT INTO questions (id, question_text, pub_date) VALUES ($1, $2, $3) \
         RETURNING id, question_text, pub_date",
    )
    .bind(question_id)
    .bind(question_text)
    .bind(pub_date)
    .fetch_one(pool)
    .await?;

    Ok(question)
}

/// The question and every choice commit together or not at all.
pub async fn create_question_with_choices(
    pool: &DbPool,
    question_text: &str,
    pub_date: DateTime<Utc>,
    choice_texts: &[String],
) -> Result<(Question, Vec<Choice>), Error> {
    let mut tx = pool.begin().await?;

    let question = sqlx::query_as::<_, Question>(
        "INSERT INTO questions (id, question_text, pub_date) VALUES ($1, $2, $3) \
         RETURNING id, question_text, pub_date",
    )
    .bind(Uuid::new_v4())
    .bind(question_text)
    .bind(pub_date)
    .fetch_one(&mut *tx)
    .await?;

    let mut choices = Vec::with_capacity(choice_texts.len());
    for choice_text in choice_texts {
        let choice = sqlx::query_as::<_, Choice>(
            "INSERT INTO choices (id, question_id, choice_text, votes) VALUES ($1, $2, $3, 0) \
             RETURNING id, question_id, choice_text, votes",
        )
        .bind(Uuid::new_v4())
        .bind(question.id)
        .bind(choice_text)
        .fetch_one(&mut *tx)
        .await?;
        choices.push(choice);
    }

    tx.commit().await?;
    Ok((question, choices))
}

pub async fn get_question(pool: &DbPool, question_id: Uuid) -> Result<Option<Question>, Error> {
    let row = sqlx::query_as::<_, Question>(
        "SELECT id, question_text, pub_date FROM questions WHERE id = $1",
    )
    .bind(question_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Newest first; equal dates fall back to the text so the page is stable.
pub async fn get_latest_questions(pool: &DbPool, limit: i64) -> Result<Vec<Question>, Error> {
    let rows = sqlx::query_as::<_, Question>(
        "SELECT id, question_text, pub_date FROM questions \
         ORDER BY pub_date DESC, question_text ASC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Choices go with the question through `ON DELETE CASCADE`.
pub async fn delete_question(pool: &DbPool, question_id: Uuid) -> Result<bool, Error> {
    let result = sqlx::query("DELETE FROM questions WHERE id = $1")
        .bind(question_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}
