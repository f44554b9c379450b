use crate::db::connection::DbPool;
use crate::db::models::Choice;
use sqlx::Error;
use uuid::Uuid;

/// Returns `None` when the question does not exist, so no orphan row is ever written.
pub async fn add_choice(
    pool: &DbPool,
    question_id: Uuid,
    choice_text: &str,
) -> Result<Option<Choice>, Error> {
    let choice_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, Choice>(
        r#"
        INSERT INTO choices (id, question_id, choice_text, votes)
        SELECT $1, q.id, $3, 0 FROM questions q WHERE q.id = $2
        RETURNING id, question_id, choice_text, votes
        "#,
    )
    .bind(choice_id)
    .bind(question_id)
    .bind(choice_text)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_choice(pool: &DbPool, choice_id: Uuid) -> Result<Option<Choice>, Error> {
    let row = sqlx::query_as::<_, Choice>(
        "SELECT id, question_id, choice_text, votes FROM choices WHERE id = $1",
    )
    .bind(choice_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_choices(pool: &DbPool, question_id: Uuid) -> Result<Vec<Choice>, Error> {
    let rows = sqlx::query_as::<_, Choice>(
        "SELECT id, question_id, choice_text, votes FROM choices \
         WHERE question_id = $1 ORDER BY choice_text, id",
    )
    .bind(question_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Single-statement increment. The `question_id` guard rejects choices from other
/// questions; the returned flag is false when nothing matched.
pub async fn increment_votes(
    pool: &DbPool,
    question_id: Uuid,
    choice_id: Uuid,
) -> Result<bool, Error> {
    let result =
        sqlx::query("UPDATE choices SET votes = votes + 1 WHERE id = $1 AND question_id = $2")
            .bind(choice_id)
            .bind(question_id)
            .execute(pool)
            .await?;

    Ok(result.rows_affected() == 1)
}
