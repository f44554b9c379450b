use crate::db::models::{Choice, Question, TEXT_MAX_LENGTH};
use crate::error::AdminError;
use crate::routes;
use crate::startup::AppState;
use axum::{
    extract::{Extension, Json, Path},
    http::{StatusCode, header::LOCATION},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Request/Response DTOs
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub question_text: String,
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub choices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ChoiceResponse {
    pub id: Uuid,
    pub choice_text: String,
    pub votes: i32,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub question_text: String,
    pub pub_date: String,
    pub was_published_recently: bool,
    pub total_votes: i64,
    pub choices: Vec<ChoiceResponse>,
}

fn parse_question_id(raw: &str) -> Result<Uuid, AdminError> {
    Uuid::parse_str(raw).map_err(|_| AdminError::QuestionNotFound)
}

fn validate_text(field: &str, text: &str) -> Result<(), AdminError> {
    if text.trim().is_empty() {
        return Err(AdminError::InvalidRequest(format!(
            "{field} must not be empty"
        )));
    }
    if text.chars().count() > TEXT_MAX_LENGTH {
        return Err(AdminError::InvalidRequest(format!(
            "{field} must be at most {TEXT_MAX_LENGTH} characters"
        )));
    }
    Ok(())
}

fn build_response(question: Question, choices: Vec<Choice>) -> QuestionResponse {
    let total_votes = choices.iter().map(|c| i64::from(c.votes)).sum::<i64>();

    QuestionResponse {
        id: question.id,
        was_published_recently: question.was_published_recently(Utc::now()),
        pub_date: question.pub_date.to_rfc3339(),
        question_text: question.question_text,
        total_votes,
        choices: choices
            .into_iter()
            .map(|c| ChoiceResponse {
                id: c.id,
                choice_text: c.choice_text,
                votes: c.votes,
            })
            .collect(),
    }
}

/// Create a question along with its choices.
pub async fn create_question(
    Extension(app_state): Extension<AppState>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AdminError> {
    validate_text("question_text", &payload.question_text)?;
    for choice_text in &payload.choices {
        validate_text("choice text", choice_text)?;
    }

    let pub_date = payload.pub_date.unwrap_or_else(Utc::now);
    let (question, choices) = app_state
        .store
        .create_question_with_choices(&payload.question_text, pub_date, &payload.choices)
        .await?;

    info!(
        "created question {} with {} choices",
        question.id,
        choices.len()
    );

    let location = routes::admin_question_url(question.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(build_response(question, choices)),
    ))
}

pub async fn show_question(
    Extension(app_state): Extension<AppState>,
    Path(question_id): Path<String>,
) -> Result<impl IntoResponse, AdminError> {
    let question_id = parse_question_id(&question_id)?;
    let question = app_state
        .store
        .question(question_id)
        .await?
        .ok_or(AdminError::QuestionNotFound)?;
    let choices = app_state.store.choices(question_id).await?;

    Ok((StatusCode::OK, Json(build_response(question, choices))))
}

/// Delete a question; its choices go with it.
pub async fn delete_question(
    Extension(app_state): Extension<AppState>,
    Path(question_id): Path<String>,
) -> Result<impl IntoResponse, AdminError> {
    let question_id = parse_question_id(&question_id)?;

    if !app_state.store.delete_question(question_id).await? {
        return Err(AdminError::QuestionNotFound);
    }

    info!("deleted question {}", question_id);
    Ok(StatusCode::NO_CONTENT)
}
