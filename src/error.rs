use crate::db::models::{Choice, Question};
use crate::templates::{self, DetailContext};
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures of the HTML pages.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("Question not found")]
    QuestionNotFound,
    /// The detail page is shown again with the message, nothing is written.
    #[error("You didn't select a choice.")]
    InvalidSubmission {
        question: Question,
        choices: Vec<Choice>,
    },
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Failures of the JSON administration API.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Question not found")]
    QuestionNotFound,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl IntoResponse for PollError {
    fn into_response(self) -> Response {
        match self {
            PollError::QuestionNotFound => (
                StatusCode::NOT_FOUND,
                Html(templates::error_page(StatusCode::NOT_FOUND, "No Question matches the given query.")),
            )
                .into_response(),
            PollError::InvalidSubmission { question, choices } => {
                let page = templates::detail(&DetailContext {
                    question: &question,
                    choices: &choices,
                    error_message: Some("You didn't select a choice."),
                });
                (StatusCode::BAD_REQUEST, Html(page)).into_response()
            }
            PollError::DatabaseError(msg) => {
                error!("database failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(templates::error_page(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Something went wrong on our side.",
                    )),
                )
                    .into_response()
            }
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AdminError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
            AdminError::QuestionNotFound => (StatusCode::NOT_FOUND, "Question not found"),
            AdminError::DatabaseError(msg) => {
                error!("database failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "details": self.to_string()
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for PollError {
    fn from(error: sqlx::Error) -> Self {
        PollError::DatabaseError(error.to_string())
    }
}

impl From<PollError> for AdminError {
    fn from(error: PollError) -> Self {
        match error {
            PollError::QuestionNotFound => AdminError::QuestionNotFound,
            PollError::InvalidSubmission { .. } => {
                AdminError::InvalidRequest("no such choice".to_string())
            }
            PollError::DatabaseError(msg) => AdminError::DatabaseError(msg),
        }
    }
}
