use crate::db::models::{Choice, Question};
use crate::error::PollError;
use crate::routes;
use crate::startup::AppState;
use crate::templates::{self, DetailContext, IndexContext, ResultsContext};
use axum::{
    extract::{Extension, Form, Path, rejection::FormRejection},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;
use uuid::Uuid;

/// `choice` stays a raw string so a bad value comes back as the detail page with a
/// message rather than a bare form rejection.
#[derive(Debug, Deserialize)]
pub struct VoteForm {
    pub choice: Option<String>,
}

/// Ids come from the URL, so anything that is not a UUID simply names no question.
fn parse_question_id(raw: &str) -> Result<Uuid, PollError> {
    Uuid::parse_str(raw).map_err(|_| PollError::QuestionNotFound)
}

async fn load_question(app_state: &AppState, question_id: Uuid) -> Result<Question, PollError> {
    app_state
        .store
        .question(question_id)
        .await?
        .ok_or(PollError::QuestionNotFound)
}

async fn load_question_with_choices(
    app_state: &AppState,
    raw_id: &str,
) -> Result<(Question, Vec<Choice>), PollError> {
    let question = load_question(app_state, parse_question_id(raw_id)?).await?;
    let choices = app_state.store.choices(question.id).await?;
    Ok((question, choices))
}

pub async fn index_context(app_state: &AppState) -> Result<IndexContext, PollError> {
    let latest_question_list = app_state
        .store
        .latest_questions(app_state.index_limit)
        .await?;
    Ok(IndexContext {
        latest_question_list,
    })
}

/// Latest questions, newest first.
pub async fn index(
    Extension(app_state): Extension<AppState>,
) -> Result<impl IntoResponse, PollError> {
    let ctx = index_context(&app_state).await?;
    Ok(Html(templates::index(&ctx)))
}

pub async fn detail(
    Extension(app_state): Extension<AppState>,
    Path(question_id): Path<String>,
) -> Result<impl IntoResponse, PollError> {
    let (question, choices) = load_question_with_choices(&app_state, &question_id).await?;

    Ok(Html(templates::detail(&DetailContext {
        question: &question,
        choices: &choices,
        error_message: None,
    })))
}

pub async fn results(
    Extension(app_state): Extension<AppState>,
    Path(question_id): Path<String>,
) -> Result<impl IntoResponse, PollError> {
    let (question, choices) = load_question_with_choices(&app_state, &question_id).await?;

    Ok(Html(templates::results(&ResultsContext {
        question: &question,
        choices: &choices,
    })))
}

/// Count one vote and send the browser on to the results, so a reload of the
/// landing page never submits twice.
///
/// A body that does not decode as a vote form counts as no choice at all; the question
/// is looked up first so an unknown question is a 404 whatever the body holds.
pub async fn vote(
    Extension(app_state): Extension<AppState>,
    Path(question_id): Path<String>,
    form: Result<Form<VoteForm>, FormRejection>,
) -> Result<impl IntoResponse, PollError> {
    let question = load_question(&app_state, parse_question_id(&question_id)?).await?;

    let submitted = match form {
        Ok(Form(form)) => form.choice,
        Err(rejection) => {
            debug!("unreadable vote form on question {}: {}", question.id, rejection);
            None
        }
    };

    let choice_id = submitted
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok());

    let counted = match choice_id {
        Some(choice_id) => app_state.store.record_vote(question.id, choice_id).await?,
        None => false,
    };

    if !counted {
        warn!(
            "rejected vote on question {}: choice {:?}",
            question.id, submitted
        );
        let choices = app_state.store.choices(question.id).await?;
        return Err(PollError::InvalidSubmission { question, choices });
    }

    info!("vote recorded on question {}", question.id);
    Ok(Redirect::to(&routes::results_url(question.id)))
}
