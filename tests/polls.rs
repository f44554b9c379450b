use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::{Duration, Utc};
use polls_backend::db::models::{Choice, Question};
use polls_backend::polls::index_context;
use polls_backend::routes;
use polls_backend::store::{MemoryPollStore, PollStore};
use polls_backend::{AppState, build_router};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    state: AppState,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let store: Arc<dyn PollStore> = Arc::new(MemoryPollStore::new());
        let state = AppState::new(store, 5);
        let router = build_router(state.clone());
        TestApp { state, router }
    }

    fn store(&self) -> &dyn PollStore {
        self.state.store.as_ref()
    }

    async fn question(&self, text: &str) -> Question {
        self.store().create_question(text, Utc::now()).await.unwrap()
    }

    async fn choice(&self, question: &Question, text: &str) -> Choice {
        self.store().create_choice(question.id, text).await.unwrap()
    }

    async fn votes(&self, choice: &Choice) -> i32 {
        self.store().choice(choice.id).await.unwrap().unwrap().votes
    }

    async fn get(&self, uri: &str) -> Response {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post_raw(&self, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn post_form(&self, uri: &str, form: &str) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn question_has_choices() {
    let app = TestApp::new();
    let question = app.question("Sample Question").await;
    app.choice(&question, "Choice 1").await;
    app.choice(&question, "Choice 2").await;

    let choices = app.store().choices(question.id).await.unwrap();
    assert_eq!(choices.len(), 2);
    assert!(choices.iter().all(|c| c.question_id == question.id));
}

#[tokio::test]
async fn index_without_questions_says_so() {
    let app = TestApp::new();

    let response = app.get(&routes::index_url()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No polls are available."));

    let ctx = index_context(&app.state).await.unwrap();
    assert!(ctx.latest_question_list.is_empty());
}

#[tokio::test]
async fn index_lists_existing_question() {
    let app = TestApp::new();
    let question = app.question("Sample Question").await;

    let ctx = index_context(&app.state).await.unwrap();
    assert_eq!(ctx.latest_question_list, vec![question.clone()]);

    let body = body_text(app.get(&routes::index_url()).await).await;
    assert!(body.contains("Sample Question"));
    assert!(body.contains(&routes::detail_url(question.id)));
}

#[tokio::test]
async fn index_orders_newest_first_and_caps_the_list() {
    let app = TestApp::new();
    let now = Utc::now();
    for days in (0..6).rev() {
        app.store()
            .create_question(&format!("Question {days}"), now - Duration::days(days))
            .await
            .unwrap();
    }

    let ctx = index_context(&app.state).await.unwrap();
    let texts: Vec<_> = ctx
        .latest_question_list
        .iter()
        .map(|q| q.question_text.as_str())
        .collect();
    assert_eq!(
        texts,
        ["Question 0", "Question 1", "Question 2", "Question 3", "Question 4"]
    );
}

#[tokio::test]
async fn detail_shows_question_text() {
    let app = TestApp::new();
    let question = app.question("Sample Question").await;
    app.choice(&question, "Choice 1").await;

    let response = app.get(&routes::detail_url(question.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(&question.question_text));
    assert!(body.contains("Choice 1"));
}

#[tokio::test]
async fn detail_for_unknown_question_is_not_found() {
    let app = TestApp::new();

    let response = app.get(&routes::detail_url(Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/polls/not-a-question/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn vote_valid_choice_counts_and_redirects_to_results() {
    let app = TestApp::new();
    let question = app.question("Sample Question").await;
    let choice1 = app.choice(&question, "Choice 1").await;
    let choice2 = app.choice(&question, "Choice 2").await;

    let response = app
        .post_form(&routes::vote_url(question.id), &format!("choice={}", choice1.id))
        .await;

    assert!(response.status().is_redirection());
    assert_eq!(location(&response), routes::results_url(question.id));
    assert_eq!(app.votes(&choice1).await, 1);
    assert_eq!(app.votes(&choice2).await, 0);
}

#[tokio::test]
async fn vote_without_choice_rerenders_detail_with_error() {
    let app = TestApp::new();
    let question = app.question("Sample Question").await;
    let choice1 = app.choice(&question, "Choice 1").await;
    let choice2 = app.choice(&question, "Choice 2").await;

    let response = app.post_form(&routes::vote_url(question.id), "").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("You didn&#x27;t select a choice."));
    assert!(body.contains("Sample Question"));
    assert_eq!(app.votes(&choice1).await, 0);
    assert_eq!(app.votes(&choice2).await, 0);
}

#[tokio::test]
async fn vote_with_garbage_choice_is_rejected() {
    let app = TestApp::new();
    let question = app.question("Sample Question").await;
    let choice = app.choice(&question, "Choice 1").await;

    let response = app
        .post_form(&routes::vote_url(question.id), "choice=banana")
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.votes(&choice).await, 0);
}

#[tokio::test]
async fn vote_for_another_questions_choice_is_rejected() {
    let app = TestApp::new();
    let question = app.question("Sample Question").await;
    let own = app.choice(&question, "Mine").await;
    let other = app.question("Other Question").await;
    let foreign = app.choice(&other, "Theirs").await;

    let response = app
        .post_form(&routes::vote_url(question.id), &format!("choice={}", foreign.id))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.votes(&own).await, 0);
    assert_eq!(app.votes(&foreign).await, 0);
}

#[tokio::test]
async fn vote_without_form_content_type_rerenders_detail() {
    let app = TestApp::new();
    let question = app.question("Sample Question").await;
    let choice = app.choice(&question, "Choice 1").await;

    let response = app
        .post_raw(&routes::vote_url(question.id), &format!("choice={}", choice.id))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("You didn&#x27;t select a choice."));
    assert!(body.contains("Sample Question"));
    assert_eq!(app.votes(&choice).await, 0);
}

#[tokio::test]
async fn vote_with_repeated_choice_field_is_rejected() {
    let app = TestApp::new();
    let question = app.question("Sample Question").await;
    let choice1 = app.choice(&question, "Choice 1").await;
    let choice2 = app.choice(&question, "Choice 2").await;

    let response = app
        .post_form(
            &routes::vote_url(question.id),
            &format!("choice={}&choice={}", choice1.id, choice2.id),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("You didn&#x27;t select a choice."));
    assert_eq!(app.votes(&choice1).await, 0);
    assert_eq!(app.votes(&choice2).await, 0);
}

#[tokio::test]
async fn vote_on_unknown_question_without_content_type_is_not_found() {
    let app = TestApp::new();

    let response = app
        .post_raw(&routes::vote_url(Uuid::new_v4()), "choice=anything")
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn vote_on_unknown_question_is_not_found() {
    let app = TestApp::new();

    let response = app
        .post_form(
            &routes::vote_url(Uuid::new_v4()),
            &format!("choice={}", Uuid::new_v4()),
        )
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn question_without_choices_cannot_be_voted_on() {
    let app = TestApp::new();
    let question = app.question("Empty").await;

    let response = app
        .post_form(&routes::vote_url(question.id), &format!("choice={}", Uuid::new_v4()))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn results_show_tallies_after_votes() {
    let app = TestApp::new();
    let question = app.question("Sample Question").await;
    let choice1 = app.choice(&question, "Choice 1").await;
    app.choice(&question, "Choice 2").await;

    for _ in 0..2 {
        let response = app
            .post_form(&routes::vote_url(question.id), &format!("choice={}", choice1.id))
            .await;
        assert!(response.status().is_redirection());
    }

    let response = app.get(&routes::results_url(question.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Choice 1 -- 2 votes"));
    assert!(body.contains("Choice 2 -- 0 votes"));
}

#[tokio::test]
async fn results_for_unknown_question_is_not_found() {
    let app = TestApp::new();
    let response = app.get(&routes::results_url(Uuid::new_v4())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concurrent_votes_through_the_router_are_not_lost() {
    let app = TestApp::new();
    let question = app.question("Busy").await;
    let choice = app.choice(&question, "Popular").await;
    let uri = routes::vote_url(question.id);
    let form = format!("choice={}", choice.id);

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let router = app.router.clone();
            let request = Request::builder()
                .method("POST")
                .uri(uri.as_str())
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.clone()))
                .unwrap();
            tokio::spawn(async move { router.oneshot(request).await.unwrap().status() })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_redirection());
    }
    assert_eq!(app.votes(&choice).await, 32);
}

#[tokio::test]
async fn unknown_path_falls_back_to_not_found() {
    let app = TestApp::new();
    let response = app.get("/nowhere").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
