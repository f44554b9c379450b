use crate::admin::{create_question, delete_question, show_question};
use crate::config::Config;
use crate::db;
use crate::polls::{detail, index, results, vote};
use crate::routes;
use crate::store::{MemoryPollStore, PgPollStore, PollStore};
use crate::templates;
use axum::{
    Router,
    extract::Extension,
    http::{
        Method, StatusCode,
        header::{ACCEPT, CONTENT_TYPE},
    },
    response::{Html, IntoResponse},
    routing::{get, post},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PollStore>,
    pub index_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn PollStore>, index_limit: usize) -> Self {
        AppState { store, index_limit }
    }

    /// PostgreSQL when `DATABASE_URL` is set, otherwise a store that lives as long
    /// as the process.
    pub async fn from_config(config: &Config) -> Result<Self, sqlx::Error> {
        let store: Arc<dyn PollStore> = match &config.database_url {
            Some(url) => {
                let pool = db::init_db(url, config.max_connections).await?;
                info!("{}", db::pool_stats(&pool));
                Arc::new(PgPollStore::new(pool))
            }
            None => {
                warn!("DATABASE_URL not set, votes are kept in memory only");
                Arc::new(MemoryPollStore::new())
            }
        };

        Ok(AppState::new(store, config.index_limit))
    }
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(routes::INDEX, get(index))
        .route(routes::DETAIL, get(detail))
        .route(routes::VOTE, post(vote))
        .route(routes::RESULTS, get(results))
        .route(routes::ADMIN_QUESTIONS, post(create_question))
        .route(
            routes::ADMIN_QUESTION,
            get(show_question).delete(delete_question),
        )
        .fallback(handler_404)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(app_state))
                .layer(
                    CorsLayer::new()
                        .allow_origin(AllowOrigin::mirror_request())
                        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                        .allow_headers([CONTENT_TYPE, ACCEPT]),
                ),
        )
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html(templates::error_page(StatusCode::NOT_FOUND, "nothing to see here")),
    )
}
