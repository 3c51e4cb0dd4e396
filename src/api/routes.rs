use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State},
    response::{Html, IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use chrono::Utc;

use crate::api::models::{SummarizeRequest, SummarizeResponse};
use crate::api::response;
use crate::pipeline::Session;
use crate::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/summarize", post(summarize_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn summarize_handler(
    State(state): State<AppState>,
    Json(req): Json<SummarizeRequest>,
) -> Response {
    let session = Session::new(req.api_key, req.url);
    tracing::info!(url = %session.url, "Processing summarize request");
    let start_time = std::time::Instant::now();

    let result = state.pipeline.run(&session).await;
    tracing::info!(elapsed = ?start_time.elapsed(), ok = result.is_ok(), "Request finished");

    match result {
        Ok(outcome) => response::success(SummarizeResponse {
            url: outcome.url,
            source: outcome.source,
            summary: outcome.summary,
            word_count: outcome.word_count,
            summarized_at: Utc::now(),
        })
        .into_response(),
        Err(err) => err.into_response(),
    }
}
