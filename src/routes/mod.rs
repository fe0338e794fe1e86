//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws` (one game session per connection)
/// - REST-ish API under `/api/v1/...` (session chosen by `x-session-id`)
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/ws", get(ws::ws_upgrade))
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/options", get(http::http_options))
        .route("/api/v1/session", get(http::http_get_session))
        .route("/api/v1/session/question", post(http::http_post_question))
        .route("/api/v1/session/answer", put(http::http_put_answer))
        .route("/api/v1/session/evaluate", post(http::http_post_evaluate))
        .route("/api/v1/session/previous", post(http::http_post_previous))
        .route("/api/v1/session/next", post(http::http_post_next))
        .route("/api/v1/session/reset", post(http::http_post_reset))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::logic::tests::StubModel;

    fn app() -> Router {
        let model = StubModel::new("What is a list comprehension?", "Good: 7/10: mention performance.");
        build_router(Arc::new(AppState::new(Arc::new(model))))
    }

    async fn call(app: &Router, method: &str, uri: &str, session: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(id) = session {
            req = req.header(http::SESSION_HEADER, id);
        }
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => req.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn health_and_options() {
        let app = app();
        let (status, body) = call(&app, "GET", "/api/v1/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);

        let (_, body) = call(&app, "GET", "/api/v1/options", None, None).await;
        assert_eq!(body["default_difficulty"], "Medium");
        assert_eq!(body["topics"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn full_round_over_http_keeps_session() {
        let app = app();
        let (_, body) = call(&app, "GET", "/api/v1/session", None, None).await;
        let id = body["sessionId"].as_str().unwrap().to_string();
        assert_eq!(body["view"]["level"], 1);

        let (_, body) = call(
            &app,
            "POST",
            "/api/v1/session/question",
            Some(id.as_str()),
            Some(json!({ "topic": "Python", "difficulty": "Easy" })),
        )
        .await;
        assert_eq!(body["sessionId"], id.as_str());
        assert_eq!(body["view"]["question"]["text"], "What is a list comprehension?");
        assert_eq!(body["view"]["question"]["ok"], true);

        let (_, body) = call(
            &app,
            "POST",
            "/api/v1/session/evaluate",
            Some(id.as_str()),
            Some(json!({ "answer": "A list comp is a concise way to build lists." })),
        )
        .await;
        assert_eq!(body["view"]["feedback"]["text"], "Good: 7/10: mention performance.");
        assert_eq!(body["view"]["experience_points"], 20);
        assert_eq!(body["view"]["badge_count"], 0);
        assert_eq!(body["view"]["status"], "evaluated");

        let (_, body) = call(&app, "POST", "/api/v1/session/next", Some(id.as_str()), None).await;
        assert_eq!(body["view"]["question_number"], 2);
        assert!(body["view"]["question"].is_null());

        let (_, body) = call(&app, "POST", "/api/v1/session/previous", Some(id.as_str()), None).await;
        assert_eq!(body["view"]["answer"], "A list comp is a concise way to build lists.");
    }

    #[tokio::test]
    async fn empty_answer_yields_warning_notice() {
        let app = app();
        let (_, body) = call(&app, "GET", "/api/v1/session", None, None).await;
        let id = body["sessionId"].as_str().unwrap().to_string();
        call(&app, "POST", "/api/v1/session/question", Some(id.as_str()), Some(json!({ "topic": "Web Dev" }))).await;

        let (status, body) = call(&app, "POST", "/api/v1/session/evaluate", Some(id.as_str()), Some(json!({ "answer": "  " }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notices"][0]["kind"], "warning");
        assert_eq!(body["notices"][0]["message"], "Please enter an answer!");
        assert_eq!(body["view"]["experience_points"], 0);
    }

    #[tokio::test]
    async fn reset_clears_state_and_signals_rerender() {
        let app = app();
        let (_, body) = call(&app, "GET", "/api/v1/session", None, None).await;
        let id = body["sessionId"].as_str().unwrap().to_string();
        call(&app, "POST", "/api/v1/session/question", Some(id.as_str()), Some(json!({ "topic": "AI/ML" }))).await;
        call(&app, "PUT", "/api/v1/session/answer", Some(id.as_str()), Some(json!({ "answer": "gradient descent" }))).await;
        call(&app, "POST", "/api/v1/session/next", Some(id.as_str()), None).await;

        let (_, body) = call(&app, "POST", "/api/v1/session/reset", Some(id.as_str()), None).await;
        assert_eq!(body["notices"][0]["kind"], "reset");
        assert_eq!(body["view"]["current_index"], 0);
        assert!(body["view"]["question"].is_null());
        assert_eq!(body["view"]["answer"], "");
    }

    #[tokio::test]
    async fn saved_answer_survives_regenerating_the_question() {
        let app = app();
        let (_, body) = call(&app, "GET", "/api/v1/session", None, None).await;
        let id = body["sessionId"].as_str().unwrap().to_string();
        call(&app, "PUT", "/api/v1/session/answer", Some(id.as_str()), Some(json!({ "answer": "draft" }))).await;

        let (_, body) = call(&app, "POST", "/api/v1/session/question", Some(id.as_str()), Some(json!({ "topic": "Python" }))).await;
        assert_eq!(body["view"]["answer"], "draft");
        assert_eq!(body["view"]["status"], "answered");
    }

    #[tokio::test]
    async fn unknown_topic_is_rejected() {
        let app = app();
        let (status, _) = call(&app, "POST", "/api/v1/session/question", None, Some(json!({ "topic": "Cooking" }))).await;
        assert!(status.is_client_error());
    }
}
