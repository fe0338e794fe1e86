//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! The session is identified by the `x-session-id` header; unknown or missing
//! ids get a fresh session whose id is returned in the response body.

use std::sync::Arc;
use axum::{extract::State, http::HeaderMap, Json, response::IntoResponse};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::logic::{perform, Action};
use crate::protocol::*;
use crate::state::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

fn session_id(headers: &HeaderMap) -> Option<Uuid> {
  headers
    .get(SESSION_HEADER)
    .and_then(|v| v.to_str().ok())
    .and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// Run one action against the caller's session and render the result.
async fn run(state: &AppState, headers: &HeaderMap, action: Option<Action>) -> Json<ActionOut> {
  let (session_id, handle) = state.sessions.get_or_init(session_id(headers)).await;
  let mut session = handle.lock().await;
  let notices = match action {
    Some(action) => perform(state.model.as_ref(), &mut session, action).await,
    None => vec![],
  };
  let view = SessionView::of(&session);
  info!(target: "game", session = %session_id, index = view.current_index, notices = notices.len(), "Session view served");
  Json(ActionOut { session_id, view, notices })
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, sessions: state.sessions.len().await })
}

#[instrument(level = "info")]
pub async fn http_options() -> impl IntoResponse { Json(OptionsOut::current()) }

#[instrument(level = "info", skip_all)]
pub async fn http_get_session(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
  run(&state, &headers, None).await
}

#[instrument(level = "info", skip(state, headers), fields(topic = %body.topic, difficulty = %body.difficulty))]
pub async fn http_post_question(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Json(body): Json<QuestionIn>,
) -> impl IntoResponse {
  run(&state, &headers, Some(Action::GenerateQuestion { topic: body.topic, difficulty: body.difficulty })).await
}

#[instrument(level = "info", skip(state, headers, body), fields(answer_len = body.answer.len()))]
pub async fn http_put_answer(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Json(body): Json<AnswerIn>,
) -> impl IntoResponse {
  run(&state, &headers, Some(Action::UpdateAnswer { answer: body.answer })).await
}

#[instrument(level = "info", skip(state, headers, body), fields(has_answer = body.answer.is_some()))]
pub async fn http_post_evaluate(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
  Json(body): Json<EvaluateIn>,
) -> impl IntoResponse {
  run(&state, &headers, Some(Action::Evaluate { answer: body.answer })).await
}

#[instrument(level = "info", skip_all)]
pub async fn http_post_previous(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
  run(&state, &headers, Some(Action::Previous)).await
}

#[instrument(level = "info", skip_all)]
pub async fn http_post_next(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
  run(&state, &headers, Some(Action::Next)).await
}

#[instrument(level = "info", skip_all)]
pub async fn http_post_reset(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
  run(&state, &headers, Some(Action::Reset)).await
}
