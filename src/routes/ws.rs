//! WebSocket upgrade + message loop. A connection is one game session: it owns
//! its `SessionState` for its whole lifetime and handles messages in order.
//! Each client message gets exactly one JSON reply.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::logic::{perform, Action};
use crate::openai::InterviewModel;
use crate::protocol::{ClientWsMessage, ServerWsMessage, SessionView};
use crate::session::SessionState;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "interview_game", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip_all)]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "interview_game", "WebSocket connected");
  let mut session = SessionState::new();

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "interview_game", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, state.model.as_ref(), &mut session).await
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        let out = serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
          serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
        });

        if let Err(e) = socket.send(Message::Text(out)).await {
          error!(target: "interview_game", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "interview_game", "WebSocket disconnected");
}

async fn handle_client_ws(msg: ClientWsMessage, model: &dyn InterviewModel, session: &mut SessionState) -> ServerWsMessage {
  let action = match msg {
    ClientWsMessage::Ping => return ServerWsMessage::Pong,
    ClientWsMessage::GetState => None,
    ClientWsMessage::GenerateQuestion { topic, difficulty } => Some(Action::GenerateQuestion { topic, difficulty }),
    ClientWsMessage::UpdateAnswer { answer } => Some(Action::UpdateAnswer { answer }),
    ClientWsMessage::Evaluate { answer } => Some(Action::Evaluate { answer }),
    ClientWsMessage::Previous => Some(Action::Previous),
    ClientWsMessage::Next => Some(Action::Next),
    ClientWsMessage::Reset => Some(Action::Reset),
  };

  let notices = match action {
    Some(action) => perform(model, session, action).await,
    None => vec![],
  };
  ServerWsMessage::State { view: SessionView::of(session), notices }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Difficulty, Topic};
  use crate::logic::tests::StubModel;
  use crate::protocol::Notice;

  #[tokio::test]
  async fn ws_dispatch_drives_one_session() {
    let model = StubModel::new("What is a closure?", "Solid: 8/10: give an example.");
    let mut session = SessionState::new();

    assert!(matches!(handle_client_ws(ClientWsMessage::Ping, &model, &mut session).await, ServerWsMessage::Pong));

    handle_client_ws(
      ClientWsMessage::GenerateQuestion { topic: Topic::Python, difficulty: Difficulty::Medium },
      &model,
      &mut session,
    )
    .await;
    let reply = handle_client_ws(
      ClientWsMessage::Evaluate { answer: Some("A function capturing its environment.".into()) },
      &model,
      &mut session,
    )
    .await;

    match reply {
      ServerWsMessage::State { view, notices } => {
        assert!(notices.is_empty());
        assert_eq!(view.experience_points, 20);
        assert_eq!(view.feedback.unwrap().text, "Solid: 8/10: give an example.");
      }
      other => panic!("unexpected reply: {:?}", other),
    }

    match handle_client_ws(ClientWsMessage::Reset, &model, &mut session).await {
      ServerWsMessage::State { view, notices } => {
        assert_eq!(notices, vec![Notice::Reset]);
        assert_eq!(view.experience_points, 0);
        assert!(view.question.is_none());
      }
      other => panic!("unexpected reply: {:?}", other),
    }
  }
}
