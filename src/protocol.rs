//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Difficulty, ModelTask, ModelText, SlotStatus, Topic, QUESTION_COUNT};
use crate::progression::ProgressEvent;
use crate::session::SessionState;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    GetState,
    GenerateQuestion {
        topic: Topic,
        #[serde(default)]
        difficulty: Difficulty,
    },
    UpdateAnswer {
        answer: String,
    },
    Evaluate {
        #[serde(default)]
        answer: Option<String>,
    },
    Previous,
    Next,
    Reset,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    State {
        view: SessionView,
        notices: Vec<Notice>,
    },
    Error {
        message: String,
    },
}

/// Something the UI should flash to the user alongside the new view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    LevelUp { level: u32, message: String },
    BadgeEarned { total: u32, message: String },
    Warning { message: String },
    /// Session state was cleared; drop any cached view.
    Reset,
}

impl From<ProgressEvent> for Notice {
    fn from(e: ProgressEvent) -> Self {
        let message = e.message();
        match e {
            ProgressEvent::LevelUp { level } => Notice::LevelUp { level, message },
            ProgressEvent::BadgeEarned { total } => Notice::BadgeEarned { total, message },
        }
    }
}

/// Model text as shown to the user; `ok = false` marks a failure placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextOut {
    pub ok: bool,
    pub text: String,
}

impl TextOut {
    fn from_model(t: &ModelText, task: ModelTask) -> Self {
        Self { ok: t.is_ok(), text: t.render(task) }
    }
}

/// Rendered view of the slot currently on screen plus the HUD.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionView {
    pub current_index: usize,
    /// 1-based, for "Question k".
    pub question_number: usize,
    pub question_count: usize,
    pub level: u32,
    pub experience_points: u32,
    pub xp_fraction: f32,
    pub badge_count: u32,
    pub status: SlotStatus,
    pub question: Option<TextOut>,
    pub answer: String,
    pub feedback: Option<TextOut>,
}

impl SessionView {
    pub fn of(state: &SessionState) -> Self {
        let slot = state.current_slot();
        Self {
            current_index: state.current_index(),
            question_number: state.current_index() + 1,
            question_count: QUESTION_COUNT,
            level: state.progress.level,
            experience_points: state.progress.experience_points,
            xp_fraction: state.progress.xp_fraction(),
            badge_count: state.progress.badge_count,
            status: slot.status(),
            question: slot.question.as_ref().map(|q| TextOut::from_model(q, ModelTask::Question)),
            answer: slot.answer.clone(),
            feedback: slot.feedback.as_ref().map(|f| TextOut::from_model(f, ModelTask::Evaluation)),
        }
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct QuestionIn {
    pub topic: Topic,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EvaluateIn {
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActionOut {
    #[serde(rename = "sessionId")]
    pub session_id: Uuid,
    pub view: SessionView,
    pub notices: Vec<Notice>,
}

#[derive(Serialize)]
pub struct OptionsOut {
    pub topics: Vec<&'static str>,
    pub difficulties: Vec<&'static str>,
    pub default_difficulty: &'static str,
    pub question_count: usize,
}

impl OptionsOut {
    pub fn current() -> Self {
        Self {
            topics: Topic::ALL.iter().map(|t| t.label()).collect(),
            difficulties: Difficulty::ALL.iter().map(|d| d.label()).collect(),
            default_difficulty: Difficulty::default().label(),
            question_count: QUESTION_COUNT,
        }
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub sessions: usize,
}
