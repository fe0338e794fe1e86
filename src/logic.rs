//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Every action receives the session's state explicitly and runs to completion
//! before the next one. Model failures are contained here: they become
//! `ModelText::Failed` slot values and never reach progression.

use tracing::{error, info, instrument, warn};

use crate::domain::{Difficulty, ModelText, Topic};
use crate::error::ActionError;
use crate::openai::InterviewModel;
use crate::protocol::Notice;
use crate::session::SessionState;

/// A user action against one session.
#[derive(Clone, Debug)]
pub enum Action {
  GenerateQuestion { topic: Topic, difficulty: Difficulty },
  UpdateAnswer { answer: String },
  /// Optionally stores `answer` first, like submitting the form.
  Evaluate { answer: Option<String> },
  Previous,
  Next,
  Reset,
}

/// Run `action` and return the notices to show. Validation failures become
/// `Notice::Warning`; nothing is dropped silently.
pub async fn perform(model: &dyn InterviewModel, state: &mut SessionState, action: Action) -> Vec<Notice> {
  let result = match action {
    Action::GenerateQuestion { topic, difficulty } => {
      generate_question(model, state, topic, difficulty).await
    }
    Action::UpdateAnswer { answer } => update_answer(state, answer),
    Action::Evaluate { answer } => evaluate(model, state, answer).await,
    Action::Previous => {
      state.previous();
      Ok(vec![])
    }
    Action::Next => {
      state.next();
      Ok(vec![])
    }
    Action::Reset => {
      state.reset();
      info!(target: "game", "Session reset");
      Ok(vec![Notice::Reset])
    }
  };

  result.unwrap_or_else(|e| {
    warn!(target: "game", error = %e, "Action rejected");
    vec![Notice::Warning { message: e.to_string() }]
  })
}

/// Ask the model for a question and store it in the current slot, overwriting
/// any previous one. A failure is stored as a placeholder rather than leaving
/// the slot empty.
#[instrument(level = "info", skip(model, state), fields(index = state.current_index()))]
pub async fn generate_question(
  model: &dyn InterviewModel,
  state: &mut SessionState,
  topic: Topic,
  difficulty: Difficulty,
) -> Result<Vec<Notice>, ActionError> {
  let index = state.current_index();
  let text = match model.generate_question(topic, difficulty).await {
    Ok(text) => {
      info!(target: "game", index, question_len = text.len(), "Question generated");
      ModelText::Ok { text }
    }
    Err(e) => {
      error!(target: "game", index, error = %e, "Question generation failed");
      ModelText::Failed { detail: e.to_string() }
    }
  };
  state.set_question(index, text)?;
  Ok(vec![])
}

pub fn update_answer(state: &mut SessionState, answer: String) -> Result<Vec<Notice>, ActionError> {
  state.set_answer(state.current_index(), answer)?;
  Ok(vec![])
}

/// Evaluate the current slot's answer. Progression runs exactly once, and only
/// when the model returned an evaluation.
#[instrument(level = "info", skip(model, state, answer), fields(index = state.current_index()))]
pub async fn evaluate(
  model: &dyn InterviewModel,
  state: &mut SessionState,
  answer: Option<String>,
) -> Result<Vec<Notice>, ActionError> {
  let index = state.current_index();
  if let Some(answer) = answer {
    state.set_answer(index, answer)?;
  }

  let slot = state.slot(index)?;
  if slot.answer.trim().is_empty() {
    return Err(ActionError::EmptyAnswer);
  }
  let question = match &slot.question {
    Some(ModelText::Ok { text }) => text.clone(),
    _ => return Err(ActionError::NoQuestion),
  };
  let answer = slot.answer.clone();

  match model.evaluate_answer(&question, &answer).await {
    Ok(text) => {
      state.set_feedback(index, ModelText::Ok { text })?;
      let events = state.progress.award(index);
      info!(
        target: "game",
        index,
        level = state.progress.level,
        xp = state.progress.experience_points,
        badges = state.progress.badge_count,
        "Answer evaluated"
      );
      Ok(events.into_iter().map(Notice::from).collect())
    }
    Err(e) => {
      error!(target: "game", index, error = %e, "Answer evaluation failed");
      state.set_feedback(index, ModelText::Failed { detail: e.to_string() })?;
      Ok(vec![])
    }
  }
}
