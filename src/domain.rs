//! Domain models: topics, difficulties, model-produced text and question slots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of question slots per session.
pub const QUESTION_COUNT: usize = 10;

/// Interview topic offered in the topic selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topic {
  #[serde(rename = "AI/ML")]
  AiMl,
  #[serde(rename = "Python")]
  Python,
  #[serde(rename = "System Design")]
  SystemDesign,
  #[serde(rename = "Data Structures")]
  DataStructures,
  #[serde(rename = "Web Dev")]
  WebDev,
  #[serde(rename = "Behavioral")]
  Behavioral,
}

impl Topic {
  pub const ALL: [Topic; 6] = [
    Topic::AiMl,
    Topic::Python,
    Topic::SystemDesign,
    Topic::DataStructures,
    Topic::WebDev,
    Topic::Behavioral,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Topic::AiMl => "AI/ML",
      Topic::Python => "Python",
      Topic::SystemDesign => "System Design",
      Topic::DataStructures => "Data Structures",
      Topic::WebDev => "Web Dev",
      Topic::Behavioral => "Behavioral",
    }
  }
}

impl fmt::Display for Topic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

  pub fn label(self) -> &'static str {
    match self {
      Difficulty::Easy => "Easy",
      Difficulty::Medium => "Medium",
      Difficulty::Hard => "Hard",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.label()) }
}

/// Text obtained from the model, or the reason it could not be obtained.
///
/// Failures are kept apart from content so the presentation layer decides how
/// to show them; `render` produces the classic bracketed placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelText {
  Ok { text: String },
  Failed { detail: String },
}

/// Which model capability produced a `ModelText`; selects the placeholder prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelTask {
  Question,
  Evaluation,
}

impl ModelText {
  pub fn is_ok(&self) -> bool { matches!(self, ModelText::Ok { .. }) }

  pub fn render(&self, task: ModelTask) -> String {
    match self {
      ModelText::Ok { text } => text.clone(),
      ModelText::Failed { detail } => match task {
        ModelTask::Question => format!("[Error generating question: {}]", detail),
        ModelTask::Evaluation => format!("[Error evaluating answer: {}]", detail),
      },
    }
  }
}

/// One question position: (question, answer, feedback).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
  pub question: Option<ModelText>,
  pub answer: String,
  pub feedback: Option<ModelText>,
}

/// Implicit per-slot state machine position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
  Empty,
  Generated,
  Answered,
  Evaluated,
}

impl Slot {
  /// A question the model actually produced; failure placeholders don't count.
  pub fn has_question(&self) -> bool {
    matches!(self.question, Some(ModelText::Ok { .. }))
  }

  pub fn status(&self) -> SlotStatus {
    if self.feedback.is_some() {
      SlotStatus::Evaluated
    } else if !self.has_question() {
      SlotStatus::Empty
    } else if self.answer.trim().is_empty() {
      SlotStatus::Generated
    } else {
      SlotStatus::Answered
    }
  }
}
