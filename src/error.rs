//! Error types shared across the backend.

use thiserror::Error;

/// Startup configuration failures. These halt the server.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("API key not found. Please set {0} in your environment.")]
  MissingApiKey(&'static str),
  #[error("failed to build HTTP client: {0}")]
  HttpClient(#[from] reqwest::Error),
}

/// Failures of the external model service.
#[derive(Debug, Error)]
pub enum ModelError {
  #[error("{0}")]
  Transport(String),
  #[error("model HTTP {status}: {message}")]
  Status { status: u16, message: String },
  #[error("model returned an empty response")]
  EmptyResponse,
}

impl From<reqwest::Error> for ModelError {
  fn from(e: reqwest::Error) -> Self {
    ModelError::Transport(e.to_string())
  }
}

/// Bounds violations on the session store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
  #[error("slot {index} is out of range (0..{len})")]
  SlotOutOfRange { index: usize, len: usize },
}

/// User actions rejected before any model call. Rendered as warnings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionError {
  #[error("Please enter an answer!")]
  EmptyAnswer,
  #[error("Generate a question first!")]
  NoQuestion,
  #[error(transparent)]
  Session(#[from] SessionError),
}
