//! Configuration: model connection settings from the environment and
//! prompt templates from an optional TOML file.
//!
//! See `GameConfig` and `Prompts` for the expected TOML schema.

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct GameConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

/// Prompts sent to the model. Templates accept `{topic}`, `{difficulty}`,
/// `{question}` and `{answer}` placeholders.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub question_system: String,
  pub question_user_template: String,
  pub evaluation_system: String,
  pub evaluation_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      question_system: "You are an interviewer.".into(),
      question_user_template: "Generate ONE concise interview question for this topic:\nTopic: {topic}\nDifficulty: {difficulty}\n\nDo NOT give explanations, only output the question.".into(),
      evaluation_system: "You are an expert interviewer evaluating a candidate's answer.".into(),
      evaluation_user_template: "Question: {question}\nAnswer: {answer}\n\nProvide:\n1) One-line evaluation (strengths/weaknesses)\n2) A score out of 10\n3) One short improvement tip".into(),
    }
  }
}

/// Connection settings for the OpenAI-compatible chat endpoint.
#[derive(Clone, Debug)]
pub struct ModelSettings {
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  pub timeout: Duration,
}

impl ModelSettings {
  /// Read settings from the process environment. The API key is mandatory.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|k| std::env::var(k).ok())
  }

  fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let api_key = get(API_KEY_VAR)
      .filter(|k| !k.trim().is_empty())
      .ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;
    let base_url = get("MODEL_BASE_URL")
      .unwrap_or_else(|| DEFAULT_BASE_URL.into())
      .trim_end_matches('/')
      .to_string();
    let model = get("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.into());
    let timeout = get("MODEL_TIMEOUT_SECS")
      .and_then(|s| s.parse::<u64>().ok())
      .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(Self { api_key, base_url, model, timeout: Duration::from_secs(timeout) })
  }
}

/// Attempt to load `GameConfig` from GAME_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_game_config_from_env() -> Option<GameConfig> {
  let path = std::env::var("GAME_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<GameConfig>(&s) {
      Ok(cfg) => {
        info!(target: "interview_game", %path, "Loaded game config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "interview_game", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "interview_game", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
