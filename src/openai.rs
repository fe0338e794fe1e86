//! Minimal OpenAI-compatible chat client and the model capabilities the game needs.
//!
//! We only call `chat/completions` for plain text. The default endpoint is
//! Gemini's OpenAI-compatible API, but any compatible server works.
//! Calls are instrumented and log model name, latency and token usage (not contents).
//!
//! NOTE: We never log the API key.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::{ModelSettings, Prompts};
use crate::domain::{Difficulty, Topic};
use crate::error::{ConfigError, ModelError};
use crate::util::fill_template;

/// The two capabilities consumed from the language model.
#[async_trait]
pub trait InterviewModel: Send + Sync {
  /// Exactly one interview question, whitespace-trimmed.
  async fn generate_question(&self, topic: Topic, difficulty: Difficulty) -> Result<String, ModelError>;

  /// Free-text evaluation: one-line verdict, score out of 10, one tip.
  async fn evaluate_answer(&self, question: &str, answer: &str) -> Result<String, ModelError>;
}

#[derive(Clone)]
pub struct OpenAI {
  client: reqwest::Client,
  api_key: String,
  pub base_url: String,
  pub model: String,
  prompts: Prompts,
}

impl OpenAI {
  pub fn new(settings: ModelSettings, prompts: Prompts) -> Result<Self, ConfigError> {
    let client = reqwest::Client::builder().timeout(settings.timeout).build()?;
    Ok(Self {
      client,
      api_key: settings.api_key,
      base_url: settings.base_url,
      model: settings.model,
      prompts,
    })
  }

  /// Plain-text chat completion.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_plain(&self, system: &str, user: &str, temperature: f32) -> Result<String, ModelError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
    };

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "interview-game/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_api_error(&body).unwrap_or(body);
      error!(elapsed = ?start.elapsed(), %status, "Model call failed");
      return Err(ModelError::Status { status: status.as_u16(), message });
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "Model usage");
    }
    info!(elapsed = ?start.elapsed(), "Model response received");

    let text = body.choices.into_iter().next()
      .and_then(|c| c.message.content)
      .unwrap_or_default().trim().to_string();
    if text.is_empty() {
      return Err(ModelError::EmptyResponse);
    }
    Ok(text)
  }
}

#[async_trait]
impl InterviewModel for OpenAI {
  #[instrument(level = "info", skip_all, fields(%topic, %difficulty))]
  async fn generate_question(&self, topic: Topic, difficulty: Difficulty) -> Result<String, ModelError> {
    let user = fill_template(
      &self.prompts.question_user_template,
      &[("topic", topic.label()), ("difficulty", difficulty.label())],
    );
    self.chat_plain(&self.prompts.question_system, &user, 0.9).await
  }

  #[instrument(level = "info", skip(self, question, answer), fields(question_len = question.len(), answer_len = answer.len()))]
  async fn evaluate_answer(&self, question: &str, answer: &str) -> Result<String, ModelError> {
    let user = fill_template(
      &self.prompts.evaluation_user_template,
      &[("question", question), ("answer", answer)],
    );
    self.chat_plain(&self.prompts.evaluation_system, &user, 0.2).await
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Pull the provider's message out of an error body. Gemini's compatible API
/// answers either with an object or with a one-element array of objects.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  if let Ok(w) = serde_json::from_str::<EWrap>(body) {
    return Some(w.error.message);
  }
  serde_json::from_str::<Vec<EWrap>>(body)
    .ok()
    .and_then(|v| v.into_iter().next())
    .map(|w| w.error.message)
}
