//! [`GeminiBackend`] — the `generateContent` REST API.

use std::{sync::Arc, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use solace_core::{record::Role, settings::SettingsSource};

use crate::{
  Error, Result,
  backend::{GenerateRequest, GenerativeBackend},
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// A Gemini client. The key, model and endpoint are read from settings on
/// every request; without a key every request fails with
/// [`Error::NotConfigured`] before touching the network.
#[derive(Clone)]
pub struct GeminiBackend {
  client:   Client,
  settings: Arc<dyn SettingsSource>,
}

impl GeminiBackend {
  pub fn new(settings: Arc<dyn SettingsSource>) -> Result<Self> {
    let client = Client::builder().timeout(CLIENT_TIMEOUT).build()?;
    Ok(Self { client, settings })
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
  contents:           Vec<Content<'a>>,
  system_instruction: SystemInstruction<'a>,
  generation_config:  GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
  role:  &'static str,
  parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
  parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
  text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  temperature:        f32,
  max_output_tokens:  u32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
  #[serde(default)]
  parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
  text: Option<String>,
}

impl GenerateContentResponse {
  /// The first candidate's first text part.
  fn into_text(self) -> Option<String> {
    self
      .candidates
      .into_iter()
      .next()?
      .content?
      .parts
      .into_iter()
      .next()?
      .text
  }
}

fn wire_role(role: Role) -> &'static str {
  match role {
    Role::User => "user",
    Role::Assistant => "model",
  }
}

// ─── GenerativeBackend impl ──────────────────────────────────────────────────

impl GenerativeBackend for GeminiBackend {
  async fn generate(&self, request: GenerateRequest) -> Result<String> {
    let oracle = self.settings.load()?.oracle;
    let key = oracle.api_key().ok_or(Error::NotConfigured)?.trim().to_owned();
    let model = oracle.model.as_deref().unwrap_or(DEFAULT_MODEL);
    let base = oracle.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    let url = format!("{}/models/{model}:generateContent", base.trim_end_matches('/'));

    let body = GenerateContentRequest {
      contents:           request
        .turns
        .iter()
        .map(|turn| Content { role: wire_role(turn.role), parts: [Part { text: &turn.text }] })
        .collect(),
      system_instruction: SystemInstruction { parts: [Part { text: &request.system }] },
      generation_config:  GenerationConfig {
        temperature:        request.temperature,
        max_output_tokens:  request.max_output_tokens,
        response_mime_type: request.json.then_some("application/json"),
      },
    };

    let resp = self
      .client
      .post(url)
      .query(&[("key", key.as_str())])
      .json(&body)
      .send()
      .await?;
    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Status { status, body });
    }

    let parsed: GenerateContentResponse = resp.json().await?;
    let text = parsed
      .into_text()
      .filter(|t| !t.trim().is_empty())
      .ok_or(Error::EmptyResponse)?;
    debug!(model, chars = text.len(), "oracle answered");
    Ok(text)
  }
}
