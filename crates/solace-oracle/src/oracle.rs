//! [`Oracle`] — chat completion and sentiment scoring with silent fallback.

use std::{sync::Arc, time::Duration};

use serde::Deserialize;
use tracing::{debug, warn};

use solace_core::{
  record::{Message, UserProfile},
  sentiment::{Sentiment, SentimentAnalysis},
  settings::SettingsSource,
};

use crate::{
  Error, Result,
  backend::{GenerateRequest, GenerativeBackend, Turn},
  fallback::{canned_response, lexical_sentiment},
  gemini::GeminiBackend,
};

/// Upper bound on any single model call.
pub const ORACLE_TIMEOUT: Duration = Duration::from_secs(8);

/// Standing instruction for every chat completion.
pub const CHAT_INSTRUCTION: &str = "You are a warm, empathetic mental wellness \
  companion. Listen carefully, reflect the user's feelings back to them, and offer \
  gentle, practical coping suggestions drawn from evidence-based approaches such as \
  CBT and mindfulness. Keep replies short and conversational. You are not a \
  therapist and never diagnose; if the user mentions self-harm or being in danger, \
  encourage them to contact local emergency services or a crisis line right away.";

const SENTIMENT_INSTRUCTION: &str = "You analyse the emotional tone of private \
  journal entries. Respond with a single JSON object and nothing else, shaped as \
  {\"score\": number between -1 and 1, \"label\": one of \"Very Negative\", \
  \"Negative\", \"Neutral\", \"Positive\", \"Very Positive\", \"insights\": array of \
  2 or 3 short, supportive observations}.";

const MAX_INSIGHTS: usize = 3;

// ─── Oracle ──────────────────────────────────────────────────────────────────

/// Chat and sentiment over a [`GenerativeBackend`], falling back to local
/// rules on any failure.
pub struct Oracle<B = GeminiBackend> {
  backend: B,
}

impl Oracle<GeminiBackend> {
  pub fn gemini(settings: Arc<dyn SettingsSource>) -> Result<Self> {
    Ok(Self::new(GeminiBackend::new(settings)?))
  }
}

impl<B: GenerativeBackend> Oracle<B> {
  pub fn new(backend: B) -> Self { Self { backend } }

  async fn generate(&self, op: &'static str, request: GenerateRequest) -> Option<String> {
    match tokio::time::timeout(ORACLE_TIMEOUT, self.backend.generate(request)).await {
      Ok(Ok(text)) => Some(text),
      Ok(Err(Error::NotConfigured)) => {
        debug!(op, "oracle not configured; answering locally");
        None
      }
      Ok(Err(e)) => {
        warn!(op, error = %e, "oracle call failed; answering locally");
        None
      }
      Err(_) => {
        warn!(op, timeout_secs = ORACLE_TIMEOUT.as_secs(), "oracle call timed out; answering locally");
        None
      }
    }
  }

  /// A reply to `message`, given the earlier turns of the conversation.
  pub async fn complete_chat(
    &self,
    message: &str,
    history: &[Message],
    profile: Option<&UserProfile>,
  ) -> String {
    let mut system = CHAT_INSTRUCTION.to_owned();
    if let Some(summary) = profile.map(UserProfile::context_summary).filter(|s| !s.is_empty()) {
      system.push_str("\n\nWhat you know about this user:\n");
      system.push_str(&summary);
    }

    let mut turns: Vec<Turn> = history
      .iter()
      .map(|m| Turn { role: m.role, text: m.content.clone() })
      .collect();
    turns.push(Turn::user(message));

    let request = GenerateRequest {
      system,
      turns,
      temperature: 0.7,
      max_output_tokens: 500,
      json: false,
    };
    match self.generate("chat", request).await {
      Some(text) => text.trim().to_owned(),
      None => canned_response(message).to_owned(),
    }
  }

  /// Score the emotional tone of `text`.
  pub async fn score_sentiment(&self, text: &str) -> SentimentAnalysis {
    let request = GenerateRequest {
      system:            SENTIMENT_INSTRUCTION.to_owned(),
      turns:             vec![Turn::user(text)],
      temperature:       0.2,
      max_output_tokens: 300,
      json:              true,
    };
    let Some(raw) = self.generate("sentiment", request).await else {
      return lexical_sentiment(text);
    };
    parse_sentiment(&raw).unwrap_or_else(|e| {
      warn!(error = %e, "oracle sentiment unusable; scoring locally");
      lexical_sentiment(text)
    })
  }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawSentiment {
  score:    f64,
  #[serde(default)]
  insights: Vec<String>,
}

/// Parse a model's sentiment answer, tolerating a surrounding markdown code
/// fence. The score is clamped and re-banded, so any label the model gave is
/// discarded.
pub fn parse_sentiment(raw: &str) -> Result<SentimentAnalysis> {
  let parsed: RawSentiment = serde_json::from_str(strip_fences(raw))?;
  if !parsed.score.is_finite() {
    return Err(Error::Malformed(format!("score {}", parsed.score)));
  }
  let insights: Vec<String> = parsed
    .insights
    .into_iter()
    .map(|s| s.trim().to_owned())
    .filter(|s| !s.is_empty())
    .take(MAX_INSIGHTS)
    .collect();
  if insights.is_empty() {
    return Err(Error::Malformed("no insights".to_owned()));
  }
  Ok(SentimentAnalysis { sentiment: Sentiment::from_score(parsed.score), insights })
}

fn strip_fences(raw: &str) -> &str {
  let trimmed = raw.trim();
  let Some(rest) = trimmed.strip_prefix("```") else {
    return trimmed;
  };
  // Drop an info string such as `json` on the opening fence line.
  let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
  body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
