//! Sentiment scores and the five-point band they map onto.
//!
//! A [`Sentiment`] can only be built from a score; the label is always the
//! banding of that score, so the two never disagree.

use serde::{Deserialize, Serialize};

// ─── Label ───────────────────────────────────────────────────────────────────

/// The five-point ordinal sentiment scale, most negative first.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  strum::Display,
  strum::AsRefStr,
  strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum SentimentLabel {
  #[serde(rename = "Very Negative")]
  #[strum(serialize = "Very Negative")]
  VeryNegative,
  #[serde(rename = "Negative")]
  #[strum(serialize = "Negative")]
  Negative,
  #[serde(rename = "Neutral")]
  #[strum(serialize = "Neutral")]
  Neutral,
  #[serde(rename = "Positive")]
  #[strum(serialize = "Positive")]
  Positive,
  #[serde(rename = "Very Positive")]
  #[strum(serialize = "Very Positive")]
  VeryPositive,
}

impl SentimentLabel {
  /// Band a score in `[-1, 1]`.
  ///
  /// `> 0.5` very positive, `> 0.2` positive, `< -0.5` very negative,
  /// `< -0.2` negative, anything else neutral.
  pub fn from_score(score: f64) -> Self {
    if score > 0.5 {
      Self::VeryPositive
    } else if score > 0.2 {
      Self::Positive
    } else if score < -0.5 {
      Self::VeryNegative
    } else if score < -0.2 {
      Self::Negative
    } else {
      Self::Neutral
    }
  }
}

// ─── Sentiment ───────────────────────────────────────────────────────────────

/// A score in `[-1, 1]` together with its band.
///
/// Serialises as the `sentimentScore` / `sentimentLabel` pair stored on a
/// journal entry. Deserialising reads only the score and re-bands it, so a
/// stored label that disagrees is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredScore")]
pub struct Sentiment {
  #[serde(rename = "sentimentScore")]
  score: f64,
  #[serde(rename = "sentimentLabel")]
  label: SentimentLabel,
}

impl Sentiment {
  /// Clamp `score` into `[-1, 1]` and band it. Non-finite input is treated as
  /// neutral.
  pub fn from_score(score: f64) -> Self {
    let score = if score.is_finite() { score.clamp(-1.0, 1.0) } else { 0.0 };
    Self { score, label: SentimentLabel::from_score(score) }
  }

  pub fn score(&self) -> f64 { self.score }

  pub fn label(&self) -> SentimentLabel { self.label }
}

#[derive(Deserialize)]
struct StoredScore {
  #[serde(rename = "sentimentScore")]
  score: f64,
}

impl From<StoredScore> for Sentiment {
  fn from(stored: StoredScore) -> Self { Self::from_score(stored.score) }
}

/// The full result of scoring a piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
  #[serde(flatten)]
  pub sentiment: Sentiment,
  /// Two or three short observations about the text.
  pub insights:  Vec<String>,
}
