//! Trend analysis over a window of mood entries.
//!
//! Everything here is a pure function of its input: no clock, no I/O.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::MoodEntry;

/// Minimum difference between the recent and older half means, on the 1..5
/// mood scale, for a window to count as improving or declining. A fixed
/// design constant, not derived from the window's variance.
pub const TREND_THRESHOLD: f64 = 0.3;

/// How many of the most frequent emotion tags are reported.
pub const TOP_EMOTIONS: usize = 5;

/// Direction of mood across a window.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MoodTrend {
  Improving,
  Declining,
  #[default]
  Stable,
}

/// The trend signals derived from a window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodPatterns {
  pub average_mood:    f64,
  pub mood_trend:      MoodTrend,
  pub common_emotions: Vec<String>,
  pub entries_count:   usize,
}

/// Analyse `entries`, which must be ordered newest first (the order
/// `getRecent` returns).
///
/// An empty window yields an average of `0` and a stable trend.
pub fn analyze(entries: &[MoodEntry]) -> MoodPatterns {
  if entries.is_empty() {
    return MoodPatterns::default();
  }

  let average_mood = mean(entries).unwrap_or(0.0);

  // First half is the more recent one.
  let mid = entries.len() / 2;
  let (recent, older) = entries.split_at(mid);
  let recent_mean = mean(recent).unwrap_or(average_mood);
  let older_mean = mean(older).unwrap_or(average_mood);

  MoodPatterns {
    average_mood,
    mood_trend: classify(recent_mean - older_mean),
    common_emotions: common_emotions(entries, TOP_EMOTIONS),
    entries_count: entries.len(),
  }
}

fn mean(entries: &[MoodEntry]) -> Option<f64> {
  if entries.is_empty() {
    return None;
  }
  let sum: u32 = entries.iter().map(|e| u32::from(e.mood.get())).sum();
  Some(f64::from(sum) / entries.len() as f64)
}

fn classify(delta: f64) -> MoodTrend {
  if delta > TREND_THRESHOLD {
    MoodTrend::Improving
  } else if -delta > TREND_THRESHOLD {
    MoodTrend::Declining
  } else {
    MoodTrend::Stable
  }
}

/// The `top` most frequent tags. Ties keep the order in which the tags were
/// first seen.
pub fn common_emotions(entries: &[MoodEntry], top: usize) -> Vec<String> {
  let mut counts: Vec<(&str, usize)> = Vec::new();
  let mut index: HashMap<&str, usize> = HashMap::new();

  for tag in entries.iter().flat_map(|e| e.emotions.iter()) {
    match index.get(tag.as_str()) {
      Some(&i) => counts[i].1 += 1,
      None => {
        index.insert(tag.as_str(), counts.len());
        counts.push((tag.as_str(), 1));
      }
    }
  }

  // `sort_by` is stable, which is what keeps first-seen order among ties.
  counts.sort_by(|a, b| b.1.cmp(&a.1));
  counts.into_iter().take(top).map(|(tag, _)| tag.to_owned()).collect()
}

// ─── Insight text ────────────────────────────────────────────────────────────

/// Sentences describing `patterns`, in display order.
pub fn insights(patterns: &MoodPatterns) -> Vec<String> {
  if patterns.entries_count == 0 {
    return vec![
      "Start logging your mood to see patterns and insights here.".to_owned(),
    ];
  }

  let mut out = Vec::with_capacity(3);

  out.push(match patterns.mood_trend {
    MoodTrend::Improving => {
      "Your mood has been improving recently. Keep doing what's working for you!"
        .to_owned()
    }
    MoodTrend::Declining => {
      "Your mood has dipped lately. Be gentle with yourself, and consider reaching out to someone you trust."
        .to_owned()
    }
    MoodTrend::Stable => "Your mood has been fairly steady.".to_owned(),
  });

  out.push(format!(
    "Your average mood over the last {} check-ins is {:.1} out of 5.",
    patterns.entries_count, patterns.average_mood
  ));

  if let Some(top) = patterns.common_emotions.first() {
    out.push(format!("The feeling you've noted most often is \"{top}\"."));
  }

  out
}
