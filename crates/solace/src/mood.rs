//! Mood check-ins and the trends drawn from them.

use solace_core::{
  record::{MoodEntry, MoodScore},
  store::RecordStore,
  trend::{self, MoodPatterns},
};
use solace_oracle::GenerativeBackend;
use tracing::debug;

use crate::{Companion, Result};

/// How many recent check-ins the trend screens look at by default.
pub const MOOD_WINDOW: usize = 30;

impl<S: RecordStore, B: GenerativeBackend> Companion<S, B> {
  /// Record a check-in and return its id.
  pub async fn log_mood<I, E>(&self, mood: MoodScore, emotions: I, note: Option<&str>) -> Result<String>
  where
    I: IntoIterator<Item = E>,
    E: Into<String>,
  {
    let user = self.user()?;
    let mut entry = MoodEntry::new(user, mood).with_emotions(emotions);
    if let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) {
      entry = entry.with_note(note);
    }
    let id = self.records.save_mood_entry(entry).await;
    debug!(%id, mood = mood.get(), "mood logged");
    Ok(id)
  }

  /// Patterns across the user's `window` most recent check-ins.
  pub async fn mood_patterns(&self, window: usize) -> Result<MoodPatterns> {
    let user = self.user()?;
    let entries = self.records.recent_mood_entries(&user, window).await;
    Ok(trend::analyze(&entries))
  }

  /// Plain-language observations about [`Self::mood_patterns`].
  pub async fn mood_insights(&self, window: usize) -> Result<Vec<String>> {
    let patterns = self.mood_patterns(window).await?;
    Ok(trend::insights(&patterns))
  }
}
