//! Journaling: entries are scored for sentiment before they are stored, and
//! again whenever their text changes.

use chrono::Utc;
use solace_core::{
  Error as CoreError,
  record::{JournalDraft, JournalEntry, JournalPatch, default_title},
  store::RecordStore,
};
use solace_oracle::GenerativeBackend;
use tracing::debug;

use crate::{Companion, Result};

/// Changes to an existing entry. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct JournalEdit {
  pub title:   Option<String>,
  pub content: Option<String>,
}

impl<S: RecordStore, B: GenerativeBackend> Companion<S, B> {
  /// Score `draft`, store it, and return the stored entry.
  pub async fn save_journal(&self, draft: JournalDraft) -> Result<JournalEntry> {
    let user = self.user()?;
    draft.validate()?;

    let analysis = self.oracle.score_sentiment(&draft.content).await;
    let mut entry = JournalEntry::from_draft(user, draft, analysis.sentiment, Utc::now())?;
    let id = self.records.save_journal_entry(entry.clone()).await;
    debug!(%id, label = %entry.sentiment_label(), "journal entry saved");
    entry.id = Some(id);
    Ok(entry)
  }

  pub async fn journal_entries(&self, limit: usize) -> Result<Vec<JournalEntry>> {
    let user = self.user()?;
    Ok(self.records.recent_journal_entries(&user, limit).await)
  }

  /// Apply `edit` to the user's entry `id`. New content is re-scored; a
  /// blank title falls back to today's date. Unknown ids and other users'
  /// entries are ignored.
  pub async fn update_journal(&self, id: &str, edit: JournalEdit) -> Result<()> {
    let user = self.user()?;
    let now = Utc::now();

    let content = match edit.content {
      Some(content) if content.trim().is_empty() => return Err(CoreError::EmptyContent.into()),
      other => other,
    };
    let sentiment = match content.as_deref() {
      Some(text) => Some(self.oracle.score_sentiment(text).await.sentiment),
      None => None,
    };
    let title = edit.title.map(|t| {
      let t = t.trim();
      if t.is_empty() { default_title(now) } else { t.to_owned() }
    });

    let patch = JournalPatch { title, content, sentiment, updated_at: Some(now) };
    self.records.update_journal_entry(&user, id, &patch).await;
    Ok(())
  }

  /// Remove the user's entry `id`. Deleting an unknown id, or another
  /// user's entry, is not an error and does nothing.
  pub async fn delete_journal(&self, id: &str) -> Result<()> {
    let user = self.user()?;
    self.records.delete_journal_entry(&user, id).await;
    Ok(())
  }
}
