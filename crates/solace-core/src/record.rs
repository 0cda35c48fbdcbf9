//! Record types — the four kinds of document the companion persists.
//!
//! Every record is owned by the `userId` that created it. Ids are assigned by
//! whichever store persists the record first, so freshly built records carry
//! `id: None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  sentiment::{Sentiment, SentimentLabel},
  store::Record,
};

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The record kinds, one per document collection.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
  Mood,
  Journal,
  Chat,
  Profile,
}

impl RecordKind {
  /// Name of the remote document collection holding this kind.
  pub fn collection(&self) -> &'static str {
    match self {
      Self::Mood => "moodEntries",
      Self::Journal => "journalEntries",
      Self::Chat => "chatSessions",
      Self::Profile => "userProfiles",
    }
  }
}

// ─── Mood ────────────────────────────────────────────────────────────────────

/// A self-reported mood on the 1..=5 scale (1 most negative).
///
/// Out-of-range values are refused both at construction and when
/// deserialising a stored document.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct MoodScore(u8);

impl MoodScore {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;

  pub fn new(value: u8) -> Result<Self> {
    if (Self::MIN..=Self::MAX).contains(&value) {
      Ok(Self(value))
    } else {
      Err(Error::MoodOutOfRange(value))
    }
  }

  pub fn get(self) -> u8 { self.0 }

  /// The display label denormalised onto each entry.
  pub fn label(self) -> &'static str {
    match self.0 {
      1 => "Very Low",
      2 => "Low",
      3 => "Okay",
      4 => "Good",
      _ => "Great",
    }
  }
}

impl TryFrom<u8> for MoodScore {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self> { Self::new(value) }
}

impl From<MoodScore> for u8 {
  fn from(score: MoodScore) -> Self { score.0 }
}

/// One emotional check-in. Created once, never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:         Option<String>,
  pub user_id:    String,
  pub mood:       MoodScore,
  /// Convenience copy of [`MoodScore::label`]; not authoritative.
  pub mood_label: String,
  #[serde(default)]
  pub emotions:   Vec<String>,
  #[serde(default)]
  pub note:       Option<String>,
  pub timestamp:  DateTime<Utc>,
}

impl MoodEntry {
  pub fn new(user_id: impl Into<String>, mood: MoodScore) -> Self {
    Self {
      id: None,
      user_id: user_id.into(),
      mood,
      mood_label: mood.label().to_owned(),
      emotions: Vec::new(),
      note: None,
      timestamp: Utc::now(),
    }
  }

  pub fn with_emotions<I, S>(mut self, emotions: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.emotions = emotions.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_note(mut self, note: impl Into<String>) -> Self {
    self.note = Some(note.into());
    self
  }

  pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
    self.timestamp = timestamp;
    self
  }
}

impl Record for MoodEntry {
  const KIND: RecordKind = RecordKind::Mood;
  const ORDER_FIELD: &'static str = "timestamp";
  const TIMESTAMP_FIELDS: &'static [&'static str] = &["timestamp"];

  fn id(&self) -> Option<&str> { self.id.as_deref() }

  fn set_id(&mut self, id: String) { self.id = Some(id); }

  fn user_id(&self) -> &str { &self.user_id }

  fn timestamp(&self) -> DateTime<Utc> { self.timestamp }
}

// ─── Journal ─────────────────────────────────────────────────────────────────

/// What the user typed before the entry is scored and saved.
#[derive(Debug, Clone, Default)]
pub struct JournalDraft {
  pub title:   Option<String>,
  pub content: String,
  /// The writing prompt that seeded the entry, if any.
  pub prompt:  Option<String>,
}

impl JournalDraft {
  pub fn new(content: impl Into<String>) -> Self {
    Self { content: content.into(), ..Self::default() }
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = Some(title.into());
    self
  }

  pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
    self.prompt = Some(prompt.into());
    self
  }

  /// Refuse drafts whose content is blank.
  pub fn validate(&self) -> Result<()> {
    if self.content.trim().is_empty() {
      return Err(Error::EmptyContent);
    }
    Ok(())
  }
}

/// A free-text reflection with the sentiment computed at save time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:         Option<String>,
  pub user_id:    String,
  pub title:      String,
  pub content:    String,
  #[serde(flatten)]
  pub sentiment:  Sentiment,
  #[serde(default)]
  pub prompt:     Option<String>,
  pub timestamp:  DateTime<Utc>,
  #[serde(default)]
  pub updated_at: Option<DateTime<Utc>>,
}

impl JournalEntry {
  /// Build an entry from a validated draft. A blank title becomes the
  /// formatted date of `now`.
  pub fn from_draft(
    user_id: impl Into<String>,
    draft: JournalDraft,
    sentiment: Sentiment,
    now: DateTime<Utc>,
  ) -> Result<Self> {
    draft.validate()?;
    let title = match draft.title {
      Some(t) if !t.trim().is_empty() => t,
      _ => default_title(now),
    };
    Ok(Self {
      id: None,
      user_id: user_id.into(),
      title,
      content: draft.content,
      sentiment,
      prompt: draft.prompt,
      timestamp: now,
      updated_at: None,
    })
  }

  pub fn sentiment_label(&self) -> SentimentLabel { self.sentiment.label() }
}

/// The title given to entries saved without one, e.g. "Monday, March 4, 2024".
pub fn default_title(now: DateTime<Utc>) -> String {
  now.format("%A, %B %-d, %Y").to_string()
}

impl Record for JournalEntry {
  const KIND: RecordKind = RecordKind::Journal;
  const ORDER_FIELD: &'static str = "timestamp";
  const TIMESTAMP_FIELDS: &'static [&'static str] = &["timestamp", "updatedAt"];

  fn id(&self) -> Option<&str> { self.id.as_deref() }

  fn set_id(&mut self, id: String) { self.id = Some(id); }

  fn user_id(&self) -> &str { &self.user_id }

  fn timestamp(&self) -> DateTime<Utc> { self.timestamp }
}

/// Fields a journal update may change. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalPatch {
  pub title:      Option<String>,
  pub content:    Option<String>,
  #[serde(flatten, skip_serializing_if = "Option::is_none")]
  pub sentiment:  Option<Sentiment>,
  pub updated_at: Option<DateTime<Utc>>,
}

// ─── Chat ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Assistant,
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
  pub id:        String,
  pub role:      Role,
  pub content:   String,
  pub timestamp: DateTime<Utc>,
}

impl Message {
  pub fn new(role: Role, content: impl Into<String>) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      role,
      content: content.into(),
      timestamp: Utc::now(),
    }
  }

  pub fn user(content: impl Into<String>) -> Self { Self::new(Role::User, content) }

  pub fn assistant(content: impl Into<String>) -> Self {
    Self::new(Role::Assistant, content)
  }
}

/// A conversation transcript. Role alternation is not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:              Option<String>,
  pub user_id:         String,
  #[serde(default)]
  pub messages:        Vec<Message>,
  pub started_at:      DateTime<Utc>,
  pub last_message_at: DateTime<Utc>,
}

impl ChatSession {
  pub fn start(user_id: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      id: None,
      user_id: user_id.into(),
      messages: Vec::new(),
      started_at: now,
      last_message_at: now,
    }
  }

  /// Append a message; `last_message_at` never moves backwards.
  pub fn push(&mut self, message: Message) {
    if message.timestamp > self.last_message_at {
      self.last_message_at = message.timestamp;
    }
    self.messages.push(message);
  }

  /// The patch that brings a stored copy of this session up to date.
  pub fn transcript_patch(&self) -> ChatPatch {
    ChatPatch {
      messages:        self.messages.clone(),
      last_message_at: self.last_message_at,
    }
  }
}

impl Record for ChatSession {
  const KIND: RecordKind = RecordKind::Chat;
  const ORDER_FIELD: &'static str = "lastMessageAt";
  const TIMESTAMP_FIELDS: &'static [&'static str] =
    &["startedAt", "lastMessageAt", "messages.timestamp"];

  fn id(&self) -> Option<&str> { self.id.as_deref() }

  fn set_id(&mut self, id: String) { self.id = Some(id); }

  fn user_id(&self) -> &str { &self.user_id }

  fn timestamp(&self) -> DateTime<Utc> { self.last_message_at }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPatch {
  pub messages:        Vec<Message>,
  pub last_message_at: DateTime<Utc>,
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// What the user has told the companion about themselves. The newest profile
/// document for a user is the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:                Option<String>,
  pub user_id:           String,
  #[serde(default)]
  pub display_name:      Option<String>,
  #[serde(default)]
  pub goals:             Vec<String>,
  #[serde(default)]
  pub coping_strategies: Vec<String>,
  pub timestamp:         DateTime<Utc>,
}

impl UserProfile {
  pub fn new(user_id: impl Into<String>) -> Self {
    Self {
      id: None,
      user_id: user_id.into(),
      display_name: None,
      goals: Vec::new(),
      coping_strategies: Vec::new(),
      timestamp: Utc::now(),
    }
  }

  /// A short plain-text summary suitable for a model's system instruction.
  /// Empty when the profile carries nothing worth saying.
  pub fn context_summary(&self) -> String {
    let mut lines = Vec::new();
    if let Some(name) = self.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
      lines.push(format!("The user's name is {name}."));
    }
    if !self.goals.is_empty() {
      lines.push(format!("Their wellness goals: {}.", self.goals.join(", ")));
    }
    if !self.coping_strategies.is_empty() {
      lines.push(format!(
        "Coping strategies that have helped them: {}.",
        self.coping_strategies.join(", ")
      ));
    }
    lines.join("\n")
  }
}

impl Record for UserProfile {
  const KIND: RecordKind = RecordKind::Profile;
  const ORDER_FIELD: &'static str = "timestamp";
  const TIMESTAMP_FIELDS: &'static [&'static str] = &["timestamp"];

  fn id(&self) -> Option<&str> { self.id.as_deref() }

  fn set_id(&mut self, id: String) { self.id = Some(id); }

  fn user_id(&self) -> &str { &self.user_id }

  fn timestamp(&self) -> DateTime<Utc> { self.timestamp }
}
