//! Supportive chat.

use solace_core::{
  Error as CoreError,
  record::{ChatSession, Message},
  store::RecordStore,
};
use solace_oracle::GenerativeBackend;
use tracing::{debug, warn};

use crate::{Companion, Result};

impl<S: RecordStore, B: GenerativeBackend> Companion<S, B> {
  /// Send `text` in `session` (or a new session when `None`), append the
  /// companion's reply, store the transcript and return it.
  ///
  /// A session owned by someone other than the signed-in user is set aside
  /// and a new one is started in its place.
  pub async fn send_message(&self, session: Option<ChatSession>, text: &str) -> Result<ChatSession> {
    let user = self.user()?;
    let text = text.trim();
    if text.is_empty() {
      return Err(CoreError::EmptyContent.into());
    }

    let mut session = match session {
      Some(s) if s.user_id == user => s,
      Some(s) => {
        warn!(session = s.id.as_deref(), "session belongs to another user; starting a new one");
        ChatSession::start(user.clone())
      }
      None => ChatSession::start(user.clone()),
    };
    let asked = Message::user(text);
    let profile = self.records.user_profile(&user).await;
    let reply = self
      .oracle
      .complete_chat(text, &session.messages, profile.as_ref())
      .await;
    session.push(asked);
    session.push(Message::assistant(reply));

    match session.id.clone() {
      Some(id) => self.records.update_chat_session(&user, &id, &session.transcript_patch()).await,
      None => {
        let id = self.records.save_chat_session(session.clone()).await;
        debug!(%id, "chat session started");
        session.id = Some(id);
      }
    }
    Ok(session)
  }

  /// The user's sessions, most recently active first.
  pub async fn chat_sessions(&self, limit: usize) -> Result<Vec<ChatSession>> {
    let user = self.user()?;
    Ok(self.records.recent_chat_sessions(&user, limit).await)
  }
}
