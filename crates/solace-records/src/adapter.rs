//! [`RecordAdapter`] — mode selection, per-call timeout and local fallback.

use std::{
  future::Future,
  sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
  },
  time::Duration,
};

use serde::Serialize;
use tracing::{debug, error, warn};

use solace_core::{
  document::patch_document,
  record::{
    ChatPatch, ChatSession, JournalEntry, JournalPatch, MoodEntry, RecordKind,
    UserProfile,
  },
  settings::SettingsSource,
  store::{Record, RecordStore},
};
use solace_store_firestore::FirestoreStore;
use solace_store_memory::{MemoryStore, generate_id};

/// Upper bound on any single remote store call. Expiry is treated exactly
/// like an error.
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(8);

/// Which backend a call is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StorageMode {
  Remote,
  Local,
}

// ─── Adapter ─────────────────────────────────────────────────────────────────

/// A persistence API that never fails.
///
/// Calls go to `remote` while the store credentials are configured and to the
/// in-memory store otherwise. A remote call that errors or outlives
/// [`REMOTE_TIMEOUT`] is replayed against the in-memory store. The two
/// backends are never reconciled.
pub struct RecordAdapter<S = FirestoreStore> {
  remote:          S,
  local:           MemoryStore,
  settings:        Arc<dyn SettingsSource>,
  forced:          Option<StorageMode>,
  fallback_writes: AtomicU64,
}

impl RecordAdapter<FirestoreStore> {
  /// The production adapter: Firestore remote, fresh in-memory fallback.
  pub fn firestore(
    settings: Arc<dyn SettingsSource>,
  ) -> solace_store_firestore::Result<Self> {
    let remote = FirestoreStore::new(settings.clone())?;
    Ok(Self::new(remote, MemoryStore::new(), settings))
  }
}

impl<S: RecordStore> RecordAdapter<S> {
  pub fn new(remote: S, local: MemoryStore, settings: Arc<dyn SettingsSource>) -> Self {
    Self {
      remote,
      local,
      settings,
      forced: None,
      fallback_writes: AtomicU64::new(0),
    }
  }

  /// Pin every call to `mode` regardless of settings.
  pub fn with_mode(mut self, mode: StorageMode) -> Self {
    self.forced = Some(mode);
    self
  }

  /// The mode the next call will use. Settings are read fresh each time.
  pub fn mode(&self) -> StorageMode {
    if let Some(mode) = self.forced {
      return mode;
    }
    match self.settings.load() {
      Ok(settings) if settings.store.is_configured() => StorageMode::Remote,
      Ok(_) => StorageMode::Local,
      Err(e) => {
        warn!(error = %e, "could not read settings; using local store");
        StorageMode::Local
      }
    }
  }

  pub fn local(&self) -> &MemoryStore { &self.local }

  /// Writes that landed in the local store because the remote failed.
  pub fn fallback_writes(&self) -> u64 { self.fallback_writes.load(Ordering::Relaxed) }

  /// Await a remote `call` under [`REMOTE_TIMEOUT`]. `None` means the caller
  /// should use the local store; a timed-out call is dropped unfinished.
  async fn bounded<T, F>(&self, op: &'static str, kind: RecordKind, call: F) -> Option<T>
  where
    F: Future<Output = Result<T, S::Error>>,
  {
    match tokio::time::timeout(REMOTE_TIMEOUT, call).await {
      Ok(Ok(value)) => Some(value),
      Ok(Err(e)) => {
        warn!(%kind, op, error = %e, "remote store call failed; falling back to local store");
        None
      }
      Err(_) => {
        warn!(
          %kind,
          op,
          timeout_secs = REMOTE_TIMEOUT.as_secs(),
          "remote store call timed out; falling back to local store"
        );
        None
      }
    }
  }

  // ── Generic operations ─────────────────────────────────────────────────────

  /// Persist `record` and return its id.
  pub async fn save<R: Record>(&self, mut record: R) -> String {
    let remote_mode = self.mode() == StorageMode::Remote;
    if remote_mode {
      let stored = self.bounded("save", R::KIND, self.remote.insert(record.clone())).await;
      if let Some(id) = stored.as_ref().and_then(|r| r.id()) {
        return id.to_owned();
      }
    }

    if record.id().is_none() {
      record.set_id(generate_id(R::KIND));
    }
    let id = record.id().unwrap_or_default().to_owned();
    if let Err(e) = self.local.insert(record).await {
      error!(kind = %R::KIND, %id, error = %e, "local store rejected record");
    }
    if remote_mode {
      self.fallback_writes.fetch_add(1, Ordering::Relaxed);
      warn!(kind = %R::KIND, %id, "record written to local store only");
    } else {
      debug!(kind = %R::KIND, %id, "record saved locally");
    }
    id
  }

  /// Up to `limit` of the user's records, newest first.
  pub async fn recent<R: Record>(&self, user_id: &str, limit: usize) -> Vec<R> {
    if self.mode() == StorageMode::Remote {
      let call = self.remote.query::<R>(user_id, limit);
      if let Some(records) = self.bounded("query", R::KIND, call).await {
        return records;
      }
    }
    self.local.query::<R>(user_id, limit).await.unwrap_or_else(|e| {
      error!(kind = %R::KIND, error = %e, "local query failed");
      Vec::new()
    })
  }

  /// Overwrite the fields `patch` sets on `user_id`'s record `id`. Unknown
  /// ids and other users' records are ignored.
  pub async fn update<R, P>(&self, user_id: &str, id: &str, patch: &P)
  where
    R: Record,
    P: Serialize + Sync,
  {
    let doc = match patch_document(patch, "patch") {
      Ok(doc) => doc,
      Err(e) => {
        error!(kind = %R::KIND, id, error = %e, "patch could not be encoded");
        return;
      }
    };
    if self.mode() == StorageMode::Remote {
      let call = self.remote.update::<R>(user_id, id, doc.clone());
      if self.bounded("update", R::KIND, call).await.is_some() {
        return;
      }
    }
    if let Err(e) = self.local.update::<R>(user_id, id, doc).await {
      error!(kind = %R::KIND, id, error = %e, "local update failed");
    }
  }

  /// Remove `user_id`'s record `id`. Unknown ids and other users' records
  /// are ignored.
  pub async fn delete<R: Record>(&self, user_id: &str, id: &str) {
    if self.mode() == StorageMode::Remote {
      let call = self.remote.delete::<R>(user_id, id);
      if self.bounded("delete", R::KIND, call).await.is_some() {
        return;
      }
    }
    if let Err(e) = self.local.delete::<R>(user_id, id).await {
      error!(kind = %R::KIND, id, error = %e, "local delete failed");
    }
  }

  // ── Per-kind operations ────────────────────────────────────────────────────

  pub async fn save_mood_entry(&self, entry: MoodEntry) -> String { self.save(entry).await }

  pub async fn recent_mood_entries(&self, user_id: &str, limit: usize) -> Vec<MoodEntry> {
    self.recent(user_id, limit).await
  }

  pub async fn save_journal_entry(&self, entry: JournalEntry) -> String {
    self.save(entry).await
  }

  pub async fn recent_journal_entries(&self, user_id: &str, limit: usize) -> Vec<JournalEntry> {
    self.recent(user_id, limit).await
  }

  pub async fn update_journal_entry(&self, user_id: &str, id: &str, patch: &JournalPatch) {
    self.update::<JournalEntry, _>(user_id, id, patch).await
  }

  pub async fn delete_journal_entry(&self, user_id: &str, id: &str) {
    self.delete::<JournalEntry>(user_id, id).await
  }

  pub async fn save_chat_session(&self, session: ChatSession) -> String {
    self.save(session).await
  }

  pub async fn recent_chat_sessions(&self, user_id: &str, limit: usize) -> Vec<ChatSession> {
    self.recent(user_id, limit).await
  }

  /// Replace the stored transcript of session `id`.
  pub async fn update_chat_session(&self, user_id: &str, id: &str, patch: &ChatPatch) {
    self.update::<ChatSession, _>(user_id, id, patch).await
  }

  pub async fn save_user_profile(&self, profile: UserProfile) -> String {
    self.save(profile).await
  }

  /// The user's newest profile document, if any.
  pub async fn user_profile(&self, user_id: &str) -> Option<UserProfile> {
    self.recent::<UserProfile>(user_id, 1).await.into_iter().next()
  }
}
