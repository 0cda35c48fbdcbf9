//! [`MemoryStore`] — the in-process implementation of [`RecordStore`].

use std::{
  collections::HashMap,
  sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
  },
};

use chrono::Utc;
use serde_json::Value;

use solace_core::{
  document::{Document, merge, to_document},
  record::RecordKind,
  store::{Record, RecordStore},
};

use crate::Result;

// ─── Ids ─────────────────────────────────────────────────────────────────────

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A fresh local id shaped `{kind}-{millis}-{seq}`.
///
/// The process-wide sequence suffix keeps ids unique even when several
/// records are written within the same millisecond.
pub fn generate_id(kind: RecordKind) -> String {
  let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
  format!("{kind}-{}-{seq}", Utc::now().timestamp_millis())
}

// ─── Store ───────────────────────────────────────────────────────────────────

type Collections = HashMap<RecordKind, Vec<Document>>;

/// Unbounded per-kind collections of documents, insertion ordered.
///
/// Cloning is cheap; clones share the same collections. The lock is only
/// ever held for the synchronous body of a call, never across an `.await`.
#[derive(Clone, Default)]
pub struct MemoryStore {
  collections: Arc<Mutex<Collections>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, Collections> {
    self.collections.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Number of records of `kind` held, across all users.
  pub fn len(&self, kind: RecordKind) -> usize {
    self.lock().get(&kind).map_or(0, Vec::len)
  }

  pub fn is_empty(&self, kind: RecordKind) -> bool { self.len(kind) == 0 }

  fn insert_sync<R: Record>(&self, mut record: R) -> Result<R> {
    if record.id().is_none() {
      record.set_id(generate_id(R::KIND));
    }
    let doc = to_document(&record, "record")?;
    self.lock().entry(R::KIND).or_default().push(doc);
    Ok(record)
  }

  fn query_sync<R: Record>(&self, user_id: &str, limit: usize) -> Result<Vec<R>> {
    let mut records = {
      let collections = self.lock();
      collections
        .get(&R::KIND)
        .into_iter()
        .flatten()
        .rev()
        .filter(|doc| doc.get("userId").and_then(Value::as_str) == Some(user_id))
        .map(|doc| serde_json::from_value::<R>(Value::Object(doc.clone())))
        .collect::<serde_json::Result<Vec<R>>>()?
    };

    // Stable sort over newest-inserted-first input: equal timestamps keep the
    // later write on top.
    records.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    records.truncate(limit);
    Ok(records)
  }

  fn update_sync(&self, kind: RecordKind, user_id: &str, id: &str, patch: Document) {
    let mut collections = self.lock();
    if let Some(doc) = collections
      .get_mut(&kind)
      .and_then(|docs| docs.iter_mut().find(|doc| is_owned(doc, user_id, id)))
    {
      merge(doc, patch);
    }
  }

  fn delete_sync(&self, kind: RecordKind, user_id: &str, id: &str) {
    if let Some(docs) = self.lock().get_mut(&kind) {
      docs.retain(|doc| !is_owned(doc, user_id, id));
    }
  }
}

fn is_owned(doc: &Document, user_id: &str, id: &str) -> bool {
  doc.get("id").and_then(Value::as_str) == Some(id)
    && doc.get("userId").and_then(Value::as_str) == Some(user_id)
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for MemoryStore {
  type Error = crate::Error;

  async fn insert<R: Record>(&self, record: R) -> Result<R> { self.insert_sync(record) }

  async fn query<'a, R: Record>(&'a self, user_id: &'a str, limit: usize) -> Result<Vec<R>> {
    self.query_sync(user_id, limit)
  }

  async fn update<'a, R: Record>(
    &'a self,
    user_id: &'a str,
    id: &'a str,
    patch: Document,
  ) -> Result<()> {
    self.update_sync(R::KIND, user_id, id, patch);
    Ok(())
  }

  async fn delete<'a, R: Record>(&'a self, user_id: &'a str, id: &'a str) -> Result<()> {
    self.delete_sync(R::KIND, user_id, id);
    Ok(())
  }
}
