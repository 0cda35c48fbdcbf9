//! The `RecordStore` trait and the `Record` trait it is generic over.
//!
//! The store trait is implemented by the local in-memory backend
//! (`solace-store-memory`) and the remote document backend
//! (`solace-store-firestore`). The record adapter in `solace-records` picks
//! one per call and falls back from remote to local.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::{document::Document, record::RecordKind};

// ─── Record ──────────────────────────────────────────────────────────────────

/// A persistable document owned by a single user.
pub trait Record:
  Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
  const KIND: RecordKind;

  /// The document field queries order by (newest first).
  const ORDER_FIELD: &'static str;

  /// Document fields holding timestamps. A dotted path such as
  /// `messages.timestamp` names a field inside the maps of an array field.
  /// Backends that have a native timestamp type convert these at the
  /// boundary.
  const TIMESTAMP_FIELDS: &'static [&'static str];

  fn id(&self) -> Option<&str>;

  fn set_id(&mut self, id: String);

  fn user_id(&self) -> &str;

  /// The value of [`Self::ORDER_FIELD`].
  fn timestamp(&self) -> DateTime<Utc>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a record storage backend.
///
/// Every call is scoped to one user. Updates and deletes of ids the store
/// does not hold, or that another user owns, succeed without effect.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded tokio runtime.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `record`, assigning an id if it has none, and return the stored
  /// copy.
  fn insert<R: Record>(
    &self,
    record: R,
  ) -> impl Future<Output = Result<R, Self::Error>> + Send + '_;

  /// Up to `limit` records owned by `user_id`, newest first.
  fn query<'a, R: Record>(
    &'a self,
    user_id: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<R>, Self::Error>> + Send + 'a;

  /// Overwrite the top-level fields present in `patch` on `user_id`'s record
  /// `id`. `patch` has already had its absent fields stripped.
  fn update<'a, R: Record>(
    &'a self,
    user_id: &'a str,
    id: &'a str,
    patch: Document,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove `user_id`'s record `id`, if present.
  fn delete<'a, R: Record>(
    &'a self,
    user_id: &'a str,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
