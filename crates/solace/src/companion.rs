//! [`Companion`] construction and the signed-in-user gate.

use std::sync::Arc;

use solace_core::{settings::SettingsSource, store::RecordStore};
use solace_oracle::{GeminiBackend, GenerativeBackend, Oracle};
use solace_records::RecordAdapter;
use solace_store_firestore::FirestoreStore;

use crate::{Error, Identity, Result};

/// The companion's feature flows for whichever user is signed in.
///
/// Every flow fails with [`Error::NotAuthenticated`] when nobody is. Past
/// that gate, storage and model failures never surface: they are absorbed
/// by the local fallbacks and only show up in the logs.
pub struct Companion<S = FirestoreStore, B = GeminiBackend> {
  pub(crate) records:  RecordAdapter<S>,
  pub(crate) oracle:   Oracle<B>,
  pub(crate) identity: Arc<dyn Identity>,
}

impl Companion {
  /// Firestore records and a Gemini oracle, both configured from `settings`.
  pub fn new(settings: Arc<dyn SettingsSource>, identity: Arc<dyn Identity>) -> Result<Self> {
    let records = RecordAdapter::firestore(settings.clone())?;
    let oracle = Oracle::gemini(settings)?;
    Ok(Self::from_parts(records, oracle, identity))
  }
}

impl<S: RecordStore, B: GenerativeBackend> Companion<S, B> {
  pub fn from_parts(records: RecordAdapter<S>, oracle: Oracle<B>, identity: Arc<dyn Identity>) -> Self {
    Self { records, oracle, identity }
  }

  pub fn records(&self) -> &RecordAdapter<S> { &self.records }

  pub(crate) fn user(&self) -> Result<String> {
    self.identity.current_user().ok_or(Error::NotAuthenticated)
  }
}
