//! [`FirestoreStore`] — the remote implementation of [`RecordStore`].

use std::{sync::Arc, time::Duration};

use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};
use tracing::debug;

use solace_core::{
  document::{Document, strip_absent, to_document},
  settings::SettingsSource,
  store::{Record, RecordStore},
};

use crate::{
  Error, Result,
  encode::{RawDocument, RunQueryItem, encode_fields},
};

/// Root of the public Firestore REST API.
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Client-level ceiling on any single request. Callers apply their own,
/// shorter, per-call timeouts on top.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A record store backed by a Firestore database's REST API.
///
/// Cloning is cheap: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct FirestoreStore {
  client:   Client,
  settings: Arc<dyn SettingsSource>,
}

/// Where to send requests for this call, resolved from current settings.
struct Target {
  /// `…/projects/{project}/databases/(default)/documents`
  documents: String,
  key:       String,
}

impl FirestoreStore {
  pub fn new(settings: Arc<dyn SettingsSource>) -> Result<Self> {
    let client = Client::builder().timeout(CLIENT_TIMEOUT).build()?;
    Ok(Self { client, settings })
  }

  fn target(&self) -> Result<Target> {
    let store = self.settings.load()?.store;
    if !store.is_configured() {
      return Err(Error::NotConfigured);
    }
    let (Some(key), Some(project)) = (store.api_key, store.project_id) else {
      return Err(Error::NotConfigured);
    };
    let base = store.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
    Ok(Target {
      documents: format!(
        "{}/projects/{}/databases/(default)/documents",
        base.trim_end_matches('/'),
        project.trim()
      ),
      key: key.trim().to_owned(),
    })
  }

  /// Whether document `id` exists and its `userId` is `user_id`.
  async fn owned_by<R: Record>(&self, target: &Target, user_id: &str, id: &str) -> Result<bool> {
    let resp = self
      .client
      .get(target.document_url::<R>(id))
      .query(&[("key", target.key.as_str())])
      .send()
      .await?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(false);
    }
    let raw: RawDocument = check(resp).await?.json().await?;
    Ok(raw.owner() == Some(user_id))
  }
}

impl Target {
  fn document_url<R: Record>(&self, id: &str) -> String {
    format!("{}/{}/{id}", self.documents, R::KIND.collection())
  }
}

/// Turn a non-success response into [`Error::Status`].
async fn check(resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body = resp.text().await.unwrap_or_default();
  Err(Error::Status { status, body })
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for FirestoreStore {
  type Error = Error;

  async fn insert<R: Record>(&self, mut record: R) -> Result<R> {
    let target = self.target()?;
    let collection = R::KIND.collection();
    let mut doc = to_document(&record, "record")?;
    strip_absent(&mut doc);
    let body = json!({ "fields": encode_fields(&doc, R::TIMESTAMP_FIELDS) });

    let resp = self
      .client
      .post(format!("{}/{collection}", target.documents))
      .query(&[("key", target.key.as_str())])
      .json(&body)
      .send()
      .await?;
    let created: RawDocument = check(resp).await?.json().await?;

    debug!(collection, id = created.id(), "created remote document");
    record.set_id(created.id().to_owned());
    Ok(record)
  }

  async fn query<'a, R: Record>(&'a self, user_id: &'a str, limit: usize) -> Result<Vec<R>> {
    let target = self.target()?;
    let body = json!({
      "structuredQuery": {
        "from": [{ "collectionId": R::KIND.collection() }],
        "where": {
          "fieldFilter": {
            "field": { "fieldPath": "userId" },
            "op": "EQUAL",
            "value": { "stringValue": user_id },
          }
        },
        "orderBy": [{
          "field": { "fieldPath": R::ORDER_FIELD },
          "direction": "DESCENDING",
        }],
        "limit": limit.min(i32::MAX as usize),
      }
    });

    let resp = self
      .client
      .post(format!("{}:runQuery", target.documents))
      .query(&[("key", target.key.as_str())])
      .json(&body)
      .send()
      .await?;
    let items: Vec<RunQueryItem> = check(resp).await?.json().await?;

    items
      .into_iter()
      .filter_map(|item| item.document)
      .map(|raw| -> Result<R> {
        let doc = raw.into_document()?;
        Ok(serde_json::from_value::<R>(Value::Object(doc))?)
      })
      .collect()
  }

  async fn update<'a, R: Record>(
    &'a self,
    user_id: &'a str,
    id: &'a str,
    patch: Document,
  ) -> Result<()> {
    if patch.is_empty() {
      return Ok(());
    }
    let target = self.target()?;
    if !self.owned_by::<R>(&target, user_id, id).await? {
      debug!(id, "update of missing or foreign remote document ignored");
      return Ok(());
    }

    let mut params: Vec<(&str, &str)> = vec![
      ("key", target.key.as_str()),
      ("currentDocument.exists", "true"),
    ];
    params.extend(
      patch
        .keys()
        .filter(|k| !matches!(k.as_str(), "id" | "userId"))
        .map(|k| ("updateMask.fieldPaths", k.as_str())),
    );
    let body = json!({ "fields": encode_fields(&patch, R::TIMESTAMP_FIELDS) });

    let resp = self
      .client
      .patch(target.document_url::<R>(id))
      .query(&params)
      .json(&body)
      .send()
      .await?;

    if resp.status() == StatusCode::NOT_FOUND {
      debug!(id, "update of missing remote document ignored");
      return Ok(());
    }
    check(resp).await?;
    Ok(())
  }

  async fn delete<'a, R: Record>(&'a self, user_id: &'a str, id: &'a str) -> Result<()> {
    let target = self.target()?;
    if !self.owned_by::<R>(&target, user_id, id).await? {
      debug!(id, "delete of missing or foreign remote document ignored");
      return Ok(());
    }
    let resp = self
      .client
      .delete(target.document_url::<R>(id))
      .query(&[("key", target.key.as_str())])
      .send()
      .await?;

    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(());
    }
    check(resp).await?;
    Ok(())
  }
}
