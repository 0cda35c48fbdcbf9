//! Plain JSON documents — the shape records take on their way to a store.
//!
//! Optional fields serialise to `null`; remote document schemas reject those,
//! so every write path runs [`strip_absent`] first.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// A top-level JSON object.
pub type Document = Map<String, Value>;

/// Serialise `value` into a [`Document`]. `what` names the value in the error
/// if it is not an object.
pub fn to_document<T: Serialize>(value: &T, what: &'static str) -> Result<Document> {
  match serde_json::to_value(value)? {
    Value::Object(map) => Ok(map),
    _ => Err(Error::NotADocument(what)),
  }
}

/// Remove `null` members, recursing into nested objects.
///
/// Arrays are left exactly as they are, elements included. Timestamps are
/// RFC 3339 strings at this layer and pass through untouched.
pub fn strip_absent(doc: &mut Document) {
  doc.retain(|_, value| !value.is_null());
  for value in doc.values_mut() {
    if let Value::Object(inner) = value {
      strip_absent(inner);
    }
  }
}

/// Serialise a patch and strip its absent fields in one step.
pub fn patch_document<T: Serialize>(patch: &T, what: &'static str) -> Result<Document> {
  let mut doc = to_document(patch, what)?;
  strip_absent(&mut doc);
  Ok(doc)
}

/// Overwrite the top-level members of `target` with those of `patch`.
///
/// Nested objects are replaced whole, matching a field-mask update on a
/// remote document.
pub fn merge(target: &mut Document, patch: Document) {
  for (key, value) in patch {
    target.insert(key, value);
  }
}
