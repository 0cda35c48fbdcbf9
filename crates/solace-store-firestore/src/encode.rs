//! Encoding and decoding between plain JSON documents and Firestore's typed
//! value representation.
//!
//! Every Firestore value is a single-key object naming its type
//! (`stringValue`, `integerValue`, `mapValue`, …). Integers travel as decimal
//! strings. Fields a record declares as timestamps, including ones nested in
//! array maps, are sent as `timestampValue`; on the way back they decode to
//! plain RFC 3339 strings, which is what `chrono` deserialises from.

use serde::Deserialize;
use serde_json::{Map, Number, Value, json};

use solace_core::document::Document;

use crate::{Error, Result};

// ─── Raw wire types ──────────────────────────────────────────────────────────

/// A document as returned by the REST API.
#[derive(Debug, Deserialize)]
pub struct RawDocument {
  /// Full resource name; the last path segment is the document id.
  pub name:   String,
  #[serde(default)]
  pub fields: Map<String, Value>,
}

impl RawDocument {
  pub fn id(&self) -> &str { document_id(&self.name) }

  /// The `userId` field, read without decoding the rest of the document.
  pub fn owner(&self) -> Option<&str> {
    self.fields.get("userId")?.get("stringValue")?.as_str()
  }

  /// Decode into a plain document with `id` set from the resource name.
  pub fn into_document(self) -> Result<Document> {
    let id = self.id().to_owned();
    let mut doc = decode_fields(self.fields)?;
    doc.insert("id".to_owned(), Value::String(id));
    Ok(doc)
  }
}

/// One element of a `runQuery` response stream. Elements carrying only a
/// `readTime` have no document.
#[derive(Debug, Deserialize)]
pub struct RunQueryItem {
  pub document: Option<RawDocument>,
}

pub fn document_id(name: &str) -> &str { name.rsplit('/').next().unwrap_or(name) }

// ─── Encode ──────────────────────────────────────────────────────────────────

/// Encode a document's members as Firestore fields. The `id` member is
/// dropped: it lives in the resource name, not the body.
///
/// String values at `timestamp_paths` become `timestampValue`. A path like
/// `messages.timestamp` applies to the `timestamp` member of every map in the
/// `messages` array.
pub fn encode_fields(doc: &Document, timestamp_paths: &[&str]) -> Map<String, Value> {
  encode_map(doc, timestamp_paths, true)
}

fn encode_map(map: &Map<String, Value>, paths: &[&str], top: bool) -> Map<String, Value> {
  map
    .iter()
    .filter(|(key, _)| !(top && key.as_str() == "id"))
    .map(|(key, value)| {
      let encoded = match value {
        Value::String(s) if paths.contains(&key.as_str()) => json!({ "timestampValue": s }),
        other => encode_at(other, &below(paths, key)),
      };
      (key.clone(), encoded)
    })
    .collect()
}

/// The remainder of each path that starts with `key.`.
fn below<'p>(paths: &[&'p str], key: &str) -> Vec<&'p str> {
  paths
    .iter()
    .copied()
    .filter_map(|p| p.strip_prefix(key)?.strip_prefix('.'))
    .collect()
}

fn encode_at(value: &Value, paths: &[&str]) -> Value {
  if paths.is_empty() {
    return encode_value(value);
  }
  match value {
    Value::Array(items) => {
      let values: Vec<Value> = items.iter().map(|v| encode_at(v, paths)).collect();
      json!({ "arrayValue": { "values": values } })
    }
    Value::Object(map) => json!({ "mapValue": { "fields": encode_map(map, paths, false) } }),
    other => encode_value(other),
  }
}

pub fn encode_value(value: &Value) -> Value {
  match value {
    Value::Null => json!({ "nullValue": null }),
    Value::Bool(b) => json!({ "booleanValue": b }),
    Value::Number(n) => match n.as_i64() {
      Some(i) => json!({ "integerValue": i.to_string() }),
      None => json!({ "doubleValue": n }),
    },
    Value::String(s) => json!({ "stringValue": s }),
    Value::Array(items) => {
      let values: Vec<Value> = items.iter().map(encode_value).collect();
      json!({ "arrayValue": { "values": values } })
    }
    Value::Object(map) => {
      let fields: Map<String, Value> =
        map.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect();
      json!({ "mapValue": { "fields": fields } })
    }
  }
}

// ─── Decode ──────────────────────────────────────────────────────────────────

pub fn decode_fields(fields: Map<String, Value>) -> Result<Document> {
  fields
    .into_iter()
    .map(|(key, value)| Ok((key, decode_value(value)?)))
    .collect()
}

pub fn decode_value(value: Value) -> Result<Value> {
  let Value::Object(mut typed) = value else {
    return Err(Error::Malformed(format!("expected typed value, got {value}")));
  };
  let Some((kind, inner)) = typed.iter_mut().next().map(|(k, v)| (k.clone(), v.take()))
  else {
    return Err(Error::Malformed("empty typed value".to_owned()));
  };

  match (kind.as_str(), inner) {
    ("nullValue", _) => Ok(Value::Null),
    ("booleanValue", v @ Value::Bool(_)) => Ok(v),
    ("integerValue", Value::String(s)) => s
      .parse::<i64>()
      .map(|i| Value::Number(i.into()))
      .map_err(|e| Error::Malformed(format!("integerValue {s:?}: {e}"))),
    ("integerValue", v @ Value::Number(_)) => Ok(v),
    ("doubleValue", Value::Number(n)) => Ok(Value::Number(n)),
    ("doubleValue", Value::String(s)) => s
      .parse::<f64>()
      .ok()
      .and_then(Number::from_f64)
      .map(Value::Number)
      .ok_or_else(|| Error::Malformed(format!("doubleValue {s:?}"))),
    ("stringValue" | "timestampValue" | "referenceValue", v @ Value::String(_)) => Ok(v),
    ("arrayValue", Value::Object(mut arr)) => match arr.remove("values") {
      Some(Value::Array(values)) => {
        Ok(Value::Array(values.into_iter().map(decode_value).collect::<Result<_>>()?))
      }
      _ => Ok(Value::Array(Vec::new())),
    },
    ("mapValue", Value::Object(mut map)) => match map.remove("fields") {
      Some(Value::Object(fields)) => Ok(Value::Object(decode_fields(fields)?)),
      _ => Ok(Value::Object(Map::new())),
    },
    (other, v) => Err(Error::Malformed(format!("unsupported value {other}: {v}"))),
  }
}
