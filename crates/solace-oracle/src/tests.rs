//! Tests for `Oracle` against an in-process fake of the Gemini API.

use std::{
  net::SocketAddr,
  sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
  },
};

use axum::{
  Json, Router,
  body::Bytes,
  extract::State,
  http::{StatusCode, Uri},
  response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use solace_core::{
  record::{Message, UserProfile},
  sentiment::SentimentLabel,
  settings::{OracleSettings, Settings, StaticSettings},
};

use crate::{
  CHAT_INSTRUCTION, GenerateRequest, GenerativeBackend, ORACLE_TIMEOUT, Oracle, Result,
  canned_response, lexical_sentiment,
};

// ─── Fake Gemini ─────────────────────────────────────────────────────────────

const PATH: &str = "/v1beta/models/test-model:generateContent";

#[derive(Clone)]
enum Reply {
  Text(&'static str),
  Status(StatusCode),
  NoCandidates,
}

struct Fake {
  reply: Mutex<Reply>,
  last:  Mutex<Option<Value>>,
  hits:  AtomicU64,
}

impl Fake {
  fn reply(&self, reply: Reply) { *self.reply.lock().unwrap() = reply; }

  fn last(&self) -> Value { self.last.lock().unwrap().clone().unwrap() }

  fn hits(&self) -> u64 { self.hits.load(Ordering::SeqCst) }
}

async fn handle(State(fake): State<Arc<Fake>>, uri: Uri, body: Bytes) -> Response {
  fake.hits.fetch_add(1, Ordering::SeqCst);
  if uri.path() != PATH {
    return StatusCode::NOT_FOUND.into_response();
  }
  if uri.query() != Some("key=test-key") {
    return (StatusCode::FORBIDDEN, "bad key").into_response();
  }
  *fake.last.lock().unwrap() = serde_json::from_slice(&body).ok();

  let reply = fake.reply.lock().unwrap().clone();
  match reply {
    Reply::Text(text) => Json(json!({
      "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
    .into_response(),
    Reply::Status(status) => (status, "upstream trouble").into_response(),
    Reply::NoCandidates => Json(json!({ "candidates": [] })).into_response(),
  }
}

async fn spawn_fake(reply: Reply) -> (Arc<Fake>, SocketAddr) {
  let fake = Arc::new(Fake {
    reply: Mutex::new(reply),
    last:  Mutex::new(None),
    hits:  AtomicU64::new(0),
  });
  let app = Router::new().fallback(handle).with_state(fake.clone());
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  (fake, addr)
}

async fn oracle(reply: Reply) -> (Arc<Fake>, Oracle) {
  let _ = tracing_subscriber::fmt()
    .with_test_writer()
    .with_env_filter("solace_oracle=debug")
    .try_init();
  let (fake, addr) = spawn_fake(reply).await;
  let settings = Settings {
    oracle: OracleSettings {
      api_key:  Some("test-key".into()),
      model:    Some("test-model".into()),
      base_url: Some(format!("http://{addr}/v1beta")),
    },
    ..Settings::default()
  };
  let oracle = Oracle::gemini(Arc::new(StaticSettings::new(settings))).unwrap();
  (fake, oracle)
}

// ─── Chat ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_sends_transcript_and_profile() {
  let (fake, oracle) = oracle(Reply::Text("  Let's take a slow breath together.\n")).await;
  let history = [Message::user("hi"), Message::assistant("Hello! How are you?")];
  let mut profile = UserProfile::new("u1");
  profile.display_name = Some("Sam".into());
  profile.goals = vec!["sleep better".into()];

  let reply = oracle
    .complete_chat("work is a lot today", &history, Some(&profile))
    .await;
  assert_eq!(reply, "Let's take a slow breath together.");

  let body = fake.last();
  let roles: Vec<&str> = body["contents"]
    .as_array()
    .unwrap()
    .iter()
    .map(|c| c["role"].as_str().unwrap())
    .collect();
  assert_eq!(roles, ["user", "model", "user"]);
  assert_eq!(body["contents"][2]["parts"][0]["text"], "work is a lot today");

  let system = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
  assert!(system.starts_with(CHAT_INSTRUCTION));
  assert!(system.contains("Sam"));
  assert!(system.contains("sleep better"));
  assert!(body["generationConfig"].get("responseMimeType").is_none());
}

#[tokio::test]
async fn chat_without_key_answers_locally() {
  let (fake, addr) = spawn_fake(Reply::Text("unused")).await;
  let settings = Settings {
    oracle: OracleSettings {
      api_key:  Some("your-gemini-key".into()),
      model:    None,
      base_url: Some(format!("http://{addr}/v1beta")),
    },
    ..Settings::default()
  };
  let oracle = Oracle::gemini(Arc::new(StaticSettings::new(settings))).unwrap();

  let reply = oracle.complete_chat("I feel so anxious", &[], None).await;
  assert_eq!(reply, canned_response("I feel so anxious"));
  assert_eq!(fake.hits(), 0);
}

#[tokio::test]
async fn chat_falls_back_on_server_error_and_empty_text() {
  let (fake, oracle) = oracle(Reply::Status(StatusCode::INTERNAL_SERVER_ERROR)).await;
  let reply = oracle.complete_chat("I can't sleep", &[], None).await;
  assert_eq!(reply, canned_response("I can't sleep"));

  fake.reply(Reply::Text("   "));
  let reply = oracle.complete_chat("hello", &[], None).await;
  assert_eq!(reply, canned_response("hello"));

  fake.reply(Reply::NoCandidates);
  let reply = oracle.complete_chat("hello", &[], None).await;
  assert_eq!(reply, canned_response("hello"));
}

struct Stalled;

impl GenerativeBackend for Stalled {
  async fn generate(&self, _request: GenerateRequest) -> Result<String> {
    std::future::pending().await
  }
}

#[tokio::test(start_paused = true)]
async fn stalled_model_times_out_to_canned_reply() {
  let oracle = Oracle::new(Stalled);
  let started = tokio::time::Instant::now();

  let reply = oracle.complete_chat("so stressed", &[], None).await;
  assert!(started.elapsed() >= ORACLE_TIMEOUT);
  assert_eq!(reply, canned_response("so stressed"));

  let analysis = oracle.score_sentiment("a good day").await;
  assert_eq!(analysis, lexical_sentiment("a good day"));
}

// ─── Sentiment ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn sentiment_uses_structured_reply() {
  let (fake, oracle) = oracle(Reply::Text(
    "```json\n{\"score\": 0.6, \"label\": \"Very Positive\", \"insights\": [\"You noticed small wins.\", \"Rest helped.\"]}\n```",
  ))
  .await;

  let analysis = oracle.score_sentiment("I finally rested and it felt good").await;
  assert_eq!(analysis.sentiment.score(), 0.6);
  assert_eq!(analysis.sentiment.label(), SentimentLabel::VeryPositive);
  assert_eq!(analysis.insights.len(), 2);
  assert_eq!(fake.last()["generationConfig"]["responseMimeType"], "application/json");
}

#[tokio::test]
async fn remote_label_is_rebanded_from_score() {
  let (_fake, oracle) =
    oracle(Reply::Text(r#"{"score": -0.3, "label": "Very Positive", "insights": ["x"]}"#)).await;
  let analysis = oracle.score_sentiment("meh").await;
  assert_eq!(analysis.sentiment.label(), SentimentLabel::Negative);
}

#[tokio::test]
async fn unparsable_sentiment_scores_locally() {
  let text = "I was happy and calm but a little tired";
  let (fake, oracle) = oracle(Reply::Text("Overall this reads as positive.")).await;
  assert_eq!(oracle.score_sentiment(text).await, lexical_sentiment(text));

  fake.reply(Reply::Status(StatusCode::TOO_MANY_REQUESTS));
  assert_eq!(oracle.score_sentiment(text).await, lexical_sentiment(text));
}

#[tokio::test]
async fn local_sentiment_is_deterministic() {
  let oracle = Oracle::gemini(Arc::new(StaticSettings::demo())).unwrap();
  let text = "Grateful for a peaceful morning, though work made me stressed.";
  let first = oracle.score_sentiment(text).await;
  let second = oracle.score_sentiment(text).await;
  assert_eq!(first, second);
  assert_eq!(first.insights.len(), 3);
}
