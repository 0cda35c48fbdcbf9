//! End-to-end flows through `Companion` with demo-mode settings: records stay
//! in memory and the oracle answers locally.

use std::sync::Arc;

use chrono::{Duration, Utc};
use solace_core::{
  Error as CoreError,
  record::{JournalDraft, MoodEntry, MoodScore, Role, UserProfile},
  sentiment::SentimentLabel,
  settings::StaticSettings,
  trend::MoodTrend,
};
use solace_oracle::canned_response;

use crate::{Companion, Error, JournalEdit, MOOD_WINDOW, Session};

fn companion(user: &str) -> (Arc<Session>, Companion) {
  telemetry_for_tests();
  let session = Arc::new(Session::signed_in(user));
  let companion = Companion::new(Arc::new(StaticSettings::demo()), session.clone()).unwrap();
  (session, companion)
}

fn telemetry_for_tests() {
  // Only the first caller in the test binary installs the subscriber.
  let _ = crate::telemetry::init();
}

fn score(value: u8) -> MoodScore { MoodScore::new(value).unwrap() }

// ─── Identity ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_flow_needs_a_signed_in_user() {
  let (session, c) = companion("u1");
  session.sign_out();

  assert!(matches!(c.log_mood(score(3), ["calm"], None).await, Err(Error::NotAuthenticated)));
  assert!(matches!(c.mood_patterns(MOOD_WINDOW).await, Err(Error::NotAuthenticated)));
  assert!(matches!(c.mood_insights(MOOD_WINDOW).await, Err(Error::NotAuthenticated)));
  assert!(matches!(
    c.save_journal(JournalDraft::new("hello")).await,
    Err(Error::NotAuthenticated)
  ));
  assert!(matches!(c.journal_entries(10).await, Err(Error::NotAuthenticated)));
  assert!(matches!(
    c.update_journal("x", JournalEdit::default()).await,
    Err(Error::NotAuthenticated)
  ));
  assert!(matches!(c.delete_journal("x").await, Err(Error::NotAuthenticated)));
  assert!(matches!(c.send_message(None, "hi").await, Err(Error::NotAuthenticated)));
  assert!(matches!(c.chat_sessions(5).await, Err(Error::NotAuthenticated)));
  assert!(matches!(c.profile().await, Err(Error::NotAuthenticated)));
  assert!(matches!(
    c.save_profile(UserProfile::new("u1")).await,
    Err(Error::NotAuthenticated)
  ));
}

#[tokio::test]
async fn users_only_see_their_own_records() {
  let (session, c) = companion("u1");
  c.log_mood(score(2), ["tired"], Some("long shift")).await.unwrap();

  session.sign_in("u2");
  assert_eq!(c.mood_patterns(MOOD_WINDOW).await.unwrap().entries_count, 0);

  session.sign_in("u1");
  let patterns = c.mood_patterns(MOOD_WINDOW).await.unwrap();
  assert_eq!(patterns.entries_count, 1);
  assert_eq!(patterns.common_emotions, vec!["tired"]);
}

#[tokio::test]
async fn other_users_cannot_edit_or_delete_a_journal_entry() {
  let (session, c) = companion("u1");
  let entry = c
    .save_journal(JournalDraft::new("a quiet evening").with_title("Mine"))
    .await
    .unwrap();
  let id = entry.id.clone().unwrap();

  session.sign_in("u2");
  c.update_journal(&id, JournalEdit {
    title:   Some("Renamed".into()),
    content: Some("rewritten by someone else".into()),
  })
  .await
  .unwrap();
  c.delete_journal(&id).await.unwrap();

  session.sign_in("u1");
  assert_eq!(c.journal_entries(10).await.unwrap(), vec![entry]);
}

#[tokio::test]
async fn another_users_session_is_not_appended_to() {
  let (session, c) = companion("u1");
  let theirs = c.send_message(None, "hello").await.unwrap();

  session.sign_in("u2");
  let mine = c.send_message(Some(theirs.clone()), "I feel sad").await.unwrap();
  assert_eq!(mine.user_id, "u2");
  assert_ne!(mine.id, theirs.id);
  assert_eq!(mine.messages.len(), 2);
  assert_eq!(mine.messages[0].content, "I feel sad");

  session.sign_in("u1");
  let stored = c.chat_sessions(5).await.unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].messages.len(), 2);
  assert_eq!(stored[0].messages[0].content, "hello");
}

// ─── Mood ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn logged_mood_keeps_note_and_emotions() {
  let (_session, c) = companion("u1");
  let id = c
    .log_mood(score(4), ["calm", "hopeful"], Some("  walked by the river  "))
    .await
    .unwrap();
  assert!(id.starts_with("mood-"));

  let entries = c.records().recent_mood_entries("u1", 10).await;
  assert_eq!(entries[0].note.as_deref(), Some("walked by the river"));
  assert_eq!(entries[0].mood_label, "Good");
  assert_eq!(entries[0].emotions, vec!["calm", "hopeful"]);
}

#[tokio::test]
async fn week_of_recovery_reads_as_improving() {
  let (_session, c) = companion("u1");
  let start = Utc::now() - Duration::days(7);
  for (day, mood) in [2, 2, 2, 5, 5, 5, 5].into_iter().enumerate() {
    let entry = MoodEntry::new("u1", score(mood)).at(start + Duration::days(day as i64));
    c.records().save_mood_entry(entry).await;
  }

  let patterns = c.mood_patterns(MOOD_WINDOW).await.unwrap();
  assert_eq!(patterns.entries_count, 7);
  assert!((patterns.average_mood - 3.71).abs() < 0.01);
  assert_eq!(patterns.mood_trend, MoodTrend::Improving);

  let insights = c.mood_insights(MOOD_WINDOW).await.unwrap();
  assert!(insights.iter().any(|line| line.contains("improving")));
}

#[tokio::test]
async fn empty_history_gets_a_starter_insight() {
  let (_session, c) = companion("u1");
  let insights = c.mood_insights(MOOD_WINDOW).await.unwrap();
  assert!(insights[0].starts_with("Start logging"));
}

// ─── Journal ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn demo_journal_is_scored_and_stored() {
  let (_session, c) = companion("u1");
  let entry = c
    .save_journal(JournalDraft::new("Today was great. I feel happy and grateful."))
    .await
    .unwrap();

  assert!(entry.id.as_deref().is_some_and(|id| !id.is_empty()));
  assert!(matches!(
    entry.sentiment_label(),
    SentimentLabel::Positive | SentimentLabel::VeryPositive
  ));
  assert!(!entry.title.is_empty());

  let stored = c.journal_entries(10).await.unwrap();
  assert_eq!(stored, vec![entry]);
}

#[tokio::test]
async fn blank_journal_is_refused() {
  let (_session, c) = companion("u1");
  let err = c.save_journal(JournalDraft::new("   ")).await.unwrap_err();
  assert!(matches!(err, Error::Invalid(CoreError::EmptyContent)));
  assert!(c.journal_entries(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn editing_content_rescores_and_stamps() {
  let (_session, c) = companion("u1");
  let entry = c
    .save_journal(JournalDraft::new("I feel happy and calm").with_title("Sunday"))
    .await
    .unwrap();
  let id = entry.id.clone().unwrap();

  c.update_journal(&id, JournalEdit {
    content: Some("Now I feel sad, anxious and exhausted".into()),
    ..JournalEdit::default()
  })
  .await
  .unwrap();

  let updated = &c.journal_entries(1).await.unwrap()[0];
  assert_eq!(updated.title, "Sunday");
  assert_eq!(updated.sentiment_label(), SentimentLabel::VeryNegative);
  assert!(updated.updated_at.is_some());
}

#[tokio::test]
async fn editing_title_keeps_sentiment() {
  let (_session, c) = companion("u1");
  let entry = c.save_journal(JournalDraft::new("a good day")).await.unwrap();
  let id = entry.id.clone().unwrap();

  c.update_journal(&id, JournalEdit { title: Some("Renamed".into()), content: None })
    .await
    .unwrap();

  let updated = &c.journal_entries(1).await.unwrap()[0];
  assert_eq!(updated.title, "Renamed");
  assert_eq!(updated.content, "a good day");
  assert_eq!(updated.sentiment, entry.sentiment);
}

#[tokio::test]
async fn blank_edit_content_is_refused() {
  let (_session, c) = companion("u1");
  let err = c
    .update_journal("journal-1-1", JournalEdit { title: None, content: Some(" ".into()) })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Invalid(CoreError::EmptyContent)));
}

#[tokio::test]
async fn deleting_twice_is_harmless() {
  let (_session, c) = companion("u1");
  let keep = c.save_journal(JournalDraft::new("keep me")).await.unwrap();
  let gone = c.save_journal(JournalDraft::new("delete me")).await.unwrap();
  let gone_id = gone.id.unwrap();

  c.delete_journal(&gone_id).await.unwrap();
  c.delete_journal(&gone_id).await.unwrap();
  c.delete_journal("journal-0-0").await.unwrap();

  let left = c.journal_entries(10).await.unwrap();
  assert_eq!(left.len(), 1);
  assert_eq!(left[0].id, keep.id);
}

// ─── Chat ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn conversation_is_saved_then_updated() {
  let (_session, c) = companion("u1");

  let session = c.send_message(None, "hello").await.unwrap();
  let id = session.id.clone().unwrap();
  assert!(id.starts_with("chat-"));
  assert_eq!(session.messages.len(), 2);
  assert_eq!(session.messages[0].role, Role::User);
  assert_eq!(session.messages[1].content, canned_response("hello"));

  let session = c.send_message(Some(session), "I've been so stressed").await.unwrap();
  assert_eq!(session.id.as_deref(), Some(id.as_str()));
  assert_eq!(session.messages.len(), 4);
  assert_eq!(session.messages[3].content, canned_response("I've been so stressed"));

  let stored = c.chat_sessions(5).await.unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].messages.len(), 4);
  assert_eq!(stored[0].last_message_at, session.last_message_at);
}

#[tokio::test]
async fn blank_message_is_refused() {
  let (_session, c) = companion("u1");
  let err = c.send_message(None, "  \n").await.unwrap_err();
  assert!(matches!(err, Error::Invalid(CoreError::EmptyContent)));
  assert!(c.chat_sessions(5).await.unwrap().is_empty());
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn saved_profile_belongs_to_signed_in_user() {
  let (_session, c) = companion("u1");
  assert!(c.profile().await.unwrap().is_none());

  let mut profile = UserProfile::new("someone-else");
  profile.display_name = Some("Sam".into());
  profile.coping_strategies = vec!["box breathing".into()];
  c.save_profile(profile).await.unwrap();

  let mut newer = UserProfile::new("u1");
  newer.display_name = Some("Sammy".into());
  c.save_profile(newer).await.unwrap();

  let current = c.profile().await.unwrap().unwrap();
  assert_eq!(current.user_id, "u1");
  assert_eq!(current.display_name.as_deref(), Some("Sammy"));
}
