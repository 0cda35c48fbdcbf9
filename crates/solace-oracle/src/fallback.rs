//! Deterministic answers used whenever the model cannot be.

use solace_core::sentiment::{Sentiment, SentimentAnalysis};

// ─── Chat ────────────────────────────────────────────────────────────────────

struct Canned {
  markers:  &'static [&'static str],
  response: &'static str,
}

/// Checked in order; the first topic with a marker among the message's words
/// wins.
const CANNED: &[Canned] = &[
  Canned {
    markers:  &["anxious", "anxiety", "panic", "panicked", "panicking"],
    response: "It sounds like you're carrying a lot of anxiety right now, and that \
               can feel overwhelming. Let's try slowing things down together: breathe \
               in for four counts, hold for four, and breathe out for six. What is the \
               thought that keeps coming back to you?",
  },
  Canned {
    markers:  &["sad", "depressed", "down"],
    response: "I'm sorry you're feeling this low. Your feelings are valid, and you \
               don't have to carry them alone. Would you like to tell me a little \
               more about what has been weighing on you?",
  },
  Canned {
    markers:  &["stressed", "stress", "overwhelmed"],
    response: "That sounds like a lot to hold at once. Sometimes it helps to pick one \
               small thing that is within your control today. What feels most \
               pressing to you right now?",
  },
  Canned {
    markers:  &["angry", "mad", "furious"],
    response: "It's completely understandable to feel angry, and anger often points \
               at something that matters to us. What happened that brought this up \
               for you?",
  },
  Canned {
    markers:  &["sleep", "insomnia", "tired"],
    response: "Poor sleep can make everything feel heavier. A steady wind-down \
               routine, dimmer lights and putting screens away an hour before bed can \
               help. How have your nights been lately?",
  },
];

/// Endings a topic marker may carry and still count as that word.
const INFLECTIONS: &[&str] = &["s", "ed", "ing", "ness", "ful", "less", "ly"];

const GREETINGS: &[&str] = &["hello", "hi", "hey"];

const GREETING_RESPONSE: &str = "Hello! I'm glad you're here. How are you feeling today?";

const REFLECTIVE_RESPONSE: &str = "Thank you for sharing that with me. I'm here to \
                                   listen. Can you tell me more about how this has been \
                                   affecting you?";

/// The scripted reply for `message`.
///
/// Topic markers match a word of the lowercased message, alone or with a
/// common ending ("stressful", "sadness"), so "made" is not "mad" and
/// "download" is not "down". Greetings only match as whole words.
pub fn canned_response(message: &str) -> &'static str {
  let lower = message.to_lowercase();
  if let Some(canned) = CANNED.iter().find(|c| {
    words(&lower).any(|w| c.markers.iter().any(|m| is_form_of(w, m)))
  }) {
    return canned.response;
  }
  if words(&lower).any(|w| GREETINGS.contains(&w)) {
    return GREETING_RESPONSE;
  }
  REFLECTIVE_RESPONSE
}

// ─── Sentiment ───────────────────────────────────────────────────────────────

const POSITIVE_WORDS: &[&str] = &[
  "happy", "joy", "joyful", "grateful", "thankful", "love", "loved", "excited", "calm",
  "peaceful", "hopeful", "proud", "good", "great", "wonderful", "amazing", "relaxed",
  "content", "better", "fun", "smile", "laugh", "confident", "optimistic",
];

const NEGATIVE_WORDS: &[&str] = &[
  "sad", "angry", "anxious", "worried", "stressed", "depressed", "lonely", "tired",
  "upset", "afraid", "scared", "hurt", "bad", "terrible", "awful", "hate", "frustrated",
  "overwhelmed", "hopeless", "cry", "crying", "panic", "exhausted", "miserable",
];

/// Insights attached to every locally scored text.
pub const FALLBACK_INSIGHTS: [&str; 3] = [
  "Writing about your feelings is a healthy way to process them.",
  "Noticing patterns in your emotions can help you understand yourself better.",
  "Be gentle with yourself; every feeling is valid.",
];

/// Score `text` by counting whole-word hits against fixed word lists.
///
/// `score = clamp((pos - neg) / max(pos + neg, 1) * 0.8, -1, 1)`.
pub fn lexical_sentiment(text: &str) -> SentimentAnalysis {
  let lower = text.to_lowercase();
  let (pos, neg) = words(&lower).fold((0u32, 0u32), |(pos, neg), w| {
    (
      pos + u32::from(POSITIVE_WORDS.contains(&w)),
      neg + u32::from(NEGATIVE_WORDS.contains(&w)),
    )
  });

  let total = (pos + neg).max(1);
  let score = (f64::from(pos) - f64::from(neg)) / f64::from(total) * 0.8;
  SentimentAnalysis {
    sentiment: Sentiment::from_score(score),
    insights:  FALLBACK_INSIGHTS.iter().map(|s| (*s).to_owned()).collect(),
  }
}

fn is_form_of(word: &str, marker: &str) -> bool {
  word
    .strip_prefix(marker)
    .is_some_and(|rest| rest.is_empty() || INFLECTIONS.contains(&rest))
}

fn words(lower: &str) -> impl Iterator<Item = &str> {
  lower
    .split(|c: char| !(c.is_alphanumeric() || c == '\''))
    .filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
  use solace_core::sentiment::SentimentLabel;

  use super::*;

  #[test]
  fn topics_are_checked_in_order() {
    assert_eq!(canned_response("Panic and sadness"), CANNED[0].response);
    assert_eq!(canned_response("feeling SAD and stressed"), CANNED[1].response);
    assert_eq!(canned_response("so much stress at work"), CANNED[2].response);
    assert_eq!(canned_response("I'm furious"), CANNED[3].response);
    assert_eq!(canned_response("can't sleep again"), CANNED[4].response);
  }

  #[test]
  fn markers_match_words_not_fragments() {
    assert_eq!(canned_response("I made dinner"), REFLECTIVE_RESPONSE);
    assert_eq!(canned_response("the download finished"), REFLECTIVE_RESPONSE);
    assert_eq!(canned_response("work has been stressful"), CANNED[2].response);
    assert_eq!(canned_response("a wave of sadness"), CANNED[1].response);
    assert_eq!(canned_response("I was panicking"), CANNED[0].response);
  }

  #[test]
  fn greetings_match_whole_words_only() {
    assert_eq!(canned_response("Hey there"), GREETING_RESPONSE);
    assert_eq!(canned_response("hi!"), GREETING_RESPONSE);
    assert_eq!(canned_response("this is thinking time"), REFLECTIVE_RESPONSE);
  }

  #[test]
  fn unmatched_messages_get_the_reflective_reply() {
    assert_eq!(canned_response("I went for a walk"), REFLECTIVE_RESPONSE);
    assert_eq!(canned_response(""), REFLECTIVE_RESPONSE);
  }

  #[test]
  fn lexical_score_follows_formula() {
    // 2 positive, 0 negative: 2/2 * 0.8
    let a = lexical_sentiment("Today was great, I feel happy.");
    assert!((a.sentiment.score() - 0.8).abs() < 1e-9);
    assert_eq!(a.sentiment.label(), SentimentLabel::VeryPositive);

    // 1 positive, 2 negative: -1/3 * 0.8
    let a = lexical_sentiment("good food but I am tired and sad");
    assert!((a.sentiment.score() + 0.8 / 3.0).abs() < 1e-9);
    assert_eq!(a.sentiment.label(), SentimentLabel::Negative);
  }

  #[test]
  fn lexical_counts_whole_words() {
    // "goodbye" and "sadly" are not list words.
    let a = lexical_sentiment("goodbye, sadly");
    assert_eq!(a.sentiment.score(), 0.0);
    assert_eq!(a.sentiment.label(), SentimentLabel::Neutral);
  }

  #[test]
  fn lexical_always_gives_three_insights() {
    let a = lexical_sentiment("");
    assert_eq!(a.insights, FALLBACK_INSIGHTS);
  }
}
