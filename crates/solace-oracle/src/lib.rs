//! Client for the generative model behind the companion's chat replies and
//! journal sentiment scores.
//!
//! Both operations always produce an answer. When the model is unreachable,
//! unconfigured, slow or returns something unusable, a deterministic local
//! fallback answers instead; the caller cannot tell the difference.

#![allow(async_fn_in_trait)]

mod backend;
mod fallback;
mod gemini;
mod oracle;

pub mod error;

pub use backend::{GenerateRequest, GenerativeBackend, Turn};
pub use error::{Error, Result};
pub use fallback::{FALLBACK_INSIGHTS, canned_response, lexical_sentiment};
pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiBackend};
pub use oracle::{CHAT_INSTRUCTION, ORACLE_TIMEOUT, Oracle, parse_sentiment};

#[cfg(test)]
mod tests;
