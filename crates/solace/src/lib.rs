//! The Solace wellness companion.
//!
//! [`Companion`] is the surface the app's screens call: mood check-ins and
//! their trends, journaling with sentiment, supportive chat and the user's
//! profile. It is assembled from the record adapter, the oracle client and
//! an [`Identity`] provider supplied by the host app.
//!
//! ```rust,ignore
//! let settings = Arc::new(LayeredSettings::new(Some("solace.toml".into())));
//! let companion = Companion::new(settings, session.clone())?;
//! let id = companion.log_mood(MoodScore::new(4)?, ["calm"], None).await?;
//! ```

mod chat;
mod companion;
mod journal;
mod mood;
mod profile;

pub mod error;
pub mod identity;
pub mod telemetry;

pub use companion::Companion;
pub use error::{Error, Result};
pub use identity::{Identity, Session};
pub use journal::JournalEdit;
pub use mood::MOOD_WINDOW;

#[cfg(test)]
mod tests;
