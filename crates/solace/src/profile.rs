//! The user's profile, which personalises chat replies.

use chrono::Utc;
use solace_core::{record::UserProfile, store::RecordStore};
use solace_oracle::GenerativeBackend;

use crate::{Companion, Result};

impl<S: RecordStore, B: GenerativeBackend> Companion<S, B> {
  pub async fn profile(&self) -> Result<Option<UserProfile>> {
    let user = self.user()?;
    Ok(self.records.user_profile(&user).await)
  }

  /// Store `profile` as the signed-in user's current profile. Each save adds
  /// a new document; the newest one is current.
  pub async fn save_profile(&self, mut profile: UserProfile) -> Result<String> {
    profile.id = None;
    profile.user_id = self.user()?;
    profile.timestamp = Utc::now();
    Ok(self.records.save_user_profile(profile).await)
  }
}
