//! Who is using the companion right now.

use std::sync::{PoisonError, RwLock};

/// The host app's authentication provider.
pub trait Identity: Send + Sync {
  /// The stable id of the signed-in user, or `None` when signed out.
  fn current_user(&self) -> Option<String>;
}

/// An [`Identity`] the host app updates as the user signs in and out.
#[derive(Debug, Default)]
pub struct Session {
  user: RwLock<Option<String>>,
}

impl Session {
  pub fn signed_in(user_id: impl Into<String>) -> Self {
    Self { user: RwLock::new(Some(user_id.into())) }
  }

  pub fn sign_in(&self, user_id: impl Into<String>) {
    *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user_id.into());
  }

  pub fn sign_out(&self) { *self.user.write().unwrap_or_else(PoisonError::into_inner) = None; }
}

impl Identity for Session {
  fn current_user(&self) -> Option<String> {
    self
      .user
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
      .filter(|id| !id.trim().is_empty())
  }
}
