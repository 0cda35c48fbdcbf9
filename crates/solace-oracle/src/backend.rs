//! The seam between [`Oracle`](crate::Oracle) and a concrete model API.

use std::future::Future;

use solace_core::record::Role;

use crate::Result;

/// One role-tagged turn of the conversation sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
  pub role: Role,
  pub text: String,
}

impl Turn {
  pub fn user(text: impl Into<String>) -> Self { Self { role: Role::User, text: text.into() } }

  pub fn assistant(text: impl Into<String>) -> Self {
    Self { role: Role::Assistant, text: text.into() }
  }
}

/// A single text-generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
  pub system:            String,
  pub turns:             Vec<Turn>,
  pub temperature:       f32,
  pub max_output_tokens: u32,
  /// Ask the model for a JSON document instead of prose.
  pub json:              bool,
}

/// A text-generation API.
pub trait GenerativeBackend: Send + Sync {
  /// Generate text for `request`. An empty answer is an error.
  fn generate(&self, request: GenerateRequest) -> impl Future<Output = Result<String>> + Send + '_;
}
