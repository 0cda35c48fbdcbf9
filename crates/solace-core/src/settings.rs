//! Runtime settings and the sources they are read from.
//!
//! Settings are never cached: every store and oracle call asks its
//! [`SettingsSource`] again, so credentials (and with them demo mode) can
//! change mid-session.

use std::{
  path::PathBuf,
  sync::{PoisonError, RwLock},
};

use serde::Deserialize;

use crate::Result;

// ─── Settings ────────────────────────────────────────────────────────────────

/// Credentials for the remote document store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
  pub api_key:    Option<String>,
  pub project_id: Option<String>,
  /// Override for the REST endpoint root; production leaves this unset.
  pub base_url:   Option<String>,
}

impl StoreSettings {
  /// `false` when the API key or project is missing or still a template
  /// placeholder. An unconfigured store puts the companion in demo mode.
  pub fn is_configured(&self) -> bool {
    is_real(self.api_key.as_deref()) && is_real(self.project_id.as_deref())
  }
}

/// Credentials for the generative-AI oracle.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OracleSettings {
  pub api_key:  Option<String>,
  pub model:    Option<String>,
  pub base_url: Option<String>,
}

impl OracleSettings {
  /// The API key, if one that is not a placeholder is set.
  pub fn api_key(&self) -> Option<&str> {
    self.api_key.as_deref().filter(|k| is_real(Some(k)))
  }
}

/// Credentials for the nearby-professionals lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapsSettings {
  pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
  #[serde(default)]
  pub store:  StoreSettings,
  #[serde(default)]
  pub oracle: OracleSettings,
  #[serde(default)]
  pub maps:   MapsSettings,
}

fn is_real(value: Option<&str>) -> bool {
  let Some(value) = value.map(str::trim) else {
    return false;
  };
  let lower = value.to_ascii_lowercase();
  !(lower.is_empty()
    || lower.starts_with("your-")
    || lower.starts_with("your_")
    || lower.starts_with("demo")
    || lower == "placeholder"
    || lower == "changeme")
}

// ─── Sources ─────────────────────────────────────────────────────────────────

/// Somewhere settings can be (re)loaded from.
pub trait SettingsSource: Send + Sync {
  fn load(&self) -> Result<Settings>;
}

/// An optional TOML file overlaid with `SOLACE_`-prefixed environment
/// variables (`SOLACE_STORE__API_KEY`, `SOLACE_ORACLE__API_KEY`, …).
#[derive(Debug, Clone, Default)]
pub struct LayeredSettings {
  pub path: Option<PathBuf>,
}

impl LayeredSettings {
  pub fn new(path: Option<PathBuf>) -> Self { Self { path } }
}

impl SettingsSource for LayeredSettings {
  fn load(&self) -> Result<Settings> {
    let mut builder = config::Config::builder();
    if let Some(path) = &self.path {
      builder = builder.add_source(config::File::from(path.clone()).required(false));
    }
    let settings = builder
      .add_source(
        config::Environment::with_prefix("SOLACE")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()?
      .try_deserialize()?;
    Ok(settings)
  }
}

/// Settings held in memory and swappable at runtime, for tests and for
/// embedding applications that manage configuration themselves.
#[derive(Debug, Default)]
pub struct StaticSettings {
  inner: RwLock<Settings>,
}

impl StaticSettings {
  pub fn new(settings: Settings) -> Self { Self { inner: RwLock::new(settings) } }

  /// Settings with no credentials at all: demo mode, oracle fallback.
  pub fn demo() -> Self { Self::default() }

  pub fn replace(&self, settings: Settings) {
    *self.inner.write().unwrap_or_else(PoisonError::into_inner) = settings;
  }
}

impl SettingsSource for StaticSettings {
  fn load(&self) -> Result<Settings> {
    Ok(self.inner.read().unwrap_or_else(PoisonError::into_inner).clone())
  }
}
