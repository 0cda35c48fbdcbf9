//! Firestore REST backend for the Solace record store.
//!
//! Each record kind maps to one collection. Credentials are read from the
//! injected [`SettingsSource`](solace_core::settings::SettingsSource) on every
//! call, so a store built while unconfigured starts working as soon as
//! credentials appear.

mod encode;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{DEFAULT_BASE_URL, FirestoreStore};
