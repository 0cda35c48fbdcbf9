//! In-memory backend for the Solace record store.
//!
//! Holds one ordered collection per record kind for the lifetime of the
//! process. It is the store of record in demo mode and the emergency
//! fallback whenever the remote store cannot be reached.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::{MemoryStore, generate_id};
