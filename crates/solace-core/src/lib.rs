//! Core types and trait definitions for the Solace wellness companion.
//!
//! This crate is deliberately free of HTTP and storage-backend dependencies.
//! The record backends, the record adapter and the oracle client all depend
//! on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod document;
pub mod error;
pub mod record;
pub mod sentiment;
pub mod settings;
pub mod store;
pub mod trend;

pub use error::{Error, Result};
