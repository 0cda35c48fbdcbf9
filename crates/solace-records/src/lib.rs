//! The record adapter: one stable persistence API over two interchangeable
//! backends.
//!
//! Each call picks a [`StorageMode`] from the current settings. Remote calls
//! are bounded by [`REMOTE_TIMEOUT`]; a remote error or timeout is logged and
//! the same operation is replayed against the in-memory store, so callers
//! always get a result.

mod adapter;

pub use adapter::{REMOTE_TIMEOUT, RecordAdapter, StorageMode};
