//! Durable key/value storage for cached state.
//!
//! This module provides the `KeyValueStore` trait plus two implementations:
//! - `FileStore`: one JSON file per key in a data directory
//! - `MemoryStore`: process-local map for sessions without durable storage
//!
//! Every operation may fail (disk full, permissions, disabled storage).
//! Callers log the failure and carry on with in-memory state.

pub mod file;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Persisted snapshot of all known recipes
pub const RECIPE_CACHE_KEY: &str = "recipe_cache";

/// Persisted favorites set
pub const FAVORITES_KEY: &str = "favorite_recipes";

/// Persisted search history, most recent first
pub const SEARCH_HISTORY_KEY: &str = "search_history";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize stored value: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value)?;
    store.set(key, &bytes)
}
