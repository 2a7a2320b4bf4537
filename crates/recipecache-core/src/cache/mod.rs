//! Recipe cache module.
//!
//! This module provides the `RecipeCache`, which owns the working set of
//! recipes for a session. The set is bootstrapped once from persistent
//! storage, or from a full catalog fetch when storage is empty, and is
//! published to readers as an immutable `CacheSnapshot`.
//!
//! Remote failures never leave the cache empty: the built-in fallback recipes
//! are adopted instead (and deliberately not persisted).

pub mod manager;
pub mod snapshot;

pub use manager::RecipeCache;
pub use snapshot::{CacheSnapshot, SnapshotOrigin};
