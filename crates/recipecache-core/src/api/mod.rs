//! Remote catalog client module.
//!
//! This module provides the `CatalogSource` trait that the cache and the
//! search pipeline fetch through, and `ApiClient`, its HTTP implementation
//! against the TheMealDB JSON API.
//!
//! A source either returns a raw payload or fails. An empty payload is a
//! legitimate "no matches" answer; callers decide how to degrade on failure.

pub mod client;
pub mod error;

use async_trait::async_trait;

use crate::models::{RawCategory, RawMeal, RawMealStub};

pub use client::ApiClient;
pub use error::ApiError;

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Free-text search by name. An empty query returns the full catalog.
    async fn search_by_text(&self, query: &str) -> Result<Vec<RawMeal>, ApiError>;

    /// Detail lookup by identifier. `Ok(None)` when the id is unknown.
    async fn get_by_id(&self, id: &str) -> Result<Option<RawMeal>, ApiError>;

    async fn list_categories(&self) -> Result<Vec<RawCategory>, ApiError>;

    /// Partial records for every meal in a category.
    async fn filter_by_category(&self, category: &str) -> Result<Vec<RawMealStub>, ApiError>;
}
