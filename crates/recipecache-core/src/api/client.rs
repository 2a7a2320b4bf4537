//! API client for the TheMealDB recipe catalog.
//!
//! This module provides the `ApiClient` struct, the HTTP implementation of
//! [`CatalogSource`]. Responses are read as text and parsed separately so a
//! body that does not fit the expected envelope surfaces as
//! `ApiError::MalformedPayload` rather than a generic network error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{CategoriesResponse, MealsResponse, RawCategory, RawMeal, RawMealStub};

use super::{ApiError, CatalogSource};

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the public catalog API
pub const DEFAULT_API_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the recipe catalog.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client against the public catalog with the default timeout
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_API_BASE_URL, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!(url = %url, ?query, "Catalog request");

        let response = self.client.get(&url).query(query).send().await?;
        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl CatalogSource for ApiClient {
    async fn search_by_text(&self, query: &str) -> Result<Vec<RawMeal>, ApiError> {
        let response: MealsResponse<RawMeal> = self.get("search.php", &[("s", query)]).await?;
        Ok(response.into_meals())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<RawMeal>, ApiError> {
        let response: MealsResponse<RawMeal> = self.get("lookup.php", &[("i", id)]).await?;
        Ok(response.into_meals().into_iter().next())
    }

    async fn list_categories(&self) -> Result<Vec<RawCategory>, ApiError> {
        let response: CategoriesResponse = self.get("categories.php", &[]).await?;
        Ok(response.categories.unwrap_or_default())
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<RawMealStub>, ApiError> {
        let response: MealsResponse<RawMealStub> =
            self.get("filter.php", &[("c", category)]).await?;
        Ok(response.into_meals())
    }
}
