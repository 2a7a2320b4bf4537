//! In-process test doubles shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{ApiError, CatalogSource};
use crate::models::{Ingredient, RawCategory, RawMeal, RawMealStub, Recipe};
use crate::storage::{KeyValueStore, StoreError};

pub fn recipe(id: &str, name: &str, category: &str, area: &str) -> Recipe {
    Recipe {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        area: area.to_string(),
        instructions: format!("Cook the {}.", name.to_lowercase()),
        image: format!("https://example.com/{}.jpg", id),
        tags: None,
        youtube: None,
        ingredients: vec![Ingredient::new("Salt", "1 tsp")],
        source: None,
        is_favorite: false,
    }
}

/// Catalog fake that records every call and can delay or fail on demand.
#[derive(Default)]
pub struct FakeCatalog {
    catalog: Vec<Recipe>,
    searches: HashMap<String, Vec<Recipe>>,
    delays: HashMap<String, Duration>,
    details: HashMap<String, Recipe>,
    by_category: HashMap<String, Vec<RawMealStub>>,
    categories: Vec<RawCategory>,
    failing: AtomicBool,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records returned for the full-catalog (empty query) search.
    pub fn with_catalog(mut self, recipes: Vec<Recipe>) -> Self {
        for r in &recipes {
            self.details.insert(r.id.clone(), r.clone());
        }
        self.catalog = recipes;
        self
    }

    pub fn with_search(mut self, query: &str, recipes: Vec<Recipe>) -> Self {
        self.searches.insert(query.to_string(), recipes);
        self
    }

    /// Delay applied before answering a search for `query`.
    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn with_detail(mut self, recipe: Recipe) -> Self {
        self.details.insert(recipe.id.clone(), recipe);
        self
    }

    pub fn with_category(mut self, category: &str, stubs: Vec<RawMealStub>) -> Self {
        self.by_category.insert(category.to_string(), stubs);
        self
    }

    pub fn with_categories(mut self, categories: Vec<RawCategory>) -> Self {
        self.categories = categories;
        self
    }

    pub fn failing(self) -> Self {
        self.set_failing(true);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| c.strip_prefix("search:").map(str::to_string))
            .collect()
    }

    fn record(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.load(Ordering::SeqCst) {
            Err(ApiError::ServerError("catalog offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn search_by_text(&self, query: &str) -> Result<Vec<RawMeal>, ApiError> {
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        self.record(format!("search:{}", query))?;

        let recipes = if query.is_empty() {
            &self.catalog
        } else {
            match self.searches.get(query) {
                Some(recipes) => recipes,
                None => return Ok(Vec::new()),
            }
        };
        Ok(recipes.iter().map(RawMeal::from).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<RawMeal>, ApiError> {
        self.record(format!("lookup:{}", id))?;
        Ok(self.details.get(id).map(RawMeal::from))
    }

    async fn list_categories(&self) -> Result<Vec<RawCategory>, ApiError> {
        self.record("categories".to_string())?;
        Ok(self.categories.clone())
    }

    async fn filter_by_category(&self, category: &str) -> Result<Vec<RawMealStub>, ApiError> {
        self.record(format!("filter:{}", category))?;
        Ok(self.by_category.get(category).cloned().unwrap_or_default())
    }
}

/// Store whose every operation fails, like a browser with storage disabled.
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }
}
