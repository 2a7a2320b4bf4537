use crate::models::Recipe;
use crate::utils::{cmp_ignore_case, contains_ignore_case};

/// Filter selection meaning "no filter"
const ALL_OPTION: &str = "All";

/// Ordering applied to a result set after matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Source order (cache order or catalog order)
    #[default]
    Relevance,
    Name,
    Category,
    /// Cuisine
    Area,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::Relevance,
        SortOrder::Name,
        SortOrder::Category,
        SortOrder::Area,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Relevance => "Relevance",
            SortOrder::Name => "Name (A-Z)",
            SortOrder::Category => "Category",
            SortOrder::Area => "Cuisine",
        }
    }

    /// Parse a user-facing key ("relevance", "name", "category", "area").
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "relevance" => Some(SortOrder::Relevance),
            "name" => Some(SortOrder::Name),
            "category" => Some(SortOrder::Category),
            "area" | "cuisine" => Some(SortOrder::Area),
            _ => None,
        }
    }
}

/// Exact, case-insensitive narrowing by category and/or area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchFilters {
    pub category: Option<String>,
    pub area: Option<String>,
}

impl SearchFilters {
    /// Build filters from UI selections, where "All" or blank means unset.
    pub fn from_selection(category: &str, area: &str) -> Self {
        let pick = |value: &str| {
            let value = value.trim();
            if value.is_empty() || value.eq_ignore_ascii_case(ALL_OPTION) {
                None
            } else {
                Some(value.to_string())
            }
        };
        Self {
            category: pick(category),
            area: pick(area),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.area.is_none()
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let category_ok = self
            .category
            .as_ref()
            .map(|c| recipe.category.eq_ignore_ascii_case(c))
            .unwrap_or(true);
        let area_ok = self
            .area
            .as_ref()
            .map(|a| recipe.area.eq_ignore_ascii_case(a))
            .unwrap_or(true);
        category_ok && area_ok
    }
}

/// One search as issued by the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchRequest {
    pub text: String,
    pub filters: SearchFilters,
    pub sort: SortOrder,
}

impl SearchRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Whitespace around the text is not significant for matching or for
    /// deciding whether a request repeats the previous one.
    pub fn normalized(mut self) -> Self {
        let trimmed = self.text.trim();
        if trimmed.len() != self.text.len() {
            self.text = trimmed.to_string();
        }
        self
    }

    /// Blank text means "show everything".
    pub fn is_idle(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Whether refinement would leave a result set untouched.
    pub fn is_unrefined(&self) -> bool {
        self.filters.is_empty() && self.sort == SortOrder::Relevance
    }
}

impl From<&str> for SearchRequest {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SearchRequest {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Check if a recipe matches the search query on name, category or area.
/// Query should already be lowercased.
pub fn matches_query(recipe: &Recipe, query: &str) -> bool {
    contains_ignore_case(&recipe.name, query)
        || contains_ignore_case(&recipe.category, query)
        || contains_ignore_case(&recipe.area, query)
}

/// Recipes matching `query`, in their original order.
pub fn filter_recipes(recipes: &[Recipe], query: &str) -> Vec<Recipe> {
    let query = query.trim().to_lowercase();
    recipes
        .iter()
        .filter(|r| matches_query(r, &query))
        .cloned()
        .collect()
}

/// Apply filters, then a stable sort.
pub fn refine(mut recipes: Vec<Recipe>, filters: &SearchFilters, sort: SortOrder) -> Vec<Recipe> {
    if !filters.is_empty() {
        recipes.retain(|r| filters.matches(r));
    }

    match sort {
        SortOrder::Relevance => {}
        SortOrder::Name => recipes.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name)),
        SortOrder::Category => recipes.sort_by(|a, b| cmp_ignore_case(&a.category, &b.category)),
        SortOrder::Area => recipes.sort_by(|a, b| cmp_ignore_case(&a.area, &b.area)),
    }
    recipes
}
