//! Conversion from raw catalog records into canonical models.
//!
//! The catalog is loosely typed: any field may be `null`, ingredients are
//! spread over twenty numbered field pairs, and list endpoints return partial
//! records. Missing values fall back to safe sentinels instead of failing the
//! whole record; only a record without an id is dropped.

use serde_json::Value;
use tracing::warn;

use crate::models::{Ingredient, RawCategory, RawMeal, RawMealStub, Recipe, RecipeCategory};

/// Number of numbered ingredient/measure slots on a raw meal
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// Measure used when the catalog leaves it blank
pub const DEFAULT_MEASURE: &str = "to taste";

/// Sentinel for a missing category or area
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for a missing recipe name
pub const UNTITLED: &str = "Untitled";

/// Category images live at a predictable path when the catalog omits them
const CATEGORY_IMAGE_BASE: &str = "https://www.themealdb.com/images/category";

/// Trimmed, non-blank value or `None`.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn or_default(value: Option<&str>, default: &str) -> String {
    non_blank(value).unwrap_or_else(|| default.to_string())
}

/// Collect the numbered ingredient pairs, skipping blank names.
pub fn extract_ingredients(meal: &RawMeal) -> Vec<Ingredient> {
    (1..=MAX_INGREDIENT_SLOTS)
        .filter_map(|n| {
            let name = non_blank(meal.ingredient(n))?;
            let measure = or_default(meal.measure(n), DEFAULT_MEASURE);
            Some(Ingredient { name, measure })
        })
        .collect()
}

/// Normalize a full meal record. Returns `None` when the record has no id.
pub fn normalize_meal(meal: &RawMeal) -> Option<Recipe> {
    let Some(id) = non_blank(meal.id.as_deref()) else {
        warn!(name = ?meal.name, "Dropping catalog record without an id");
        return None;
    };

    Some(Recipe {
        id,
        name: or_default(meal.name.as_deref(), UNTITLED),
        category: or_default(meal.category.as_deref(), UNKNOWN),
        area: or_default(meal.area.as_deref(), UNKNOWN),
        instructions: non_blank(meal.instructions.as_deref()).unwrap_or_default(),
        image: non_blank(meal.thumbnail.as_deref()).unwrap_or_default(),
        tags: non_blank(meal.tags.as_deref()),
        youtube: non_blank(meal.youtube.as_deref()),
        ingredients: extract_ingredients(meal),
        source: non_blank(meal.source.as_deref()),
        is_favorite: false,
    })
}

pub fn normalize_meals(meals: &[RawMeal]) -> Vec<Recipe> {
    meals.iter().filter_map(normalize_meal).collect()
}

/// Normalize a `filter.php` stub. The filter endpoint carries no area,
/// instructions or ingredients, so those stay empty until hydrated.
pub fn normalize_stub(stub: &RawMealStub, category: &str) -> Option<Recipe> {
    let Some(id) = non_blank(stub.id.as_deref()) else {
        warn!(name = ?stub.name, "Dropping category stub without an id");
        return None;
    };

    Some(Recipe {
        id,
        name: or_default(stub.name.as_deref(), UNTITLED),
        category: category.to_string(),
        area: UNKNOWN.to_string(),
        instructions: String::new(),
        image: non_blank(stub.thumbnail.as_deref()).unwrap_or_default(),
        tags: None,
        youtube: None,
        ingredients: Vec::new(),
        source: None,
        is_favorite: false,
    })
}

pub fn normalize_category(raw: &RawCategory) -> Option<RecipeCategory> {
    let name = non_blank(raw.name.as_deref())?;
    let image = non_blank(raw.thumbnail.as_deref())
        .unwrap_or_else(|| format!("{}/{}.png", CATEGORY_IMAGE_BASE, name));
    let description = non_blank(raw.description.as_deref()).unwrap_or_default();
    Some(RecipeCategory::new(name, image, description))
}

impl From<&Recipe> for RawMeal {
    /// Re-encode a canonical recipe in the catalog's wire shape.
    fn from(recipe: &Recipe) -> Self {
        let mut fields = serde_json::Map::new();
        for (i, ingredient) in recipe.ingredients.iter().take(MAX_INGREDIENT_SLOTS).enumerate() {
            let n = i + 1;
            fields.insert(
                format!("strIngredient{}", n),
                Value::String(ingredient.name.clone()),
            );
            fields.insert(
                format!("strMeasure{}", n),
                Value::String(ingredient.measure.clone()),
            );
        }

        RawMeal {
            id: Some(recipe.id.clone()),
            name: Some(recipe.name.clone()),
            category: Some(recipe.category.clone()),
            area: Some(recipe.area.clone()),
            instructions: Some(recipe.instructions.clone()),
            thumbnail: Some(recipe.image.clone()),
            tags: recipe.tags.clone(),
            youtube: recipe.youtube.clone(),
            source: recipe.source.clone(),
            fields,
        }
    }
}
