//! Response structures from the remote recipe catalog.
//!
//! Every field is optional: the catalog returns `null` for missing values and
//! whole lists may be `null` when nothing matches.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope for `search.php`, `lookup.php` and `filter.php`.
#[derive(Debug, Clone, Deserialize)]
pub struct MealsResponse<T> {
    #[serde(default)]
    pub meals: Option<Vec<T>>,
}

impl<T> MealsResponse<T> {
    /// A `null` list means no matches, not an error.
    pub fn into_meals(self) -> Vec<T> {
        self.meals.unwrap_or_default()
    }
}

/// Envelope for `categories.php`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub categories: Option<Vec<RawCategory>>,
}

/// A full meal record. Numbered ingredient/measure pairs
/// (`strIngredient1`..`strIngredient20`, `strMeasure1`..`strMeasure20`)
/// are kept in `fields` and read back by the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMeal {
    #[serde(rename = "idMeal", default)]
    pub id: Option<String>,
    #[serde(rename = "strMeal", default)]
    pub name: Option<String>,
    #[serde(rename = "strCategory", default)]
    pub category: Option<String>,
    #[serde(rename = "strArea", default)]
    pub area: Option<String>,
    #[serde(rename = "strInstructions", default)]
    pub instructions: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "strTags", default)]
    pub tags: Option<String>,
    #[serde(rename = "strYoutube", default)]
    pub youtube: Option<String>,
    #[serde(rename = "strSource", default)]
    pub source: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawMeal {
    /// Ingredient name for the 1-based slot `n`.
    pub fn ingredient(&self, n: usize) -> Option<&str> {
        self.field(&format!("strIngredient{}", n))
    }

    /// Measure for the 1-based slot `n`.
    pub fn measure(&self, n: usize) -> Option<&str> {
        self.field(&format!("strMeasure{}", n))
    }

    fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Partial record returned by `filter.php`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMealStub {
    #[serde(rename = "idMeal", default)]
    pub id: Option<String>,
    #[serde(rename = "strMeal", default)]
    pub name: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(rename = "strCategory", default)]
    pub name: Option<String>,
    #[serde(rename = "strCategoryThumb", default)]
    pub thumbnail: Option<String>,
    #[serde(rename = "strCategoryDescription", default)]
    pub description: Option<String>,
}
