//! Data models for recipe catalog entities.
//!
//! This module contains the canonical types the rest of the crate works with:
//!
//! - `Recipe`, `Ingredient`: normalized recipe records
//! - `RecipeCategory`: category metadata shown on the home view
//! - Raw API shapes (`RawMeal`, `RawMealStub`, `RawCategory`) as returned by
//!   the remote catalog, before normalization

pub mod category;
pub mod raw;
pub mod recipe;

pub use category::RecipeCategory;
pub use raw::{CategoriesResponse, MealsResponse, RawCategory, RawMeal, RawMealStub};
pub use recipe::{Ingredient, Recipe};
