//! Built-in data used when the remote catalog cannot be reached.
//!
//! These records are never persisted, so a later successful fetch can still
//! populate storage.

use crate::models::{Ingredient, Recipe, RecipeCategory};

#[allow(clippy::too_many_arguments)]
fn recipe(
    id: &str,
    name: &str,
    category: &str,
    area: &str,
    instructions: &str,
    image: &str,
    ingredients: &[(&str, &str)],
    tags: &str,
    youtube: &str,
) -> Recipe {
    Recipe {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        area: area.to_string(),
        instructions: instructions.to_string(),
        image: image.to_string(),
        tags: Some(tags.to_string()),
        youtube: Some(youtube.to_string()),
        ingredients: ingredients
            .iter()
            .map(|(name, measure)| Ingredient::new(*name, *measure))
            .collect(),
        source: None,
        is_favorite: false,
    }
}

/// The three sample recipes shown when bootstrap fails.
pub fn fallback_recipes() -> Vec<Recipe> {
    vec![
        recipe(
            "1",
            "Spaghetti Carbonara",
            "Italian",
            "Italy",
            "Cook pasta according to package directions. Meanwhile, cook bacon until crisp. \
             Remove bacon and drain on paper towels. In a large bowl, whisk eggs and cheese. \
             Add hot pasta to egg mixture and toss quickly. Add bacon and season with pepper.",
            "https://www.themealdb.com/images/media/meals/utxwpy1511385814.jpg",
            &[
                ("Spaghetti", "400g"),
                ("Bacon", "200g"),
                ("Eggs", "4"),
                ("Parmesan Cheese", "100g"),
                ("Black Pepper", "to taste"),
            ],
            "Pasta,Italian",
            "https://www.youtube.com/watch?v=3AqK8-8yH7k",
        ),
        recipe(
            "2",
            "Chicken Tikka Masala",
            "Indian",
            "India",
            "Marinate chicken in yogurt and spices for 2 hours. Grill or pan-fry until cooked. \
             Make sauce with tomatoes, cream, and spices. Add chicken and simmer for 15 minutes. \
             Serve with rice or naan.",
            "https://www.themealdb.com/images/media/meals/x0lk9i1583459407.jpg",
            &[
                ("Chicken Breast", "500g"),
                ("Yogurt", "200ml"),
                ("Tomatoes", "400g"),
                ("Heavy Cream", "200ml"),
                ("Garam Masala", "2 tbsp"),
            ],
            "Curry,Indian,Chicken",
            "https://www.youtube.com/watch?v=QK2_kUIH-i8",
        ),
        recipe(
            "3",
            "Chocolate Lava Cake",
            "Dessert",
            "French",
            "Melt chocolate and butter. Whisk eggs and sugar. Combine all ingredients. \
             Pour into greased ramekins. Bake at 425°F for 12-14 minutes. \
             Serve immediately with ice cream.",
            "https://www.themealdb.com/images/media/meals/tqtyx1468307752.jpg",
            &[
                ("Dark Chocolate", "200g"),
                ("Butter", "200g"),
                ("Eggs", "4"),
                ("Sugar", "100g"),
                ("Flour", "50g"),
            ],
            "Dessert,Chocolate,French",
            "https://www.youtube.com/watch?v=VvVH_3Z2Q9M",
        ),
    ]
}

pub fn fallback_recipe(id: &str) -> Option<Recipe> {
    fallback_recipes().into_iter().find(|r| r.id == id)
}

pub fn fallback_by_category(category: &str) -> Vec<Recipe> {
    fallback_recipes()
        .into_iter()
        .filter(|r| r.category.eq_ignore_ascii_case(category))
        .collect()
}

pub fn fallback_categories() -> Vec<RecipeCategory> {
    vec![
        RecipeCategory::new(
            "Italian",
            "https://www.themealdb.com/images/category/italian.png",
            "Italian cuisine features simple, fresh ingredients with emphasis on quality over quantity.",
        ),
        RecipeCategory::new(
            "Indian",
            "https://www.themealdb.com/images/category/indian.png",
            "Indian cuisine is known for its diverse flavors, spices, and regional variations.",
        ),
        RecipeCategory::new(
            "Dessert",
            "https://www.themealdb.com/images/category/dessert.png",
            "Sweet treats to satisfy your cravings after a delicious meal.",
        ),
    ]
}
