//! RecipeCache - a terminal front end for browsing and searching recipes.
//!
//! Reads commands and search text from stdin, one per line. Search results
//! are printed as the pipeline publishes them.

mod commands;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use recipecache_core::utils::truncate;
use recipecache_core::{
    App, Config, Recipe, SearchFilters, SearchRequest, SearchState, SearchStatus, SortOrder,
    FEATURED_COUNT,
};

use commands::{parse, Command, HELP};

// ============================================================================
// Constants
// ============================================================================

/// Width of the name column in result listings
const NAME_WIDTH: usize = 40;

/// Log file name prefix inside `<data dir>/logs`
const LOG_FILE_PREFIX: &str = "recipecache.log";

/// Initialize the tracing subscriber for logging.
///
/// Logs go to a daily file under the data directory so they do not interleave
/// with the prompt. Use RUST_LOG to control the level (e.g. RUST_LOG=debug).
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match config.data_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join("logs"), LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config, using defaults: {}", e);
            let mut config = Config::default();
            config.apply_env_overrides(|key| std::env::var(key).ok());
            config
        }
    };

    let _log_guard = init_tracing(&config);
    info!("RecipeCache starting");

    let app = Arc::new(App::new(&config).context("Failed to start recipe session")?);

    let snapshot = app.initialize().await;
    println!(
        "{} recipes loaded ({:?}, {}). Type to search, :help for commands.",
        snapshot.len(),
        snapshot.origin(),
        snapshot.age_display()
    );
    print_recipes(&app.featured(FEATURED_COUNT));

    let printer = tokio::spawn(print_results(app.clone()));
    let result = run_prompt(&app).await;
    printer.abort();

    if let Err(ref e) = result {
        eprintln!("Error: {}", e);
    }

    info!("RecipeCache shutting down");
    result
}

/// Current search refinement, applied to every query typed at the prompt.
#[derive(Default)]
struct PromptState {
    text: String,
    filters: SearchFilters,
    sort: SortOrder,
}

impl PromptState {
    fn request(&self) -> SearchRequest {
        SearchRequest::new(self.text.clone())
            .with_filters(self.filters.clone())
            .with_sort(self.sort)
    }
}

async fn run_prompt(app: &App) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut prompt = PromptState::default();

    while let Some(line) = lines.next_line().await? {
        let command = match parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            Command::Search(text) => {
                prompt.text = text;
                app.search(prompt.request());
            }
            Command::Filter { category, area } => {
                prompt.filters = SearchFilters::from_selection(&category, &area);
                app.search(prompt.request());
            }
            Command::Sort(order) => {
                prompt.sort = order;
                println!("Sorting by {}", order.label());
                app.search(prompt.request());
            }
            Command::Show(id) => match app.lookup_by_id(&id).await {
                Some(recipe) => print_detail(&recipe),
                None => println!("No recipe with id {}", id),
            },
            Command::Favorite(id) => match app.lookup_by_id(&id).await {
                Some(recipe) => {
                    if app.toggle_favorite(&recipe) {
                        println!("Added {} to favorites", recipe.name);
                    } else {
                        println!("Removed {} from favorites", recipe.name);
                    }
                }
                None => println!("No recipe with id {}", id),
            },
            Command::Favorites => {
                let favorites = app.favorites();
                if favorites.is_empty() {
                    println!("No favorites yet");
                } else {
                    print_recipes(&favorites);
                }
            }
            Command::ClearFavorites => {
                app.clear_favorites();
                println!("Favorites cleared");
            }
            Command::History => {
                let history = app.search_history();
                if history.is_empty() {
                    println!("No recent searches");
                }
                for (i, query) in history.iter().enumerate() {
                    println!("  {}. {}", i + 1, query);
                }
            }
            Command::ClearHistory => {
                app.clear_search_history();
                println!("Search history cleared");
            }
            Command::Categories => {
                for category in app.categories().await {
                    println!(
                        "  {:<16} {}",
                        category.name(),
                        truncate(category.description(), 60)
                    );
                }
            }
            Command::Category { name, hydrate } => {
                let recipes = app.browse_category(&name, hydrate).await;
                if recipes.is_empty() {
                    println!("Nothing in {}", name);
                } else {
                    print_recipes(&recipes);
                }
            }
            Command::Home => print_recipes(&app.featured(FEATURED_COUNT)),
            Command::Refresh => match app.refresh().await {
                Ok(snapshot) => println!("Catalog refreshed: {} recipes", snapshot.len()),
                Err(e) => {
                    warn!(error = %e, "Manual refresh failed");
                    println!("Refresh failed, keeping current recipes: {}", e);
                }
            },
            Command::Status => {
                let snapshot = app.snapshot();
                println!(
                    "{} recipes ({:?}, {}), {} favorites",
                    snapshot.len(),
                    snapshot.origin(),
                    snapshot.age_display(),
                    app.favorites().len()
                );
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    Ok(())
}

/// Print every settled search result as the pipeline publishes it.
async fn print_results(app: Arc<App>) {
    let mut rx = app.subscribe_results();
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        print_state(&app.with_favorites(state));
    }
}

fn print_state(state: &SearchState) {
    match state.status {
        SearchStatus::Loading => println!("Searching for \"{}\"...", state.query),
        SearchStatus::Idle => {
            println!("All recipes ({})", state.recipes.len());
        }
        SearchStatus::Ready => {
            println!("{} results for \"{}\"", state.recipes.len(), state.query);
            print_recipes(&state.recipes);
        }
        SearchStatus::NoResults if state.is_unavailable() => {
            println!(
                "Couldn't reach the recipe catalog for \"{}\". Check your connection.",
                state.query
            );
        }
        SearchStatus::NoResults => println!("No recipes match \"{}\"", state.query),
    }
}

fn print_recipes(recipes: &[Recipe]) {
    for recipe in recipes {
        let star = if recipe.is_favorite { "*" } else { " " };
        println!(
            "{} {:>6}  {:<width$}  {} / {}",
            star,
            recipe.id,
            truncate(&recipe.name, NAME_WIDTH),
            recipe.category,
            recipe.area,
            width = NAME_WIDTH
        );
    }
}

fn print_detail(recipe: &Recipe) {
    let star = if recipe.is_favorite { " *" } else { "" };
    println!("{}{}", recipe.name, star);
    println!("{} / {}", recipe.category, recipe.area);

    let tags = recipe.tag_list();
    if !tags.is_empty() {
        println!("Tags: {}", tags.join(", "));
    }

    if !recipe.ingredients.is_empty() {
        println!("\nIngredients:");
        for ingredient in &recipe.ingredients {
            println!("  - {} {}", ingredient.measure, ingredient.name);
        }
    }

    let steps = recipe.instruction_steps();
    if !steps.is_empty() {
        println!("\nInstructions:");
        for (i, step) in steps.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }

    if let Some(url) = recipe.youtube_embed_url() {
        println!("\nVideo: {}", url);
    }
    if let Some(ref source) = recipe.source {
        println!("Source: {}", source);
    }
}
