//! Line-oriented command parsing for the interactive prompt.
//!
//! Anything that does not start with `:` is search text.

use recipecache_core::SortOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: feed the search pipeline
    Search(String),
    Show(String),
    Favorite(String),
    Favorites,
    History,
    ClearHistory,
    ClearFavorites,
    Categories,
    Category { name: String, hydrate: bool },
    Filter { category: String, area: String },
    Sort(SortOrder),
    Home,
    Refresh,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
Type to search. Commands:
  :show <id>                 full recipe
  :fav <id>                  toggle favorite
  :favs                      list favorites
  :clear-favs                remove all favorites
  :history                   recent searches
  :clear-history             forget recent searches
  :categories                list categories
  :category <name> [--full]  browse a category (--full fetches details)
  :filter <category> [area]  narrow results (\"All\" clears)
  :sort <relevance|name|category|area>
  :home                      featured recipes
  :refresh                   refetch the catalog
  :status                    cache status
  :quit";

/// Parse one input line. `Err` carries a message for the user.
pub fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.trim_start().strip_prefix(':') else {
        return Ok(Command::Search(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let single_arg = |what: &str| -> Result<String, String> {
        match args.as_slice() {
            [arg] => Ok(arg.to_string()),
            _ => Err(format!("usage: :{} <{}>", name, what)),
        }
    };

    match name {
        "show" => single_arg("id").map(Command::Show),
        "fav" => single_arg("id").map(Command::Favorite),
        "favs" => Ok(Command::Favorites),
        "history" => Ok(Command::History),
        "clear-history" => Ok(Command::ClearHistory),
        "clear-favs" => Ok(Command::ClearFavorites),
        "categories" => Ok(Command::Categories),
        "category" => {
            let hydrate = args.contains(&"--full");
            let words: Vec<&str> = args.iter().copied().filter(|a| *a != "--full").collect();
            if words.is_empty() {
                return Err("usage: :category <name> [--full]".to_string());
            }
            Ok(Command::Category {
                name: words.join(" "),
                hydrate,
            })
        }
        "filter" => match args.as_slice() {
            [category] => Ok(Command::Filter {
                category: category.to_string(),
                area: "All".to_string(),
            }),
            [category, area] => Ok(Command::Filter {
                category: category.to_string(),
                area: area.to_string(),
            }),
            _ => Err("usage: :filter <category> [area]".to_string()),
        },
        "sort" => {
            let key = single_arg("order")?;
            SortOrder::from_key(&key)
                .map(Command::Sort)
                .ok_or_else(|| format!("unknown sort order: {}", key))
        }
        "home" => Ok(Command::Home),
        "refresh" => Ok(Command::Refresh),
        "status" => Ok(Command::Status),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        "" => Err("empty command, try :help".to_string()),
        other => Err(format!("unknown command :{}, try :help", other)),
    }
}
