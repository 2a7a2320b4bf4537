use serde::{Deserialize, Serialize};

/// Embed URL prefix for YouTube videos
const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// A normalized recipe record.
///
/// `id` is never empty for a record that made it into the cache. The
/// `is_favorite` flag is a display overlay only; membership is owned by
/// [`crate::favorites::FavoritesStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Cuisine / area of origin
    pub area: String,
    pub instructions: String,
    /// Thumbnail image URL
    pub image: String,
    /// Comma-separated tag list as delivered by the catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// External video link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Original source URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Ingredient {
    pub name: String,
    pub measure: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, measure: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            measure: measure.into(),
        }
    }
}

impl Recipe {
    /// True for category stubs that still need a detail lookup.
    pub fn is_partial(&self) -> bool {
        self.instructions.is_empty() && self.ingredients.is_empty()
    }

    /// Tags split on commas, trimmed, empty entries dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Instructions broken into sentences for step-by-step display.
    pub fn instruction_steps(&self) -> Vec<&str> {
        self.instructions
            .split('.')
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .collect()
    }

    /// Extract the video id from `youtube.com/watch?v=` or `youtu.be/` links.
    pub fn youtube_video_id(&self) -> Option<&str> {
        let url = self.youtube.as_deref()?;
        let rest = ["youtube.com/watch?v=", "youtu.be/"]
            .iter()
            .find_map(|marker| url.find(marker).map(|pos| &url[pos + marker.len()..]))?;

        let end = rest
            .find(|c| matches!(c, '&' | '?' | '#' | '\n'))
            .unwrap_or(rest.len());
        let id = &rest[..end];
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }

    pub fn youtube_embed_url(&self) -> Option<String> {
        self.youtube_video_id()
            .map(|id| format!("{}{}", YOUTUBE_EMBED_BASE, id))
    }

    /// Short blurb used when sharing a recipe link.
    pub fn share_text(&self) -> String {
        format!("Check out this {} recipe: {}", self.category, self.name)
    }
}
