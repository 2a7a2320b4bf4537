use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::Recipe;

/// Where the current snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
    /// Bootstrap has not completed yet
    Pending,
    /// Loaded from persistent storage without a network call
    Persisted,
    /// Fetched from the remote catalog
    Remote,
    /// Built-in sample recipes after a failed fetch
    Fallback,
}

/// Immutable point-in-time value of all known recipes.
/// Clone is cheap - the recipe list is shared behind an Arc.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    recipes: Arc<Vec<Recipe>>,
    origin: SnapshotOrigin,
    adopted_at: DateTime<Utc>,
}

impl CacheSnapshot {
    pub fn new(recipes: Vec<Recipe>, origin: SnapshotOrigin) -> Self {
        Self {
            recipes: Arc::new(recipes),
            origin,
            adopted_at: Utc::now(),
        }
    }

    pub fn pending() -> Self {
        Self::new(Vec::new(), SnapshotOrigin::Pending)
    }

    pub fn recipes(&self) -> &Arc<Vec<Recipe>> {
        &self.recipes
    }

    pub fn origin(&self) -> SnapshotOrigin {
        self.origin
    }

    pub fn adopted_at(&self) -> DateTime<Utc> {
        self.adopted_at
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.adopted_at).num_minutes()
    }

    /// Human-readable age for status lines ("just now", "5m ago", "2h ago").
    pub fn age_display(&self) -> String {
        Self::format_age(self.age_minutes())
    }

    fn format_age(minutes: i64) -> String {
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_age_display_just_now() {
        let snapshot = CacheSnapshot::new(Vec::new(), SnapshotOrigin::Remote);
        assert_eq!(snapshot.age_display(), "just now");
    }

    #[test]
    fn test_age_display_rounding() {
        assert_eq!(CacheSnapshot::format_age(-3), "just now");
        assert_eq!(CacheSnapshot::format_age(45), "45m ago");
        assert_eq!(CacheSnapshot::format_age(89), "1h ago");
        assert_eq!(CacheSnapshot::format_age(90), "2h ago");
        assert_eq!(CacheSnapshot::format_age(1440 + 11 * 60), "1d ago");
        assert_eq!(CacheSnapshot::format_age(1440 + 12 * 60), "2d ago");
    }

    #[test]
    fn test_age_minutes() {
        let mut snapshot = CacheSnapshot::pending();
        snapshot.adopted_at = Utc::now() - Duration::minutes(61);
        assert_eq!(snapshot.age_display(), "1h ago");
        assert!(snapshot.age_minutes() >= 61);
    }
}
