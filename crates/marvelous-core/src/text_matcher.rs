use crate::Task;

/// Case-insensitive substring matcher for task content.
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for empty input.
    ///
    /// Whitespace is significant: a query of `" "` only matches content containing a space.
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(Self {
            needle: query.to_lowercase(),
        })
    }

    /// Determine whether the task content contains the query.
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.content)
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}
