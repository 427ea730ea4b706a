// src/tree/exclude.rs
// =============================================================================
// Decides which entries are repository infrastructure and stay hidden.
//
// Matching is by exact NAME (never by path) and is case-sensitive, so
// ".github" is hidden while ".GitHub" is not. The same filter is applied at
// every directory level the browser looks at.
// =============================================================================

use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    names: HashSet<String>,
}

impl ExclusionFilter {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// True iff `name` is exactly one of the configured names.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl From<&HashSet<String>> for ExclusionFilter {
    fn from(names: &HashSet<String>) -> Self {
        Self::new(names.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXCLUDES;

    #[test]
    fn test_every_configured_name_is_excluded() {
        let filter = ExclusionFilter::new(DEFAULT_EXCLUDES.iter().copied());
        for name in DEFAULT_EXCLUDES {
            assert!(filter.is_excluded(name), "{} should be excluded", name);
        }
    }

    #[test]
    fn test_other_names_pass() {
        let filter = ExclusionFilter::new(DEFAULT_EXCLUDES.iter().copied());
        for name in ["Flames", "Embers", "README.md", "github", ".githubx", ""] {
            assert!(!filter.is_excluded(name), "{} should pass", name);
        }
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let filter = ExclusionFilter::new([".github", "node_modules"]);
        assert!(!filter.is_excluded(".GitHub"));
        assert!(!filter.is_excluded("Node_Modules"));
    }

    #[test]
    fn test_matching_is_by_name_not_path() {
        let filter = ExclusionFilter::new(["node_modules"]);
        assert!(!filter.is_excluded("web/node_modules"));
    }
}
