//! Resolver configuration.

use std::path::{Path, PathBuf};

/// Extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["css", "js"];

/// Settings for a [`DependencyResolver`](super::DependencyResolver) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Directory walked for source files
    pub source_root: PathBuf,
    /// File extensions (without the dot) that are scanned
    pub extensions: Vec<String>,
    /// Merge repeated declarations of a module instead of rejecting them
    pub merge_duplicates: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("src"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            merge_duplicates: false,
        }
    }
}

impl ResolverConfig {
    /// Creates a config for `source_root` with the default extensions.
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            ..Self::default()
        }
    }

    /// Replaces the scanned extensions. A leading dot is accepted and dropped.
    pub fn with_extensions<I>(mut self, extensions: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    /// Sets whether repeated declarations of a module are merged.
    pub fn with_merge_duplicates(mut self, merge: bool) -> Self {
        self.merge_duplicates = merge;
        self
    }

    /// Returns true if `path` has one of the scanned extensions.
    ///
    /// Matching is case-sensitive: `site.CSS` is not a stylesheet.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.source_root, PathBuf::from("src"));
        assert_eq!(config.extensions, ["css", "js"]);
        assert!(!config.merge_duplicates);
    }

    #[test]
    fn test_matches_default_extensions() {
        let config = ResolverConfig::new("assets");
        assert!(config.matches(Path::new("assets/css/forms.css")));
        assert!(config.matches(Path::new("assets/js/app.js")));
        assert!(!config.matches(Path::new("assets/img/logo.png")));
        assert!(!config.matches(Path::new("assets/README")));
        assert!(!config.matches(Path::new("assets/site.CSS")));
    }

    #[test]
    fn test_with_extensions_strips_dots() {
        let config = ResolverConfig::new("assets").with_extensions([".scss", "ts", ""]);
        assert_eq!(config.extensions, ["scss", "ts"]);
        assert!(config.matches(Path::new("x.scss")));
        assert!(!config.matches(Path::new("x.css")));
    }
}
