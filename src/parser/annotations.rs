//! Extractor for doc-comment annotations in stylesheets and scripts.
//!
//! A source file declares itself inside `/** ... */` blocks:
//!
//! ```text
//! /**
//!  * @package  site
//!  * @module   forms
//!  * @requires reset, grid
//!  */
//! ```
//!
//! Lines are matched one at a time. A block opens on a line that starts with
//! `/**` and closes on the first line containing `*/`; neither of those lines
//! is searched for tags.

use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::debug;

use super::types::{Declaration, Tag};

/// Errors that can occur while extracting annotations.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to read the file from disk.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A built-in pattern failed to compile.
    #[error("Failed to compile annotation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Source of per-file module declarations.
///
/// The resolver only depends on this trait, so declarations can come from
/// anywhere: annotation blocks, a manifest, or a test fixture.
pub trait MetadataExtractor {
    /// Produces the declaration record for the file at `path`.
    fn extract(&self, path: &Path) -> ParseResult<Declaration>;
}

/// Regex-based extractor for `@package` / `@module` / `@requires` blocks.
#[derive(Debug, Clone)]
pub struct AnnotationExtractor {
    block_open: Regex,
    block_close: Regex,
    tag: Regex,
    separator: Regex,
}

impl AnnotationExtractor {
    /// Create a new extractor, compiling its patterns once.
    pub fn new() -> ParseResult<Self> {
        Ok(Self {
            block_open: Regex::new(r"^\s*/\*\*")?,
            block_close: Regex::new(r"\*/")?,
            tag: Regex::new(r"@(?P<name>\w+)\s+(?P<value>.+)\s*$")?,
            separator: Regex::new(r"\s*,\s*")?,
        })
    }

    /// Extract annotations from in-memory source text.
    ///
    /// # Example
    ///
    /// ```
    /// use assetdeps::parser::AnnotationExtractor;
    ///
    /// let source = "/**\n * @module forms\n * @requires reset, grid\n */\n.form {}\n";
    /// let extractor = AnnotationExtractor::new().unwrap();
    /// let decl = extractor.extract_str("forms.css", source);
    ///
    /// assert_eq!(decl.modules, ["forms"]);
    /// assert_eq!(decl.requires, ["reset", "grid"]);
    /// ```
    pub fn extract_str(&self, path: impl AsRef<Path>, content: &str) -> Declaration {
        let mut decl = Declaration::new(path.as_ref());
        let mut in_block = false;

        for line in content.lines() {
            if !in_block {
                in_block = self.block_open.is_match(line);
                continue;
            }

            if self.block_close.is_match(line) {
                in_block = false;
                continue;
            }

            let Some(caps) = self.tag.captures(line) else {
                continue;
            };
            let Some(tag) = Tag::from_name(&caps["name"]) else {
                continue;
            };

            let values = self
                .separator
                .split(&caps["value"])
                .map(str::trim)
                .filter(|v| !v.is_empty());
            decl.extend(tag, values);
        }

        debug!(
            file = %decl.filename.display(),
            packages = ?decl.packages,
            modules = ?decl.modules,
            requires = ?decl.requires,
            "extracted annotations"
        );
        decl
    }
}

impl MetadataExtractor for AnnotationExtractor {
    fn extract(&self, path: &Path) -> ParseResult<Declaration> {
        debug!(file = %path.display(), "scanning file");
        let bytes = fs::read(path).map_err(|source| ParseError::Io {
            path: path.display().to_string(),
            source,
        })?;
        // Tags are ASCII; stray legacy bytes elsewhere in the file are replaced.
        Ok(self.extract_str(path, &String::from_utf8_lossy(&bytes)))
    }
}
