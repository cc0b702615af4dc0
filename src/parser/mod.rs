//! Parser module for asset annotations.
//!
//! This module extracts module declarations from the doc-comment blocks at
//! the top of stylesheets and scripts.
//!
//! # Supported Tags
//!
//! - **@package** - bundle name(s) the file belongs to
//! - **@module** - identifiers the file declares
//! - **@requires** - identifiers the declared modules depend on
//!
//! Values are comma-separated and may span several tags.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use assetdeps::parser::{AnnotationExtractor, MetadataExtractor};
//!
//! let extractor = AnnotationExtractor::new()?;
//! let decl = extractor.extract(Path::new("src/css/forms.css"))?;
//!
//! for module in &decl.modules {
//!     println!("{} requires {:?}", module, decl.requires);
//! }
//! ```

pub mod annotations;
pub mod types;

// Re-export commonly used types for convenience
pub use annotations::{AnnotationExtractor, MetadataExtractor, ParseError, ParseResult};
pub use types::{Declaration, Tag};
