//! Shared types for annotation parsing.
//!
//! This module defines the record extracted from a single source file and
//! the annotation tags that feed it.

use std::fmt;
use std::path::{Path, PathBuf};

/// The annotation tags the extractor records.
///
/// Any other `@tag` inside an annotation block (`@author`, `@license`, ...)
/// is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `@package`: the bundle(s) the file belongs to.
    Package,
    /// `@module`: identifiers the file declares.
    Module,
    /// `@requires`: identifiers the file's modules depend on.
    Requires,
}

impl Tag {
    /// Looks up a tag by its name as written after `@`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "package" => Some(Tag::Package),
            "module" => Some(Tag::Module),
            "requires" => Some(Tag::Requires),
            _ => None,
        }
    }

    /// Returns the tag name as written after `@`.
    pub fn name(&self) -> &'static str {
        match self {
            Tag::Package => "package",
            Tag::Module => "module",
            Tag::Requires => "requires",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

/// Everything a single file declares in its annotation blocks.
///
/// Values keep the order they were written in; repeated tags accumulate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    /// The file the annotations were read from.
    pub filename: PathBuf,

    /// Package names from `@package` tags.
    pub packages: Vec<String>,

    /// Module identifiers from `@module` tags.
    pub modules: Vec<String>,

    /// Required identifiers from `@requires` tags.
    pub requires: Vec<String>,
}

impl Declaration {
    /// Creates an empty declaration for `filename`.
    pub fn new(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: filename.into(),
            ..Self::default()
        }
    }

    /// The file the annotations were read from.
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Appends values to the list a tag feeds.
    pub fn extend<I>(&mut self, tag: Tag, values: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let target = match tag {
            Tag::Package => &mut self.packages,
            Tag::Module => &mut self.modules,
            Tag::Requires => &mut self.requires,
        };
        target.extend(values.into_iter().map(Into::into));
    }

    /// Returns true if the file declares at least one module.
    pub fn declares_modules(&self) -> bool {
        !self.modules.is_empty()
    }
}
