//! The module node stored in the resolver's graph.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::graph::Node;
use crate::parser::Declaration;

/// A declared unit of source: an identifier plus what it requires.
///
/// Only the identifier matters to the graph. Packages and files ride along
/// for the report and for deriving a file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Module identifier (e.g., "forms", "grid")
    id: String,
    /// Identifiers this module depends on
    requires: BTreeSet<String>,
    /// Packages the declaring file(s) belong to
    packages: BTreeSet<String>,
    /// Files the module was declared in
    files: BTreeSet<PathBuf>,
}

impl Module {
    /// Creates a module with no requirements, packages, or files.
    ///
    /// # Example
    ///
    /// ```rust
    /// use assetdeps::graph::Node;
    /// use assetdeps::resolver::Module;
    ///
    /// let module = Module::new("forms").requiring(["reset", "grid"]);
    /// assert_eq!(module.id(), "forms");
    /// assert_eq!(module.requirements().len(), 2);
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            requires: BTreeSet::new(),
            packages: BTreeSet::new(),
            files: BTreeSet::new(),
        }
    }

    /// Creates the module `id` as declared by `decl`.
    ///
    /// Every module a file declares shares that file's requirements and
    /// packages.
    pub fn from_declaration(id: impl Into<String>, decl: &Declaration) -> Self {
        Self {
            id: id.into(),
            requires: decl.requires.iter().cloned().collect(),
            packages: decl.packages.iter().cloned().collect(),
            files: BTreeSet::from([decl.filename.clone()]),
        }
    }

    /// Adds requirements, returning the module.
    pub fn requiring<I>(mut self, requires: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.requires.extend(requires.into_iter().map(Into::into));
        self
    }

    /// Folds another declaration of the same module into this one.
    pub fn merge(&mut self, other: Module) {
        debug_assert_eq!(self.id, other.id);
        self.requires.extend(other.requires);
        self.packages.extend(other.packages);
        self.files.extend(other.files);
    }

    /// Identifiers this module depends on, sorted.
    pub fn requirements(&self) -> &BTreeSet<String> {
        &self.requires
    }

    /// Packages the module belongs to, sorted.
    pub fn packages(&self) -> &BTreeSet<String> {
        &self.packages
    }

    /// Files the module was declared in, sorted.
    pub fn files(&self) -> impl Iterator<Item = &Path> + '_ {
        self.files.iter().map(PathBuf::as_path)
    }
}

impl Node for Module {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if !self.requires.is_empty() {
            let requires: Vec<&str> = self.requires.iter().map(String::as_str).collect();
            write!(f, " (requires {})", requires.join(", "))?;
        }
        Ok(())
    }
}
