//! Dependency resolution over a tree of annotated assets.
//!
//! The resolver walks a source directory, asks a [`MetadataExtractor`] what
//! each file declares, turns every declared module into a [`Module`] node,
//! and hands the nodes and their requirements to a [`Dag`]. The graph rejects
//! duplicates, dangling requirements, and cycles as they are inserted.
//!
//! # Example
//!
//! ```ignore
//! use assetdeps::resolver::{DependencyResolver, ResolverConfig};
//!
//! let resolver = DependencyResolver::new(ResolverConfig::new("src"))?;
//! let resolution = resolver.scan()?;
//!
//! for module in resolution.build_order() {
//!     println!("{}", module);
//! }
//! ```

mod config;
mod module;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::graph::{Dag, GraphError, Node};
use crate::parser::{AnnotationExtractor, Declaration, MetadataExtractor, ParseError};

pub use config::{ResolverConfig, DEFAULT_EXTENSIONS};
pub use module::Module;

/// Errors that can occur while resolving a source tree.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Module `{module}` requires `{requirement}`, which is not declared anywhere")]
    UnknownRequirement { module: String, requirement: String },

    #[error(transparent)]
    Graph(#[from] GraphError<Module>),
}

/// Result type for resolver operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Walks a source tree and builds its module graph.
#[derive(Debug)]
pub struct DependencyResolver<E = AnnotationExtractor> {
    config: ResolverConfig,
    extractor: E,
}

impl DependencyResolver<AnnotationExtractor> {
    /// Create a resolver that reads doc-comment annotations.
    pub fn new(config: ResolverConfig) -> ResolveResult<Self> {
        Ok(Self::with_extractor(config, AnnotationExtractor::new()?))
    }
}

impl<E: MetadataExtractor> DependencyResolver<E> {
    /// Create a resolver with a custom metadata extractor.
    pub fn with_extractor(config: ResolverConfig, extractor: E) -> Self {
        debug!(?config, "creating dependency resolver");
        Self { config, extractor }
    }

    /// The configuration this resolver runs with.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Lists the files to scan, sorted by path within each directory.
    pub fn discover(&self) -> ResolveResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.config.source_root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && self.config.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Extracts the declaration of every discovered file.
    pub fn declarations(&self) -> ResolveResult<Vec<Declaration>> {
        let mut declarations = Vec::new();

        for path in self.discover()? {
            let decl = self.extractor.extract(&path)?;
            if !decl.declares_modules() {
                if !decl.requires.is_empty() || !decl.packages.is_empty() {
                    warn!(
                        file = %path.display(),
                        "file has annotations but declares no @module; skipping"
                    );
                }
                continue;
            }
            declarations.push(decl);
        }

        Ok(declarations)
    }

    /// Walks the tree and builds the module graph.
    ///
    /// # Errors
    ///
    /// Fails on the first walk or read error, on a module declared twice
    /// (unless merging is enabled), on a requirement naming an undeclared
    /// module, and on a requirement cycle.
    pub fn scan(&self) -> ResolveResult<Resolution> {
        let declarations = self.declarations()?;
        let files_scanned = declarations.len();
        let modules = collect_modules(&declarations, self.config.merge_duplicates);
        let graph = build_graph(modules)?;

        info!(
            root = %self.config.source_root.display(),
            files = files_scanned,
            modules = graph.node_count(),
            edges = graph.edge_count(),
            "resolved module graph"
        );

        Ok(Resolution {
            root: self.config.source_root.clone(),
            graph,
            files_scanned,
        })
    }
}

/// Turns declarations into one module per declared identifier.
///
/// With `merge` set, repeated identifiers are folded into the first module
/// with that identifier. Otherwise they are kept, and the graph reports them
/// as duplicates on insertion.
pub fn collect_modules(declarations: &[Declaration], merge: bool) -> Vec<Module> {
    let mut modules: Vec<Module> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for decl in declarations {
        for id in &decl.modules {
            let module = Module::from_declaration(id.as_str(), decl);
            if merge {
                if let Some(&pos) = positions.get(id.as_str()) {
                    debug!(module = %id, file = %decl.filename.display(), "merging declaration");
                    modules[pos].merge(module);
                    continue;
                }
                positions.insert(id.as_str(), modules.len());
            }
            modules.push(module);
        }
    }

    modules
}

/// Inserts every module, then every requirement edge.
///
/// Edges are added module by module in insertion order, each module's
/// requirements in sorted order, so the same input always fails on the same
/// edge.
pub fn build_graph(modules: Vec<Module>) -> ResolveResult<Dag<Module>> {
    let requirements: Vec<(String, Vec<String>)> = modules
        .iter()
        .map(|m| (m.id().clone(), m.requirements().iter().cloned().collect()))
        .collect();
    let edge_hint = requirements.iter().map(|(_, reqs)| reqs.len()).sum();

    let mut graph = Dag::with_capacity(modules.len(), edge_hint);
    graph.add_nodes(modules)?;

    for (id, reqs) in &requirements {
        graph
            .add_edges_from_node(id.as_str(), reqs.iter().map(String::as_str))
            .map_err(|err| match err {
                GraphError::NodeNotExists(requirement) => ResolveError::UnknownRequirement {
                    module: id.clone(),
                    requirement,
                },
                other => ResolveError::Graph(other),
            })?;
    }

    Ok(graph)
}

/// The outcome of a successful scan.
#[derive(Debug)]
pub struct Resolution {
    root: PathBuf,
    graph: Dag<Module>,
    files_scanned: usize,
}

impl Resolution {
    /// The source root that was scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The module graph.
    pub fn graph(&self) -> &Dag<Module> {
        &self.graph
    }

    /// Number of files that declared at least one module.
    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    /// Modules with every dependency ahead of its dependents.
    pub fn build_order(&self) -> Vec<&Module> {
        self.graph
            .topological_sort()
            .filter_map(|id| self.graph.get(id))
            .collect()
    }

    /// Source files in the order a concatenation step should read them.
    ///
    /// Each file appears once, at the position of the first module it
    /// declares in [`build_order`](Self::build_order).
    pub fn file_order(&self) -> Vec<&Path> {
        let mut seen = HashSet::new();
        self.build_order()
            .into_iter()
            .flat_map(Module::files)
            .filter(|path| seen.insert(*path))
            .collect()
    }

    /// Module identifiers grouped by package, each group in build order.
    pub fn packages(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut packages: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for module in self.build_order() {
            for package in module.packages() {
                packages
                    .entry(package.as_str())
                    .or_default()
                    .push(module.id().as_str());
            }
        }
        packages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{ParseResult, Tag};

    /// Extractor serving canned declarations keyed by file name.
    struct Fixture(HashMap<String, Declaration>);

    impl MetadataExtractor for Fixture {
        fn extract(&self, path: &Path) -> ParseResult<Declaration> {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            Ok(self
                .0
                .get(name)
                .cloned()
                .map(|mut decl| {
                    decl.filename = path.to_path_buf();
                    decl
                })
                .unwrap_or_else(|| Declaration::new(path)))
        }
    }

    fn decl(file: &str, modules: &[&str], requires: &[&str]) -> Declaration {
        let mut decl = Declaration::new(file);
        decl.extend(Tag::Module, modules.iter().copied());
        decl.extend(Tag::Requires, requires.iter().copied());
        decl
    }

    fn ids(order: &[&Module]) -> Vec<String> {
        order.iter().map(|m| m.id().clone()).collect()
    }

    #[test]
    fn test_build_graph_orders_dependencies_first() {
        let modules = vec![
            Module::new("app").requiring(["forms", "grid"]),
            Module::new("forms").requiring(["reset"]),
            Module::new("grid").requiring(["reset"]),
            Module::new("reset"),
        ];
        let graph = build_graph(modules).unwrap();

        let order: Vec<&String> = graph.topological_sort().collect();
        assert_eq!(order, ["reset", "forms", "grid", "app"]);
    }

    #[test]
    fn test_build_graph_duplicate_module() {
        let modules = vec![Module::new("forms"), Module::new("forms")];
        let err = build_graph(modules).unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Graph(GraphError::DuplicateInsertion(ref m)) if m.id() == "forms"
        ));
    }

    #[test]
    fn test_build_graph_unknown_requirement() {
        let modules = vec![Module::new("forms").requiring(["ghost"])];
        let err = build_graph(modules).unwrap_err();

        match err {
            ResolveError::UnknownRequirement {
                module,
                requirement,
            } => {
                assert_eq!(module, "forms");
                assert_eq!(requirement, "ghost");
            }
            other => panic!("expected unknown requirement, got {other:?}"),
        }
    }

    #[test]
    fn test_build_graph_cycle() {
        let modules = vec![
            Module::new("a").requiring(["b"]),
            Module::new("b").requiring(["c"]),
            Module::new("c").requiring(["a"]),
        ];
        let err = build_graph(modules).unwrap_err();

        match err {
            ResolveError::Graph(GraphError::CyclicInsertion(cycle)) => {
                assert_eq!(cycle.path(), ["c", "a", "b", "c"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_collect_modules_strict_keeps_duplicates() {
        let decls = vec![
            decl("a.css", &["forms"], &["reset"]),
            decl("b.css", &["forms"], &["grid"]),
        ];
        let modules = collect_modules(&decls, false);
        assert_eq!(modules.len(), 2);
    }

    #[test]
    fn test_collect_modules_merge() {
        let decls = vec![
            decl("a.css", &["forms"], &["reset"]),
            decl("b.js", &["forms"], &["events"]),
            decl("c.css", &["reset"], &[]),
        ];
        let modules = collect_modules(&decls, true);

        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].id(), "forms");
        assert_eq!(modules[0].requirements().len(), 2);
        assert_eq!(modules[0].files().count(), 2);
    }

    #[test]
    fn test_collect_modules_multiple_per_file() {
        let decls = vec![decl("bundle.js", &["events", "ajax"], &["core"])];
        let modules = collect_modules(&decls, false);

        assert_eq!(modules.len(), 2);
        assert!(modules.iter().all(|m| m.requirements().contains("core")));
    }

    #[test]
    fn test_scan_with_fixture_extractor() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["app.js", "reset.css", "grid.css", "notes.txt"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let fixture = Fixture(HashMap::from([
            ("app.js".to_string(), decl("app.js", &["app"], &["grid"])),
            ("grid.css".to_string(), decl("grid.css", &["grid"], &["reset"])),
            ("reset.css".to_string(), decl("reset.css", &["reset"], &[])),
            ("notes.txt".to_string(), decl("notes.txt", &["notes"], &[])),
        ]));
        let resolver =
            DependencyResolver::with_extractor(ResolverConfig::new(dir.path()), fixture);

        let resolution = resolver.scan().unwrap();
        assert_eq!(resolution.files_scanned(), 3);
        assert!(!resolution.graph().contains("notes"));
        assert_eq!(ids(&resolution.build_order()), ["reset", "grid", "app"]);

        let files: Vec<PathBuf> = resolution
            .file_order()
            .into_iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            files,
            [
                PathBuf::from("reset.css"),
                PathBuf::from("grid.css"),
                PathBuf::from("app.js"),
            ]
        );
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        for name in ["b.css", "a.js", "sub/c.css", "logo.png"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let resolver = DependencyResolver::new(ResolverConfig::new(dir.path())).unwrap();
        let found: Vec<PathBuf> = resolver
            .discover()
            .unwrap()
            .into_iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            found,
            [
                PathBuf::from("a.js"),
                PathBuf::from("b.css"),
                PathBuf::from("sub/c.css"),
            ]
        );
    }

    #[test]
    fn test_discover_missing_root() {
        let resolver =
            DependencyResolver::new(ResolverConfig::new("/nonexistent/assetdeps-root")).unwrap();
        assert!(matches!(resolver.discover(), Err(ResolveError::Walk(_))));
    }

    #[test]
    fn test_packages_grouped_in_build_order() {
        let mut forms = decl("forms.css", &["forms"], &["reset"]);
        forms.extend(Tag::Package, ["site", "admin"]);
        let mut reset = decl("reset.css", &["reset"], &[]);
        reset.extend(Tag::Package, ["site"]);

        let graph = build_graph(collect_modules(&[forms, reset], false)).unwrap();
        let resolution = Resolution {
            root: PathBuf::from("."),
            graph,
            files_scanned: 2,
        };

        let packages = resolution.packages();
        assert_eq!(packages["site"], ["reset", "forms"]);
        assert_eq!(packages["admin"], ["forms"]);
    }
}
