//! Export functionality for resolution results.
//!
//! This module provides exporters for writing a resolved build order in
//! various formats: plain module lists, file lists, and JSON.

pub mod json;
pub mod text;

use crate::graph::Node;
use crate::resolver::Resolution;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// One module identifier per line, in build order
    #[default]
    Text,
    /// One source file per line, in build order
    Files,
    /// JSON format - machine-readable, full data
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ExportFormat::Text),
            "files" => Ok(ExportFormat::Files),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: text, files, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Files => write!(f, "files"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// One module as it appears in an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    pub id: String,
    pub requires: Vec<String>,
    pub packages: Vec<String>,
    pub files: Vec<PathBuf>,
}

/// Data container for export operations.
///
/// Holds everything an exporter needs, detached from the graph.
#[derive(Debug, Clone)]
pub struct ExportData {
    /// Source root that was scanned
    pub root: PathBuf,
    /// Modules in build order
    pub modules: Vec<ModuleEntry>,
    /// Source files in build order
    pub files: Vec<PathBuf>,
    /// Module identifiers per package, in build order
    pub packages: BTreeMap<String, Vec<String>>,
}

impl ExportData {
    /// Create export data from a resolution.
    pub fn new(resolution: &Resolution) -> Self {
        let modules = resolution
            .build_order()
            .into_iter()
            .map(|m| ModuleEntry {
                id: m.id().clone(),
                requires: m.requirements().iter().cloned().collect(),
                packages: m.packages().iter().cloned().collect(),
                files: m.files().map(|p| p.to_path_buf()).collect(),
            })
            .collect();

        let packages = resolution
            .packages()
            .into_iter()
            .map(|(name, ids)| {
                (
                    name.to_string(),
                    ids.into_iter().map(str::to_string).collect::<Vec<_>>(),
                )
            })
            .collect();

        Self {
            root: resolution.root().to_path_buf(),
            modules,
            files: resolution
                .file_order()
                .into_iter()
                .map(|p| p.to_path_buf())
                .collect(),
            packages,
        }
    }

    /// Module identifiers in build order.
    pub fn build_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.modules.iter().map(|m| m.id.as_str())
    }

    /// Total number of requirement edges.
    pub fn edge_count(&self) -> usize {
        self.modules.iter().map(|m| m.requires.len()).sum()
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(
    format: ExportFormat,
    data: &ExportData,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Text => text::ModuleListExporter.export(data, writer),
        ExportFormat::Files => text::FileListExporter.export(data, writer),
        ExportFormat::Json => json::JsonExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ExportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// `reset` <- `grid` <- `forms`, all in package `site`.
    pub(crate) fn sample_data() -> ExportData {
        let entry = |id: &str, requires: &[&str], file: &str| ModuleEntry {
            id: id.to_string(),
            requires: requires.iter().map(|r| r.to_string()).collect(),
            packages: vec!["site".to_string()],
            files: vec![PathBuf::from(file)],
        };

        ExportData {
            root: PathBuf::from("assets"),
            modules: vec![
                entry("reset", &[], "assets/reset.css"),
                entry("grid", &["reset"], "assets/grid.css"),
                entry("forms", &["grid", "reset"], "assets/forms.css"),
            ],
            files: vec![
                PathBuf::from("assets/reset.css"),
                PathBuf::from("assets/grid.css"),
                PathBuf::from("assets/forms.css"),
            ],
            packages: BTreeMap::from([(
                "site".to_string(),
                vec!["reset".to_string(), "grid".to_string(), "forms".to_string()],
            )]),
        }
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("TXT".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("files".parse::<ExportFormat>().unwrap(), ExportFormat::Files);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("markdown".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(format!("{}", ExportFormat::Text), "text");
        assert_eq!(format!("{}", ExportFormat::Files), "files");
        assert_eq!(format!("{}", ExportFormat::Json), "json");
    }

    #[test]
    fn test_export_data_counts() {
        let data = sample_data();
        assert_eq!(data.build_order().collect::<Vec<_>>(), ["reset", "grid", "forms"]);
        assert_eq!(data.edge_count(), 3);
    }
}
