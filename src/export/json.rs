//! JSON export implementation.
//!
//! Exports the resolved build order in JSON format for machine-readable output.

use super::{ExportData, Exporter};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable module for JSON output.
#[derive(Serialize)]
struct JsonModule<'a> {
    id: &'a str,
    requires: &'a [String],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    packages: &'a [String],
    files: Vec<String>,
}

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    modules: usize,
    files: usize,
    edges: usize,
    packages: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonExport<'a> {
    root: String,
    summary: JsonSummary,
    build_order: Vec<&'a str>,
    file_order: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    packages: &'a BTreeMap<String, Vec<String>>,
    modules: Vec<JsonModule<'a>>,
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        let modules: Vec<JsonModule> = data
            .modules
            .iter()
            .map(|m| JsonModule {
                id: &m.id,
                requires: &m.requires,
                packages: &m.packages,
                files: m.files.iter().map(|f| f.display().to_string()).collect(),
            })
            .collect();

        let export = JsonExport {
            root: data.root.display().to_string(),
            summary: JsonSummary {
                modules: data.modules.len(),
                files: data.files.len(),
                edges: data.edge_count(),
                packages: data.packages.len(),
            },
            build_order: data.build_order().collect(),
            file_order: data.files.iter().map(|f| f.display().to_string()).collect(),
            packages: &data.packages,
            modules,
        };

        serde_json::to_writer_pretty(&mut *writer, &export)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_data;
    use crate::export::{export_to_string, ExportFormat};

    #[test]
    fn test_json_export_structure() {
        let output = export_to_string(ExportFormat::Json, &sample_data()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["root"], "assets");
        assert_eq!(value["summary"]["modules"], 3);
        assert_eq!(value["summary"]["edges"], 3);
        assert_eq!(
            value["build_order"],
            serde_json::json!(["reset", "grid", "forms"])
        );
        assert_eq!(value["file_order"][0], "assets/reset.css");
        assert_eq!(
            value["packages"]["site"],
            serde_json::json!(["reset", "grid", "forms"])
        );
        assert_eq!(
            value["modules"][2]["requires"],
            serde_json::json!(["grid", "reset"])
        );
    }

    #[test]
    fn test_json_omits_empty_packages() {
        let mut data = sample_data();
        data.packages.clear();
        for module in &mut data.modules {
            module.packages.clear();
        }

        let output = export_to_string(ExportFormat::Json, &data).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert!(value.get("packages").is_none());
        assert!(value["modules"][0].get("packages").is_none());
    }
}
