//! Plain-text export implementation.
//!
//! Line-oriented output meant to be piped into `cat`, `xargs`, or a
//! compiler's include list.

use super::{ExportData, Exporter};
use std::io::{self, Write};

/// Writes one module identifier per line, in build order.
pub struct ModuleListExporter;

/// Writes one source file path per line, in build order.
pub struct FileListExporter;

impl Exporter for ModuleListExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        for id in data.build_order() {
            writeln!(writer, "{}", id)?;
        }
        Ok(())
    }
}

impl Exporter for FileListExporter {
    fn export<W: Write>(&self, data: &ExportData, writer: &mut W) -> io::Result<()> {
        for file in &data.files {
            writeln!(writer, "{}", file.display())?;
        }
        Ok(())
    }
}
