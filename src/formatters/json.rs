use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::core::model::Analysis;

/// Serializes the analysis bundle with stable field names and ordering.
///
/// This is the boundary contract: every vector in `Analysis` is already
/// deterministically sorted, so identical input produces byte-identical
/// output and reports diff cleanly across runs.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn format(&self, analysis: &Analysis) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(analysis)?
        } else {
            serde_json::to_string(analysis)?
        };
        Ok(json)
    }

    pub fn format_to_file(&self, analysis: &Analysis, output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format(analysis)?)?;
        Ok(())
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}
