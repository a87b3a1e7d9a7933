//! Core renderer and output traits
//!
//! A renderer turns one [`DiagramModel`] into diagram text; an output sink
//! stores that text under a location derived from the diagram id.

use std::path::PathBuf;

use anyhow::Result;

use super::error::DiagramError;
use super::model::DiagramModel;
use super::types::DiagramId;

/// File extension of generated diagram sources
pub const OUTPUT_EXTENSION: &str = "puml";

/// Name of the generated artifact for a diagram: `{id}_class.puml`
pub fn output_file_name(id: &DiagramId) -> String {
    format!("{}.{}", id.file_stem(), OUTPUT_EXTENSION)
}

/// Turns a diagram model into diagram source text
///
/// Implementations must be deterministic: the same model always renders to
/// the same text.
pub trait DiagramRenderer {
    fn render(&self, model: &DiagramModel) -> Result<String>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "renderer"
    }
}

/// Stores rendered diagram text
pub trait OutputSink {
    /// Write the text for a diagram, returning where it was stored
    fn write(&mut self, id: &DiagramId, contents: &str) -> Result<PathBuf, DiagramError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name(&DiagramId::new("domain")), "domain_class.puml");
    }
}
