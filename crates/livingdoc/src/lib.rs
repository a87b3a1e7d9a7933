//! Livingdoc - PlantUML class diagrams from type annotations
//!
//! Types declare which diagrams they belong to and which notes they carry.
//! Livingdoc groups those scattered annotations into named diagrams, merges
//! per-diagram settings and renders each diagram as PlantUML source.
//!
//! # Quick Start
//!
//! ```rust
//! use livingdoc::render_manifest;
//!
//! let manifest = r#"{
//!     "types": [
//!         { "name": "com.example.Order", "diagramIds": ["orders", "overview"] },
//!         { "name": "com.example.Customer", "diagramIds": ["overview"] }
//!     ]
//! }"#;
//!
//! let diagrams = render_manifest(manifest).unwrap();
//! assert_eq!(diagrams.len(), 2);
//!
//! let (id, text) = &diagrams[0];
//! assert_eq!(id.as_str(), "overview");
//! assert!(text.contains("class com.example.Customer"));
//! assert!(text.contains("class com.example.Order"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use livingdoc::prelude::*;
//!
//! let records = vec![
//!     TypeAnnotationRecord::new(TypeReference::class("T1"), ["A", "B"]),
//!     TypeAnnotationRecord::new(TypeReference::class("T2"), ["B"]),
//! ];
//!
//! // Fan out and group by diagram
//! let groups = Aggregator::new().aggregate(&records).unwrap();
//! assert_eq!(groups.get(&DiagramId::new("B")).unwrap().len(), 2);
//!
//! // Package one diagram and render it
//! let settings = SettingsResolver::new()
//!     .resolve(&DiagramId::new("A"), &MemorySettings::new())
//!     .unwrap();
//! let members = groups.get(&DiagramId::new("A")).unwrap().to_vec();
//! let model = DiagramModelBuilder::assemble(DiagramId::new("A"), members, settings);
//! let text = PlantUmlRenderer::new().render(&model).unwrap();
//! assert!(text.starts_with("@startuml"));
//! ```

pub mod core;
pub mod plugins;

use std::path::Path;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Aggregator, AnnotationPayload, DiagramError, DiagramGroups, DiagramId, DiagramModel,
        DiagramModelBuilder, DiagramRenderer, DiagramSettings, FailurePolicy, FannedRecord,
        GeneratorConfig, MetadataSource, Note, NotePosition, OutputSink, SettingsResolver,
        SettingsSource, TypeAnnotationRecord, TypeKind, TypeReference,
    };
    pub use crate::plugins::{
        DirectorySettings, DirectorySink, ManifestSource, MemorySettings, MemorySink, Pipeline,
        PlantUmlRenderer, RunReport, StaticSource,
    };
}

/// Generate every diagram described by a manifest file
///
/// Settings are read from `config.settings_dir`, diagrams are written to
/// `config.out_dir`, and per-diagram failures follow `config.failure_policy`.
///
/// # Example
/// ```rust,no_run
/// use livingdoc::{generate, GeneratorConfig};
///
/// let report = generate("types.json", &GeneratorConfig::default()).unwrap();
/// for diagram in &report.written {
///     println!("{}", diagram.path.display());
/// }
/// ```
pub fn generate(
    manifest: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> anyhow::Result<plugins::RunReport> {
    use crate::plugins::{DirectorySettings, DirectorySink, ManifestSource, Pipeline};

    let source = ManifestSource::from_path(manifest.as_ref());
    let settings = DirectorySettings::new(&config.settings_dir);
    let mut sink = DirectorySink::new(&config.out_dir);

    let pipeline = Pipeline::with_plantuml().with_failure_policy(config.failure_policy);
    Ok(pipeline.run(&source, &settings, &mut sink)?)
}

/// Render every diagram of a JSON manifest in memory with default settings
///
/// Returns `(id, text)` pairs in diagram order.
pub fn render_manifest(json: &str) -> anyhow::Result<Vec<(DiagramId, String)>> {
    use crate::plugins::{ManifestSource, MemorySettings, MemorySink, Pipeline};

    let source = ManifestSource::from_json(json);
    let mut sink = MemorySink::new();
    Pipeline::with_plantuml().run(&source, &MemorySettings::new(), &mut sink)?;
    Ok(sink.into_outputs().into_iter().collect())
}
