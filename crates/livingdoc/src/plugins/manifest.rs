//! JSON manifest metadata source
//!
//! A manifest lists annotated types and their diagram annotations:
//!
//! ```json
//! {
//!   "types": [
//!     {
//!       "name": "com.example.Order",
//!       "kind": "class",
//!       "diagramIds": ["orders", "overview"],
//!       "stereotype": "entity",
//!       "notes": ["Aggregate root", { "text": "Immutable", "position": "top" }]
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tracing::{debug, span, Level};

use crate::core::{
    AnnotationPayload, MetadataSource, Note, NotePosition, TypeAnnotationRecord, TypeKind,
    TypeReference,
};

/// Top-level manifest document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub types: Vec<ManifestType>,
}

/// One annotated type
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ManifestType {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    pub diagram_ids: Vec<String>,
    #[serde(default)]
    pub stereotype: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub notes: Vec<ManifestNote>,
}

/// A note, either bare text or text with a position
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ManifestNote {
    Text(String),
    Placed {
        text: String,
        #[serde(default)]
        position: NotePosition,
    },
}

impl From<ManifestNote> for Note {
    fn from(note: ManifestNote) -> Self {
        match note {
            ManifestNote::Text(text) => Note::new(text),
            ManifestNote::Placed { text, position } => Note::new(text).with_position(position),
        }
    }
}

impl From<ManifestType> for TypeAnnotationRecord {
    fn from(entry: ManifestType) -> Self {
        let mut payload = AnnotationPayload::new();
        if let Some(stereotype) = entry.stereotype {
            payload = payload.with_stereotype(stereotype);
        }
        let payload = entry
            .attributes
            .into_iter()
            .fold(payload, |payload, (key, value)| payload.with_attribute(key, value));
        TypeAnnotationRecord::new(TypeReference::new(entry.name, entry.kind), entry.diagram_ids)
            .with_payload(payload)
            .with_notes(entry.notes.into_iter().map(Note::from))
    }
}

impl Manifest {
    /// Parse a manifest from JSON text
    ///
    /// The document must be a JSON object; serde would otherwise accept the
    /// sequence form of the struct.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text).context("Invalid manifest")?;
        ensure!(
            value.is_object(),
            "Invalid manifest: expected a JSON object with a \"types\" array"
        );
        serde_json::from_value(value).context("Invalid manifest")
    }

    pub fn into_records(self) -> Vec<TypeAnnotationRecord> {
        self.types.into_iter().map(TypeAnnotationRecord::from).collect()
    }
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Inline(String),
}

/// Reads annotation records from a JSON manifest
#[derive(Debug, Clone)]
pub struct ManifestSource {
    location: Location,
}

impl ManifestSource {
    /// Manifest stored in a file, read on every discovery
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
        }
    }

    /// Manifest given as JSON text
    pub fn from_json(text: impl Into<String>) -> Self {
        Self {
            location: Location::Inline(text.into()),
        }
    }

    fn load(&self) -> Result<Manifest> {
        match &self.location {
            Location::File(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read manifest '{}'", path.display()))?;
                Manifest::from_json(&text)
                    .with_context(|| format!("Failed to load manifest '{}'", path.display()))
            }
            Location::Inline(text) => Manifest::from_json(text),
        }
    }
}

impl MetadataSource for ManifestSource {
    fn discover(&self) -> Result<Vec<TypeAnnotationRecord>> {
        let discover_span = span!(Level::DEBUG, "discover_manifest");
        let _enter = discover_span.enter();

        let manifest = self.load()?;
        debug!(types = manifest.types.len(), "Manifest loaded");
        Ok(manifest.into_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DiagramId;

    #[test]
    fn test_parse_full_entry() {
        let source = ManifestSource::from_json(
            r##"{
                "types": [{
                    "name": "com.example.Order",
                    "kind": "abstract-class",
                    "diagramIds": ["orders", "overview", "orders"],
                    "stereotype": "entity",
                    "attributes": {"color": "#eee"},
                    "notes": ["Plain", {"text": "Placed", "position": "top"}]
                }]
            }"##,
        );

        let records = source.discover().unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.type_ref().qualified_name(), "com.example.Order");
        assert_eq!(record.type_ref().kind(), TypeKind::AbstractClass);
        let ids: Vec<_> = record.diagram_ids().iter().map(DiagramId::as_str).collect();
        assert_eq!(ids, vec!["orders", "overview"]);
        assert_eq!(record.payload().stereotype.as_deref(), Some("entity"));
        assert_eq!(record.payload().attributes.get("color").map(String::as_str), Some("#eee"));
        assert_eq!(
            record.notes(),
            [
                Note::new("Plain"),
                Note::new("Placed").with_position(NotePosition::Top)
            ]
        );
    }

    #[test]
    fn test_defaults() {
        let source = ManifestSource::from_json(r#"{"types": [{"name": "A", "diagramIds": ["d"]}]}"#);
        let records = source.discover().unwrap();
        assert_eq!(records[0].type_ref().kind(), TypeKind::Class);
        assert!(records[0].notes().is_empty());
        assert!(records[0].payload().stereotype.is_none());
    }

    #[test]
    fn test_empty_membership_is_kept_for_validation() {
        let source = ManifestSource::from_json(r#"{"types": [{"name": "A", "diagramIds": []}]}"#);
        let records = source.discover().unwrap();
        assert!(records[0].diagram_ids().is_empty());
    }

    #[test]
    fn test_missing_diagram_ids_is_error() {
        let source = ManifestSource::from_json(r#"{"types": [{"name": "A"}]}"#);
        let err = source.discover().unwrap_err();
        assert!(format!("{:#}", err).contains("diagramIds"));
    }

    #[test]
    fn test_non_object_document_is_error() {
        for text in ["[]", "[[]]", "null", "\"types\""] {
            let err = ManifestSource::from_json(text).discover().unwrap_err();
            assert!(err.to_string().contains("Invalid manifest"), "{}", text);
        }
    }

    #[test]
    fn test_malformed_json() {
        let source = ManifestSource::from_json("{ not json");
        assert!(source.discover().is_err());
    }

    #[test]
    fn test_missing_file() {
        let source = ManifestSource::from_path("/nonexistent/livingdoc/manifest.json");
        let err = source.discover().unwrap_err();
        assert!(err.to_string().contains("Failed to read manifest"));
    }

    #[test]
    fn test_empty_manifest() {
        let records = ManifestSource::from_json("{}").discover().unwrap();
        assert!(records.is_empty());
    }
}
