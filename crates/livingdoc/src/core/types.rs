//! Core type definitions for diagram generation
//!
//! This module contains the value types that flow through the pipeline:
//! diagram identifiers, type references, notes, and the per-type annotation
//! records before and after fan-out.

use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Identifier of a single diagram
///
/// Case-preserving and compared by exact string value. Used as the grouping
/// key for diagram members and to derive settings and output file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagramId(String);

impl DiagramId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id has no usable characters
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Base name shared by settings and output artifacts: `{id}_class`
    pub fn file_stem(&self) -> String {
        format!("{}_class", self.0)
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DiagramId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DiagramId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of the annotated type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    #[default]
    Class,
    AbstractClass,
    Interface,
    Enum,
    Annotation,
}

impl TypeKind {
    /// PlantUML keyword for this kind
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::AbstractClass => "abstract class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Annotation => "annotation",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Class => write!(f, "class"),
            TypeKind::AbstractClass => write!(f, "abstract-class"),
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Enum => write!(f, "enum"),
            TypeKind::Annotation => write!(f, "annotation"),
        }
    }
}

/// Read-only handle to a described type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeReference {
    qualified_name: String,
    kind: TypeKind,
}

impl TypeReference {
    pub fn new(qualified_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind,
        }
    }

    /// Shorthand for a plain class reference
    pub fn class(qualified_name: impl Into<String>) -> Self {
        Self::new(qualified_name, TypeKind::Class)
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name)
    }
}

/// Where a note is placed relative to its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotePosition {
    Top,
    Bottom,
    Left,
    #[default]
    Right,
}

impl fmt::Display for NotePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotePosition::Top => write!(f, "top"),
            NotePosition::Bottom => write!(f, "bottom"),
            NotePosition::Left => write!(f, "left"),
            NotePosition::Right => write!(f, "right"),
        }
    }
}

/// Free-text annotation attached to a type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Note {
    pub text: String,
    pub position: NotePosition,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: NotePosition::default(),
        }
    }

    pub fn with_position(mut self, position: NotePosition) -> Self {
        self.position = position;
        self
    }
}

/// Declarative attributes attached to a type
///
/// `attributes` is passed through to renderers untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnnotationPayload {
    pub stereotype: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl AnnotationPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stereotype(mut self, stereotype: impl Into<String>) -> Self {
        self.stereotype = Some(stereotype.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// One annotated type's contribution to diagrams
///
/// Duplicate diagram ids collapse on insertion; declaration order of the
/// remaining ids is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotationRecord {
    diagram_ids: IndexSet<DiagramId>,
    type_ref: TypeReference,
    payload: AnnotationPayload,
    notes: Vec<Note>,
}

impl TypeAnnotationRecord {
    pub fn new<I, D>(type_ref: TypeReference, diagram_ids: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DiagramId>,
    {
        Self {
            diagram_ids: diagram_ids.into_iter().map(Into::into).collect(),
            type_ref,
            payload: AnnotationPayload::default(),
            notes: Vec::new(),
        }
    }

    pub fn with_payload(mut self, payload: AnnotationPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    pub fn with_notes(mut self, notes: impl IntoIterator<Item = Note>) -> Self {
        self.notes.extend(notes);
        self
    }

    pub fn diagram_ids(&self) -> &IndexSet<DiagramId> {
        &self.diagram_ids
    }

    pub fn type_ref(&self) -> &TypeReference {
        &self.type_ref
    }

    pub fn payload(&self) -> &AnnotationPayload {
        &self.payload
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Project this record onto a single diagram
    pub(crate) fn project(&self, diagram_id: &DiagramId) -> FannedRecord {
        FannedRecord {
            diagram_id: diagram_id.clone(),
            type_ref: self.type_ref.clone(),
            payload: self.payload.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Single-diagram projection of a [`TypeAnnotationRecord`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FannedRecord {
    pub diagram_id: DiagramId,
    pub type_ref: TypeReference,
    pub payload: AnnotationPayload,
    pub notes: Vec<Note>,
}
