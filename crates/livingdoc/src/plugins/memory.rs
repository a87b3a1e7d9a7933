//! In-memory collaborators
//!
//! Useful for embedding the generator in other tools and for tests: records,
//! settings and outputs never touch the filesystem.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use indexmap::IndexMap;

use crate::core::{
    output_file_name, settings_file_name, DiagramError, DiagramId, MetadataSource, OutputSink,
    RawSettings, SettingsSource, TypeAnnotationRecord,
};

/// A fixed list of records
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<TypeAnnotationRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<TypeAnnotationRecord>) -> Self {
        Self { records }
    }
}

impl MetadataSource for StaticSource {
    fn discover(&self) -> Result<Vec<TypeAnnotationRecord>> {
        Ok(self.records.clone())
    }
}

impl FromIterator<TypeAnnotationRecord> for StaticSource {
    fn from_iter<I: IntoIterator<Item = TypeAnnotationRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Settings documents held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    documents: HashMap<DiagramId, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<DiagramId>, contents: impl Into<String>) {
        self.documents.insert(id.into(), contents.into());
    }

    pub fn with(mut self, id: impl Into<DiagramId>, contents: impl Into<String>) -> Self {
        self.insert(id, contents);
        self
    }
}

impl SettingsSource for MemorySettings {
    fn lookup(&self, id: &DiagramId) -> Option<RawSettings> {
        self.documents.get(id).map(|contents| RawSettings {
            origin: format!("memory:{}", settings_file_name(id)),
            bytes: contents.as_bytes().to_vec(),
        })
    }
}

/// Collects rendered diagrams in write order
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    outputs: IndexMap<DiagramId, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &DiagramId) -> Option<&str> {
        self.outputs.get(id).map(String::as_str)
    }

    /// Ids in the order they were written
    pub fn ids(&self) -> impl Iterator<Item = &DiagramId> {
        self.outputs.keys()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn into_outputs(self) -> IndexMap<DiagramId, String> {
        self.outputs
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, id: &DiagramId, contents: &str) -> Result<PathBuf, DiagramError> {
        self.outputs.insert(id.clone(), contents.to_string());
        Ok(PathBuf::from(output_file_name(id)))
    }
}
