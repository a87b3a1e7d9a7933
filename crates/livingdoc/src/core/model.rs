//! Render-ready diagram model

use serde::Serialize;

use super::settings::DiagramSettings;
use super::types::{DiagramId, FannedRecord};

/// Everything a renderer needs for one diagram
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramModel {
    pub id: DiagramId,
    pub settings: DiagramSettings,
    pub members: Vec<FannedRecord>,
}

impl DiagramModel {
    pub fn title(&self) -> Option<&str> {
        self.settings.title.as_deref()
    }

    pub fn include_files(&self) -> &[String] {
        &self.settings.include_files
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

/// Packages an id, its members and its settings into a [`DiagramModel`]
///
/// ```rust
/// use livingdoc::core::{DiagramId, DiagramModelBuilder, DiagramSettings};
///
/// let model = DiagramModelBuilder::new(DiagramId::new("orders"))
///     .settings(DiagramSettings::new().with_title("Orders"))
///     .build();
/// assert_eq!(model.title(), Some("Orders"));
/// assert!(model.members.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct DiagramModelBuilder {
    id: DiagramId,
    settings: DiagramSettings,
    members: Vec<FannedRecord>,
}

impl DiagramModelBuilder {
    pub fn new(id: DiagramId) -> Self {
        Self {
            id,
            settings: DiagramSettings::default(),
            members: Vec::new(),
        }
    }

    /// Build a model in one call
    pub fn assemble(id: DiagramId, members: Vec<FannedRecord>, settings: DiagramSettings) -> DiagramModel {
        Self::new(id).members(members).settings(settings).build()
    }

    pub fn settings(mut self, settings: DiagramSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn members(mut self, members: Vec<FannedRecord>) -> Self {
        self.members = members;
        self
    }

    pub fn member(mut self, member: FannedRecord) -> Self {
        self.members.push(member);
        self
    }

    pub fn build(self) -> DiagramModel {
        DiagramModel {
            id: self.id,
            settings: self.settings,
            members: self.members,
        }
    }
}
