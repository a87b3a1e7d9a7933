//! Fan-out and grouping of annotation records by diagram
//!
//! A type that belongs to diagrams `{A, B}` becomes two independent
//! [`FannedRecord`]s, one per diagram, each carrying the complete payload and
//! notes. The fanned records are then grouped under their single id.

use indexmap::map::{IntoIter, Iter};
use indexmap::IndexMap;
use tracing::{debug, span, trace, Level};

use super::error::DiagramError;
use super::types::{DiagramId, FannedRecord, TypeAnnotationRecord};

/// Members of every diagram, keyed by id
///
/// Ids iterate in first-appearance order; members of a group keep the order
/// in which their source records were aggregated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramGroups {
    groups: IndexMap<DiagramId, Vec<FannedRecord>>,
}

impl DiagramGroups {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, record: FannedRecord) {
        self.groups
            .entry(record.diagram_id.clone())
            .or_default()
            .push(record);
    }

    /// Members of one diagram
    pub fn get(&self, id: &DiagramId) -> Option<&[FannedRecord]> {
        self.groups.get(id).map(Vec::as_slice)
    }

    /// Diagram ids in grouping order
    pub fn ids(&self) -> impl Iterator<Item = &DiagramId> {
        self.groups.keys()
    }

    pub fn iter(&self) -> Iter<'_, DiagramId, Vec<FannedRecord>> {
        self.groups.iter()
    }

    /// Number of diagrams
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of fanned members across all diagrams
    pub fn member_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

impl IntoIterator for DiagramGroups {
    type Item = (DiagramId, Vec<FannedRecord>);
    type IntoIter = IntoIter<DiagramId, Vec<FannedRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagramGroups {
    type Item = (&'a DiagramId, &'a Vec<FannedRecord>);
    type IntoIter = Iter<'a, DiagramId, Vec<FannedRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Groups annotation records into per-diagram member lists
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Replicate a record into one single-diagram record per membership
    pub fn fan_out(&self, record: &TypeAnnotationRecord) -> Result<Vec<FannedRecord>, DiagramError> {
        if record.diagram_ids().is_empty() {
            return Err(DiagramError::missing_membership(
                record.type_ref().qualified_name(),
            ));
        }

        Ok(record
            .diagram_ids()
            .iter()
            .map(|id| record.project(id))
            .collect())
    }

    /// Fan out every record and group the results by diagram id
    pub fn aggregate<'a, I>(&self, records: I) -> Result<DiagramGroups, DiagramError>
    where
        I: IntoIterator<Item = &'a TypeAnnotationRecord>,
    {
        let aggregate_span = span!(Level::DEBUG, "aggregate");
        let _enter = aggregate_span.enter();

        let mut groups = DiagramGroups::new();
        for record in records {
            let fanned = self.fan_out(record)?;
            trace!(
                type_ref = record.type_ref().qualified_name(),
                diagrams = fanned.len(),
                "Fanned out record"
            );
            for part in fanned {
                groups.push(part);
            }
        }

        debug!(
            diagrams = groups.len(),
            members = groups.member_count(),
            "Aggregation completed"
        );
        Ok(groups)
    }
}
