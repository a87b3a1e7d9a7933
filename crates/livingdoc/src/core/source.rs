//! Discovery of annotated types

use anyhow::Result;

use super::types::TypeAnnotationRecord;

/// Supplies the annotation records of every annotated type
///
/// How types are discovered (source scanning, manifests, reflection) is up to
/// the implementation. Records are returned in discovery order.
pub trait MetadataSource {
    fn discover(&self) -> Result<Vec<TypeAnnotationRecord>>;
}
