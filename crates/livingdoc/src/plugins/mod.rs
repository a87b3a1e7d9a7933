//! Collaborator implementations and the generation pipeline
//!
//! This module contains the concrete metadata sources, settings sources,
//! renderers and output sinks, plus the [`Pipeline`] that wires them together.

pub mod filesystem;
pub mod manifest;
pub mod memory;
pub mod pipeline;
pub mod plantuml;

pub use filesystem::*;
pub use manifest::*;
pub use memory::*;
pub use pipeline::*;
pub use plantuml::*;
