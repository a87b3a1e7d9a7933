//! Core abstractions for diagram generation
//!
//! This module defines the value types, the aggregation and settings logic,
//! and the traits behind which discovery, rendering and output are plugged in.

mod aggregator;
mod config;
mod error;
pub mod logging;
mod model;
pub mod properties;
mod renderer;
mod settings;
mod source;
mod types;

pub use aggregator::*;
pub use config::*;
pub use error::*;
pub use model::*;
pub use renderer::*;
pub use settings::*;
pub use source::*;
pub use types::*;
