//! Per-diagram settings
//!
//! Settings are looked up per diagram id from a [`SettingsSource`]. A missing
//! or unreadable source resolves to [`DiagramSettings::default`] so diagrams
//! can be declared purely through annotations; a source that exists but does
//! not parse is an error.

use serde::Serialize;
use tracing::{debug, trace};

use super::error::DiagramError;
use super::properties::Properties;
use super::types::DiagramId;

/// Key holding the diagram title
pub const TITLE_KEY: &str = "title";

/// Key holding the delimited list of include files
pub const INCLUDE_FILES_KEY: &str = "include.files";

/// Delimiter between entries of [`INCLUDE_FILES_KEY`]
pub const INCLUDE_FILES_DELIMITER: char = ',';

/// Resolved configuration of one diagram
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagramSettings {
    pub title: Option<String>,
    pub include_files: Vec<String>,
}

impl DiagramSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_include(mut self, file: impl Into<String>) -> Self {
        self.include_files.push(file.into());
        self
    }

    /// Build settings from parsed properties, ignoring unknown keys
    pub fn from_properties(properties: &Properties) -> Self {
        for key in properties.keys() {
            if key != TITLE_KEY && key != INCLUDE_FILES_KEY {
                trace!(key, "Ignoring unknown settings key");
            }
        }

        Self {
            title: properties.get(TITLE_KEY).map(str::to_string),
            include_files: properties
                .get(INCLUDE_FILES_KEY)
                .map(parse_include_files)
                .unwrap_or_default(),
        }
    }
}

/// Split a delimited include list, dropping blank entries
pub fn parse_include_files(raw: &str) -> Vec<String> {
    raw.split(INCLUDE_FILES_DELIMITER)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Name of the settings document for a diagram: `{id}_class.properties`
pub fn settings_file_name(id: &DiagramId) -> String {
    format!("{}.properties", id.file_stem())
}

/// Raw contents of a settings document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSettings {
    /// Where the contents came from, for diagnostics
    pub origin: String,
    pub bytes: Vec<u8>,
}

/// Keyed lookup of per-diagram settings
///
/// Returns `None` when no document exists for the id or it cannot be read.
pub trait SettingsSource {
    fn lookup(&self, id: &DiagramId) -> Option<RawSettings>;
}

/// Resolves [`DiagramSettings`] for a diagram id
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsResolver;

impl SettingsResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(
        &self,
        id: &DiagramId,
        source: &dyn SettingsSource,
    ) -> Result<DiagramSettings, DiagramError> {
        let Some(raw) = source.lookup(id) else {
            debug!(diagram = %id, "No settings found, using defaults");
            return Ok(DiagramSettings::default());
        };

        debug!(diagram = %id, origin = %raw.origin, "Loading settings");
        let text = std::str::from_utf8(&raw.bytes).map_err(|e| {
            DiagramError::settings_error(
                id.clone(),
                raw.origin.as_str(),
                line_of_offset(&raw.bytes, e.valid_up_to()),
                "Settings are not valid UTF-8",
            )
        })?;

        let properties = Properties::parse(text).map_err(|e| {
            DiagramError::settings_error(id.clone(), raw.origin.as_str(), e.line, e.message)
        })?;

        let settings = DiagramSettings::from_properties(&properties);
        debug!(
            diagram = %id,
            title = ?settings.title,
            includes = settings.include_files.len(),
            "Settings resolved"
        );
        Ok(settings)
    }
}

fn line_of_offset(bytes: &[u8], offset: usize) -> usize {
    bytes[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}
