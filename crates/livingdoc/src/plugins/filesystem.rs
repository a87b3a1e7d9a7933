//! Filesystem-backed settings and output
//!
//! Settings are read from `{settings_dir}/{id}_class.properties` and diagrams
//! are written to `{out_dir}/{id}_class.puml`.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::core::{
    output_file_name, settings_file_name, DiagramError, DiagramId, OutputSink, RawSettings,
    SettingsSource,
};

/// Reads per-diagram settings files from a directory
#[derive(Debug, Clone)]
pub struct DirectorySettings {
    dir: PathBuf,
}

impl DirectorySettings {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Location of the settings file for a diagram
    pub fn path_for(&self, id: &DiagramId) -> PathBuf {
        self.dir.join(settings_file_name(id))
    }
}

impl SettingsSource for DirectorySettings {
    fn lookup(&self, id: &DiagramId) -> Option<RawSettings> {
        let path = self.path_for(id);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!(path = %path.display(), "Settings file found");
                Some(RawSettings {
                    origin: path.display().to_string(),
                    bytes,
                })
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No settings file found");
                None
            }
        }
    }
}

/// Writes diagrams into an output directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    out_dir: PathBuf,
}

impl DirectorySink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Location of the generated file for a diagram
    pub fn path_for(&self, id: &DiagramId) -> PathBuf {
        self.out_dir.join(output_file_name(id))
    }
}

impl OutputSink for DirectorySink {
    fn write(&mut self, id: &DiagramId, contents: &str) -> Result<PathBuf, DiagramError> {
        let path = self.path_for(id);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| DiagramError::write_error(id.clone(), parent, e))?;
        }

        trace!(path = %path.display(), bytes = contents.len(), "Writing diagram");
        fs::write(&path, contents).map_err(|e| DiagramError::write_error(id.clone(), &path, e))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lookup_missing_file() {
        let dir = tempdir().unwrap();
        let settings = DirectorySettings::new(dir.path());
        assert!(settings.lookup(&DiagramId::new("absent")).is_none());
    }

    #[test]
    fn test_lookup_existing_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("orders_class.properties"), "title=Orders\n").unwrap();

        let settings = DirectorySettings::new(dir.path());
        let raw = settings.lookup(&DiagramId::new("orders")).unwrap();
        assert_eq!(raw.bytes, b"title=Orders\n");
        assert!(raw.origin.ends_with("orders_class.properties"));
    }

    #[test]
    fn test_lookup_missing_directory() {
        let settings = DirectorySettings::new("/nonexistent/livingdoc/settings");
        assert!(settings.lookup(&DiagramId::new("orders")).is_none());
    }

    #[test]
    fn test_sink_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("nested").join("out");
        let mut sink = DirectorySink::new(&out_dir);

        let path = sink.write(&DiagramId::new("orders"), "@startuml\n@enduml\n").unwrap();
        assert_eq!(path, out_dir.join("orders_class.puml"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "@startuml\n@enduml\n");
    }

    #[test]
    fn test_sink_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        sink.write(&DiagramId::new("a"), "first").unwrap();
        let path = sink.write(&DiagramId::new("a"), "second").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_sink_reports_write_failure() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let mut sink = DirectorySink::new(&blocker);
        let err = sink.write(&DiagramId::new("a"), "text").unwrap_err();
        assert!(matches!(err, DiagramError::WriteError { .. }));
        assert_eq!(err.diagram_id(), Some(&DiagramId::new("a")));
    }
}
