//! Core error types for diagram generation
//!
//! Every diagram-scoped variant carries the [`DiagramId`] it was raised for,
//! and membership errors carry the type reference that triggered them.

use std::path::PathBuf;

use thiserror::Error;

use super::types::DiagramId;

/// Core error types for the diagram generation pipeline
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Configuration error: type {type_ref} declares no diagram membership")]
    MissingMembership { type_ref: String },

    #[error("Configuration error: type {type_ref} declares an invalid diagram id {diagram_id:?}")]
    InvalidDiagramId {
        type_ref: String,
        diagram_id: String,
    },

    #[error("Configuration error: type {type_ref} is declared more than once")]
    DuplicateType { type_ref: String },

    #[error("Unknown diagram '{diagram_id}'")]
    UnknownDiagram { diagram_id: DiagramId },

    #[error("Settings error for diagram {diagram_id}: {message} in {origin} at line {line}")]
    SettingsParseError {
        diagram_id: DiagramId,
        origin: String,
        line: usize,
        message: String,
    },

    #[error("Render error for diagram {diagram_id}: {message}")]
    RenderError {
        diagram_id: DiagramId,
        message: String,
    },

    #[error("Write error for diagram {diagram_id} at {}: {source}", .path.display())]
    WriteError {
        diagram_id: DiagramId,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Discovery error: {message}")]
    DiscoveryError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new missing-membership error
    pub fn missing_membership(type_ref: impl Into<String>) -> Self {
        Self::MissingMembership {
            type_ref: type_ref.into(),
        }
    }

    /// Create a new invalid-id error
    pub fn invalid_diagram_id(type_ref: impl Into<String>, diagram_id: impl Into<String>) -> Self {
        Self::InvalidDiagramId {
            type_ref: type_ref.into(),
            diagram_id: diagram_id.into(),
        }
    }

    /// Create a new duplicate-type error
    pub fn duplicate_type(type_ref: impl Into<String>) -> Self {
        Self::DuplicateType {
            type_ref: type_ref.into(),
        }
    }

    /// Create a new settings parse error
    pub fn settings_error(
        diagram_id: DiagramId,
        origin: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::SettingsParseError {
            diagram_id,
            origin: origin.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(diagram_id: DiagramId, message: impl Into<String>) -> Self {
        Self::RenderError {
            diagram_id,
            message: message.into(),
        }
    }

    /// Create a new write error
    pub fn write_error(diagram_id: DiagramId, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteError {
            diagram_id,
            path: path.into(),
            source,
        }
    }

    /// Create a new discovery error
    pub fn discovery_error(message: impl Into<String>) -> Self {
        Self::DiscoveryError {
            message: message.into(),
        }
    }

    /// The diagram this error belongs to, if it is diagram-scoped
    pub fn diagram_id(&self) -> Option<&DiagramId> {
        match self {
            Self::UnknownDiagram { diagram_id }
            | Self::SettingsParseError { diagram_id, .. }
            | Self::RenderError { diagram_id, .. }
            | Self::WriteError { diagram_id, .. } => Some(diagram_id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_membership() {
        let error = DiagramError::missing_membership("com.example.Orphan");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Configuration error"));
        assert!(error_msg.contains("com.example.Orphan"));
        assert!(error.diagram_id().is_none());
    }

    #[test]
    fn test_duplicate_type() {
        let error = DiagramError::duplicate_type("com.example.Order");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Configuration error"));
        assert!(error_msg.contains("com.example.Order"));
        assert!(error.diagram_id().is_none());
    }

    #[test]
    fn test_unknown_diagram() {
        let error = DiagramError::UnknownDiagram {
            diagram_id: DiagramId::new("missing"),
        };
        assert_eq!(error.to_string(), "Unknown diagram 'missing'");
        assert_eq!(error.diagram_id(), Some(&DiagramId::new("missing")));
    }

    #[test]
    fn test_settings_error() {
        let error = DiagramError::settings_error(
            DiagramId::new("orders"),
            "./orders_class.properties",
            3,
            "Malformed \\uxxxx encoding",
        );
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("orders"));
        assert!(error_msg.contains("line 3"));
        assert!(error_msg.contains("orders_class.properties"));
        assert_eq!(error.diagram_id(), Some(&DiagramId::new("orders")));
    }

    #[test]
    fn test_render_error() {
        let error = DiagramError::render_error(DiagramId::new("A"), "Render failed");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Render error"));
        assert!(error_msg.contains("Render failed"));
    }

    #[test]
    fn test_write_error() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error = DiagramError::write_error(DiagramId::new("A"), "out/A_class.puml", io_err);
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("A_class.puml"));
        assert!(error_msg.contains("denied"));
    }

    #[test]
    fn test_io_error_conversion() {
        use std::io;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: DiagramError = io_err.into();
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("File not found"));
    }
}
