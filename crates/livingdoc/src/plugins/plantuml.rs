//! PlantUML class diagram renderer
//!
//! Renders a [`DiagramModel`] as PlantUML source:
//!
//! ```text
//! @startuml
//! title Orders
//! !include style.puml
//!
//! class com.example.Order <<entity>>
//! note top of com.example.Order
//! Aggregate root
//! end note
//!
//! @enduml
//! ```

use std::fmt::Write;

use anyhow::{ensure, Result};
use tracing::{span, trace, Level};

use crate::core::{DiagramModel, DiagramRenderer, FannedRecord, Note};

/// Renders class diagrams as PlantUML text
#[derive(Debug, Clone, Copy, Default)]
pub struct PlantUmlRenderer;

impl PlantUmlRenderer {
    pub fn new() -> Self {
        Self
    }

    fn write_header(&self, out: &mut String, model: &DiagramModel) -> Result<()> {
        writeln!(out, "@startuml")?;

        match model.title() {
            Some(title) if title.contains('\n') => {
                writeln!(out, "title")?;
                writeln!(out, "{}", title)?;
                writeln!(out, "end title")?;
            }
            Some(title) => writeln!(out, "title {}", title)?,
            None => {}
        }

        for include in model.include_files() {
            writeln!(out, "!include {}", include)?;
        }
        Ok(())
    }

    fn write_member(&self, out: &mut String, member: &FannedRecord) -> Result<()> {
        let name = member.type_ref.qualified_name();
        write!(out, "{} {}", member.type_ref.kind().keyword(), name)?;

        if let Some(stereotype) = member
            .payload
            .stereotype
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            write!(out, " <<{}>>", stereotype)?;
        }
        writeln!(out)?;

        for note in &member.notes {
            self.write_note(out, name, note)?;
        }
        Ok(())
    }

    fn write_note(&self, out: &mut String, owner: &str, note: &Note) -> Result<()> {
        ensure!(
            !note.text.trim().is_empty(),
            "note on {} has no text",
            owner
        );

        writeln!(out, "note {} of {}", note.position, owner)?;
        for line in note.text.lines() {
            writeln!(out, "{}", line)?;
        }
        writeln!(out, "end note")?;
        Ok(())
    }
}

impl DiagramRenderer for PlantUmlRenderer {
    fn render(&self, model: &DiagramModel) -> Result<String> {
        let render_span = span!(Level::DEBUG, "render_plantuml", members = model.member_count());
        let _enter = render_span.enter();

        let mut out = String::new();
        self.write_header(&mut out, model)?;

        for member in &model.members {
            writeln!(out)?;
            self.write_member(&mut out, member)?;
        }

        writeln!(out)?;
        writeln!(out, "@enduml")?;

        trace!(output_len = out.len(), "Rendered PlantUML");
        Ok(out)
    }

    fn name(&self) -> &str {
        "plantuml"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        AnnotationPayload, DiagramId, DiagramModelBuilder, DiagramSettings, NotePosition,
        TypeKind, TypeReference,
    };
    use pretty_assertions::assert_eq;

    fn member(name: &str, kind: TypeKind) -> FannedRecord {
        FannedRecord {
            diagram_id: DiagramId::new("d"),
            type_ref: TypeReference::new(name, kind),
            payload: AnnotationPayload::default(),
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_render_empty_model() {
        let model = DiagramModelBuilder::new(DiagramId::new("d")).build();
        let output = PlantUmlRenderer::new().render(&model).unwrap();
        assert_eq!(output, "@startuml\n\n@enduml\n");
    }

    #[test]
    fn test_render_full_model() {
        let mut order = member("com.example.Order", TypeKind::Class);
        order.payload = AnnotationPayload::new().with_stereotype("entity");
        order.notes = vec![
            Note::new("Aggregate root").with_position(NotePosition::Top),
            Note::new("Line one\nLine two"),
        ];
        let repo = member("com.example.OrderRepository", TypeKind::Interface);

        let model = DiagramModelBuilder::new(DiagramId::new("d"))
            .settings(
                DiagramSettings::new()
                    .with_title("Orders")
                    .with_include("style.puml")
                    .with_include("common.puml"),
            )
            .members(vec![order, repo])
            .build();

        let output = PlantUmlRenderer::new().render(&model).unwrap();
        let expected = "\
@startuml
title Orders
!include style.puml
!include common.puml

class com.example.Order <<entity>>
note top of com.example.Order
Aggregate root
end note
note right of com.example.Order
Line one
Line two
end note

interface com.example.OrderRepository

@enduml
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_render_kinds() {
        let model = DiagramModelBuilder::new(DiagramId::new("d"))
            .member(member("a.Base", TypeKind::AbstractClass))
            .member(member("a.Status", TypeKind::Enum))
            .member(member("a.Marker", TypeKind::Annotation))
            .build();
        let output = PlantUmlRenderer::new().render(&model).unwrap();
        assert!(output.contains("abstract class a.Base\n"));
        assert!(output.contains("enum a.Status\n"));
        assert!(output.contains("annotation a.Marker\n"));
    }

    #[test]
    fn test_multiline_title_uses_block() {
        let model = DiagramModelBuilder::new(DiagramId::new("d"))
            .settings(DiagramSettings::new().with_title("Orders\nv2"))
            .build();
        let output = PlantUmlRenderer::new().render(&model).unwrap();
        assert!(output.starts_with("@startuml\ntitle\nOrders\nv2\nend title\n"));
    }

    #[test]
    fn test_blank_stereotype_is_omitted() {
        let mut part = member("a.B", TypeKind::Class);
        part.payload = AnnotationPayload::new().with_stereotype("  ");
        let model = DiagramModelBuilder::new(DiagramId::new("d")).member(part).build();
        let output = PlantUmlRenderer::new().render(&model).unwrap();
        assert!(output.contains("class a.B\n"));
        assert!(!output.contains("<<"));
    }

    #[test]
    fn test_blank_note_fails() {
        let mut part = member("a.B", TypeKind::Class);
        part.notes = vec![Note::new("   ")];
        let model = DiagramModelBuilder::new(DiagramId::new("d")).member(part).build();
        let err = PlantUmlRenderer::new().render(&model).unwrap_err();
        assert!(err.to_string().contains("a.B"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let model = DiagramModelBuilder::new(DiagramId::new("d"))
            .member(member("a.One", TypeKind::Class))
            .member(member("a.Two", TypeKind::Class))
            .build();
        let renderer = PlantUmlRenderer::new();
        assert_eq!(renderer.render(&model).unwrap(), renderer.render(&model).unwrap());
    }
}
