//! Pipeline for coordinating diagram generation
//!
//! The pipeline manages the flow of data through all stages:
//! Discover → Validate → Aggregate → Settings → Model → Render → Write
//!
//! Diagrams are processed one at a time, in the order their ids first appear
//! among the discovered types. What happens when a single diagram fails is
//! controlled by [`FailurePolicy`].

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, error, info, span, warn, Level};

use crate::core::{
    Aggregator, DiagramError, DiagramGroups, DiagramId, DiagramModel, DiagramModelBuilder,
    DiagramRenderer, FailurePolicy, FannedRecord, MetadataSource, OutputSink, SettingsResolver,
    SettingsSource, TypeAnnotationRecord,
};
use crate::plugins::plantuml::PlantUmlRenderer;

/// A diagram that was rendered and stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDiagram {
    pub id: DiagramId,
    pub path: PathBuf,
    pub members: usize,
}

/// A diagram that could not be generated
#[derive(Debug)]
pub struct DiagramFailure {
    pub id: DiagramId,
    pub error: DiagramError,
}

/// Outcome of one pipeline run
#[derive(Debug, Default)]
pub struct RunReport {
    pub written: Vec<WrittenDiagram>,
    pub failures: Vec<DiagramFailure>,
}

impl RunReport {
    /// Returns true if every diagram was written
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of diagrams attempted
    pub fn diagram_count(&self) -> usize {
        self.written.len() + self.failures.len()
    }
}

/// Pipeline that coordinates discovery, aggregation, rendering and output
///
/// ```rust
/// use livingdoc::core::{TypeAnnotationRecord, TypeReference};
/// use livingdoc::plugins::{MemorySettings, MemorySink, Pipeline, StaticSource};
///
/// let source = StaticSource::new(vec![
///     TypeAnnotationRecord::new(TypeReference::class("com.example.Order"), ["orders"]),
/// ]);
/// let mut sink = MemorySink::new();
///
/// let report = Pipeline::with_plantuml()
///     .run(&source, &MemorySettings::new(), &mut sink)
///     .unwrap();
/// assert!(report.is_success());
/// assert!(sink.get(&"orders".into()).unwrap().contains("class com.example.Order"));
/// ```
pub struct Pipeline {
    renderer: Box<dyn DiagramRenderer>,
    failure_policy: FailurePolicy,
    aggregator: Aggregator,
    resolver: SettingsResolver,
}

impl Pipeline {
    /// Create a pipeline around a renderer
    pub fn new(renderer: Box<dyn DiagramRenderer>) -> Self {
        Self {
            renderer,
            failure_policy: FailurePolicy::default(),
            aggregator: Aggregator::new(),
            resolver: SettingsResolver::new(),
        }
    }

    /// Create a pipeline that renders PlantUML
    pub fn with_plantuml() -> Self {
        Self::new(Box::new(PlantUmlRenderer::new()))
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Discover, validate and canonically order the annotation records
    ///
    /// Records are stably sorted by qualified type name so that the same set
    /// of types produces the same output regardless of discovery order.
    pub fn discover(
        &self,
        source: &dyn MetadataSource,
    ) -> Result<Vec<TypeAnnotationRecord>, DiagramError> {
        let mut records = source
            .discover()
            .map_err(|e| DiagramError::discovery_error(format!("{:#}", e)))?;
        debug!(types = records.len(), "Discovered annotated types");

        validate(&records)?;

        records.sort_by(|a, b| {
            a.type_ref()
                .qualified_name()
                .cmp(b.type_ref().qualified_name())
        });
        Ok(records)
    }

    /// Discover and group the records of every diagram
    pub fn collect_groups(
        &self,
        source: &dyn MetadataSource,
    ) -> Result<DiagramGroups, DiagramError> {
        let records = self.discover(source)?;
        let groups = self.aggregator.aggregate(&records)?;
        info!(
            types = records.len(),
            diagrams = groups.len(),
            "Aggregated diagram members"
        );
        Ok(groups)
    }

    /// Build every diagram model without rendering
    ///
    /// Stops at the first diagram whose settings fail. Use
    /// [`Pipeline::build_each_model`] to keep the other diagrams.
    pub fn build_models(
        &self,
        source: &dyn MetadataSource,
        settings: &dyn SettingsSource,
    ) -> Result<Vec<DiagramModel>, DiagramError> {
        self.build_each_model(source, settings)?
            .into_iter()
            .map(|(_, model)| model)
            .collect()
    }

    /// Build every diagram model, keeping each diagram's outcome separate
    ///
    /// The outer error is a run-wide failure (discovery or membership); a
    /// settings failure only affects the diagram it belongs to.
    pub fn build_each_model(
        &self,
        source: &dyn MetadataSource,
        settings: &dyn SettingsSource,
    ) -> Result<Vec<(DiagramId, Result<DiagramModel, DiagramError>)>, DiagramError> {
        let groups = self.collect_groups(source)?;
        Ok(groups
            .into_iter()
            .map(|(id, members)| {
                let model = self.assemble_model(id.clone(), members, settings);
                (id, model)
            })
            .collect())
    }

    /// Build the model of a single diagram
    ///
    /// Only that diagram's settings are resolved, so a malformed settings
    /// file of another diagram does not get in the way.
    pub fn build_model(
        &self,
        source: &dyn MetadataSource,
        settings: &dyn SettingsSource,
        id: &DiagramId,
    ) -> Result<DiagramModel, DiagramError> {
        let members = self
            .collect_groups(source)?
            .into_iter()
            .find_map(|(group, members)| (&group == id).then_some(members))
            .ok_or_else(|| DiagramError::UnknownDiagram {
                diagram_id: id.clone(),
            })?;
        self.assemble_model(id.clone(), members, settings)
    }

    /// Render a single model, attaching the diagram id to any failure
    pub fn render_model(&self, model: &DiagramModel) -> Result<String, DiagramError> {
        self.renderer
            .render(model)
            .map_err(|e| DiagramError::render_error(model.id.clone(), format!("{:#}", e)))
    }

    /// Run the complete pipeline
    ///
    /// Membership and discovery errors abort before anything is rendered.
    /// Per-diagram failures abort the run under [`FailurePolicy::Abort`] and
    /// are collected in the report under [`FailurePolicy::Continue`].
    pub fn run(
        &self,
        source: &dyn MetadataSource,
        settings: &dyn SettingsSource,
        sink: &mut dyn OutputSink,
    ) -> Result<RunReport, DiagramError> {
        let run_span = span!(
            Level::INFO,
            "run_pipeline",
            renderer = self.renderer.name(),
            policy = %self.failure_policy
        );
        let _enter = run_span.enter();

        info!("Starting diagram generation");

        let groups = self.collect_groups(source)?;

        let mut report = RunReport::default();
        for (id, members) in groups {
            let diagram_span = span!(Level::DEBUG, "diagram", id = %id);
            let _diagram_enter = diagram_span.enter();

            let member_count = members.len();
            match self.generate(id.clone(), members, settings, sink) {
                Ok(path) => {
                    info!(diagram = %id, path = %path.display(), "Diagram written");
                    report.written.push(WrittenDiagram {
                        id,
                        path,
                        members: member_count,
                    });
                }
                Err(e) => match self.failure_policy {
                    FailurePolicy::Abort => {
                        error!(diagram = %id, error = %e, "Diagram generation failed");
                        return Err(e);
                    }
                    FailurePolicy::Continue => {
                        warn!(diagram = %id, error = %e, "Diagram generation failed, continuing");
                        report.failures.push(DiagramFailure { id, error: e });
                    }
                },
            }
        }

        info!(
            written = report.written.len(),
            failed = report.failures.len(),
            "Diagram generation completed"
        );
        Ok(report)
    }

    fn assemble_model(
        &self,
        id: DiagramId,
        members: Vec<FannedRecord>,
        settings: &dyn SettingsSource,
    ) -> Result<DiagramModel, DiagramError> {
        let resolved = self.resolver.resolve(&id, settings)?;
        Ok(DiagramModelBuilder::assemble(id, members, resolved))
    }

    fn generate(
        &self,
        id: DiagramId,
        members: Vec<FannedRecord>,
        settings: &dyn SettingsSource,
        sink: &mut dyn OutputSink,
    ) -> Result<PathBuf, DiagramError> {
        let model = self.assemble_model(id, members, settings)?;
        let text = self.render_model(&model)?;
        debug!(output_len = text.len(), "Rendering completed");
        sink.write(&model.id, &text)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::with_plantuml()
    }
}

/// Every record must belong to at least one diagram, no id may be blank and
/// no type may be declared twice
pub fn validate(records: &[TypeAnnotationRecord]) -> Result<(), DiagramError> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        let type_ref = record.type_ref().qualified_name();
        if record.diagram_ids().is_empty() {
            error!(type_ref, "Annotated type declares no diagram membership");
            return Err(DiagramError::missing_membership(type_ref));
        }
        if let Some(blank) = record.diagram_ids().iter().find(|id| id.is_blank()) {
            error!(type_ref, diagram = ?blank.as_str(), "Annotated type declares a blank diagram id");
            return Err(DiagramError::invalid_diagram_id(type_ref, blank.as_str()));
        }
        if !seen.insert(type_ref) {
            error!(type_ref, "Annotated type is declared more than once");
            return Err(DiagramError::duplicate_type(type_ref));
        }
    }
    Ok(())
}
