//! Command-line interface for the livingdoc utility
//!
//! Reads a JSON manifest of annotated types and generates one PlantUML class
//! diagram per diagram id.

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use livingdoc::core::logging::init_logging;
use livingdoc::plugins::{DirectorySettings, DirectorySink, ManifestSource, Pipeline};
use livingdoc::{DiagramId, DiagramModel, FailurePolicy, GeneratorConfig};

/// Livingdoc - Generate PlantUML class diagrams from annotated types
#[derive(Parser)]
#[command(name = "livingdoc")]
#[command(about = "Generate PlantUML class diagrams from type annotations")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate every diagram into the output directory
    Generate {
        /// JSON manifest of annotated types (use - for stdin)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Directory holding `<id>_class.properties` settings files
        #[arg(long)]
        settings_dir: Option<PathBuf>,

        /// Directory receiving `<id>_class.puml` files
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Keep generating other diagrams when one fails
        #[arg(long)]
        keep_going: bool,

        /// Generator option, e.g. -D livingdoc.out.dir=docs/uml
        #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_option)]
        define: Vec<(String, String)>,
    },

    /// List diagrams, their titles and members without writing anything
    List {
        /// JSON manifest of annotated types (use - for stdin)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Directory holding `<id>_class.properties` settings files
        #[arg(long)]
        settings_dir: Option<PathBuf>,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Render a single diagram
    Render {
        /// JSON manifest of annotated types (use - for stdin)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Diagram id to render
        #[arg(short, long)]
        diagram: String,

        /// Directory holding `<id>_class.properties` settings files
        #[arg(long)]
        settings_dir: Option<PathBuf>,

        /// Output file for the diagram (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Parse a `key=value` generator option
fn parse_option(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing option key in '{}'", raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// One diagram in `list` output
#[derive(Debug, Serialize)]
struct DiagramListing {
    id: DiagramId,
    title: Option<String>,
    include_files: Vec<String>,
    members: Vec<String>,
}

impl From<&DiagramModel> for DiagramListing {
    fn from(model: &DiagramModel) -> Self {
        Self {
            id: model.id.clone(),
            title: model.title().map(str::to_string),
            include_files: model.include_files().to_vec(),
            members: model
                .members
                .iter()
                .map(|m| m.type_ref.qualified_name().to_string())
                .collect(),
        }
    }
}

/// Main CLI application
pub struct LivingdocApp {
    base: GeneratorConfig,
}

impl LivingdocApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(GeneratorConfig::default())
    }

    /// Create a new application instance on top of a base config
    pub fn with_config(base: GeneratorConfig) -> Self {
        Self { base }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("LIVINGDOC_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("LIVINGDOC_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Livingdoc v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Generate {
                manifest,
                settings_dir,
                out_dir,
                keep_going,
                define,
            } => {
                let config = self.generator_config(define, settings_dir, out_dir, keep_going)?;
                self.generate_command(&manifest, &config, cli.verbose)
            }
            Commands::List {
                manifest,
                settings_dir,
                json,
            } => {
                let config = self.generator_config(Vec::new(), settings_dir, None, false)?;
                self.list_command(&manifest, &config, json)
            }
            Commands::Render {
                manifest,
                diagram,
                settings_dir,
                output,
            } => {
                let config = self.generator_config(Vec::new(), settings_dir, None, false)?;
                self.render_command(&manifest, &config, &DiagramId::new(diagram), output)
            }
        }
    }

    /// Merge `-D` options and explicit flags over the base config
    ///
    /// Flags win over options, options win over the base config.
    pub fn generator_config(
        &self,
        define: Vec<(String, String)>,
        settings_dir: Option<PathBuf>,
        out_dir: Option<PathBuf>,
        keep_going: bool,
    ) -> Result<GeneratorConfig> {
        let options: HashMap<String, String> = define.into_iter().collect();
        let mut config = if options.is_empty() {
            self.base.clone()
        } else {
            GeneratorConfig::from_options(&options)?
        };

        if let Some(dir) = settings_dir {
            config.settings_dir = dir;
        }
        if let Some(dir) = out_dir {
            config.out_dir = dir;
        }
        if keep_going {
            config.failure_policy = FailurePolicy::Continue;
        }

        debug!(
            settings_dir = %config.settings_dir.display(),
            out_dir = %config.out_dir.display(),
            policy = %config.failure_policy,
            "Resolved generator configuration"
        );
        Ok(config)
    }

    /// Handle the generate command
    fn generate_command(
        &self,
        manifest: &Path,
        config: &GeneratorConfig,
        verbose: bool,
    ) -> Result<()> {
        let source = self.manifest_source(manifest)?;
        let settings = DirectorySettings::new(&config.settings_dir);
        let mut sink = DirectorySink::new(&config.out_dir);

        let report = Pipeline::with_plantuml()
            .with_failure_policy(config.failure_policy)
            .run(&source, &settings, &mut sink)?;

        for diagram in &report.written {
            println!("{}", diagram.path.display());
            if verbose {
                eprintln!("  {} member(s) in {}", diagram.members, diagram.id);
            }
        }
        for failure in &report.failures {
            eprintln!("Failed to generate {}: {}", failure.id, failure.error);
        }
        info!(
            written = report.written.len(),
            failed = report.failures.len(),
            "Generation finished"
        );

        if !report.is_success() {
            bail!(
                "{} of {} diagrams failed",
                report.failures.len(),
                report.diagram_count()
            );
        }
        Ok(())
    }

    /// Handle the list command
    fn list_command(&self, manifest: &Path, config: &GeneratorConfig, json: bool) -> Result<()> {
        let source = self.manifest_source(manifest)?;
        let settings = DirectorySettings::new(&config.settings_dir);
        let outcomes = Pipeline::with_plantuml().build_each_model(&source, &settings)?;
        let total = outcomes.len();

        let mut listings = Vec::with_capacity(total);
        let mut failed = 0;
        for (id, model) in outcomes {
            match model {
                Ok(model) => listings.push(DiagramListing::from(&model)),
                Err(e) => {
                    eprintln!("Failed to build {}: {}", id, e);
                    failed += 1;
                }
            }
        }

        if json {
            println!("{}", serde_json::to_string_pretty(&listings)?);
        } else {
            for listing in &listings {
                match &listing.title {
                    Some(title) => println!("{}  ({})", listing.id, title),
                    None => println!("{}", listing.id),
                }
                for member in &listing.members {
                    println!("  {}", member);
                }
            }
            println!();
            println!("Total: {} diagram(s)", listings.len());
        }

        if failed > 0 {
            bail!("{} of {} diagrams failed", failed, total);
        }
        Ok(())
    }

    /// Handle the render command
    fn render_command(
        &self,
        manifest: &Path,
        config: &GeneratorConfig,
        diagram: &DiagramId,
        output: Option<PathBuf>,
    ) -> Result<()> {
        let source = self.manifest_source(manifest)?;
        let settings = DirectorySettings::new(&config.settings_dir);
        let pipeline = Pipeline::with_plantuml();

        let model = pipeline.build_model(&source, &settings, diagram)?;

        let text = pipeline.render_model(&model)?;
        self.write_output(output, &text)
    }

    /// Build a manifest source from a path, reading stdin for `-`
    pub fn manifest_source(&self, manifest: &Path) -> Result<ManifestSource> {
        if manifest.to_string_lossy() == "-" {
            let content = self.read_input(None)?;
            Ok(ManifestSource::from_json(content))
        } else {
            Ok(ManifestSource::from_path(manifest))
        }
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for LivingdocApp {
    fn default() -> Self {
        Self::new()
    }
}
