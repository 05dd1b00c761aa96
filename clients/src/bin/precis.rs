//! `precis`: loads a JSON résumé document into the Precis graph and serves
//! views of it.
//!
//! **Subcommands:**
//! - `ingest`: validate a document, report counts and warnings, optionally
//!   export the graph as Turtle, N-Triples or JSON-LD
//! - `query`: print the flattened records of one class, or of every class
//! - `build`: prepare a template dataset from a template configuration and
//!   user preferences
//!
//! **Usage:**
//! ```text
//! precis [--config <precis.toml>] ingest <data.json> [--export turtle] [--out graph.ttl]
//! precis query <data.json> [--class Skill] [--order alphabetical-ascending]
//! precis build <data.json> --template template.yaml --prefs prefs.yaml [--override local.yaml]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use precis_engine::document::{read_document, read_preferences};
use precis_engine::serializer::{jsonld, ntriples, turtle};
use precis_engine::{
    Format, GraphBuilder, GraphStore, Ingestion, JsonRenderer, MemoryStore, Order,
    OverrideRegistry, QueryEngine, Settings, TemplateConfig, TemplateDriver,
};
use precis_ontology::{Ontology, Schema};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "precis=info";

/// The non-redundant résumé engine.
#[derive(Parser)]
#[command(name = "precis", version, about = "Ingest, query and template résumé data")]
struct Args {
    /// Settings file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a data file and report what was loaded.
    Ingest {
        /// JSON data file.
        data: PathBuf,
        /// Namespace for individuals; generated when omitted.
        #[arg(long)]
        namespace: Option<String>,
        /// Export the graph in this format (turtle, ntriples, jsonld).
        #[arg(long)]
        export: Option<Format>,
        /// Export destination; standard output when omitted.
        #[arg(long, requires = "export")]
        out: Option<PathBuf>,
    },
    /// Print flattened records as JSON.
    Query {
        /// JSON data file.
        data: PathBuf,
        /// Class to query; every class when omitted.
        #[arg(long)]
        class: Option<String>,
        /// Result order (e.g. chronological-descending or chron_D).
        #[arg(long)]
        order: Option<String>,
        /// Namespace for individuals; generated when omitted.
        #[arg(long)]
        namespace: Option<String>,
        /// Indent the output.
        #[arg(long)]
        pretty: bool,
    },
    /// Build a template dataset.
    Build {
        /// JSON data file.
        data: PathBuf,
        /// Template configuration (YAML).
        #[arg(long)]
        template: PathBuf,
        /// User preferences (YAML).
        #[arg(long)]
        prefs: PathBuf,
        /// Preference overrides, deep-merged in order.
        #[arg(long = "override")]
        overrides: Vec<PathBuf>,
        /// Namespace for individuals; generated when omitted.
        #[arg(long)]
        namespace: Option<String>,
        /// Output file; standard output when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    init_logging(&settings);

    match args.command {
        Command::Ingest {
            data,
            namespace,
            export,
            out,
        } => {
            let (store, ingestion) = load(&settings, &data, namespace.as_deref())?;
            println!(
                "Loaded {} individuals from {} into namespace {}",
                ingestion.committed,
                data.display(),
                ingestion.namespace
            );
            for warning in &ingestion.warnings {
                println!(
                    "  Warning: object {} has unrecognized keys {}",
                    warning.id,
                    warning.keys.join(", ")
                );
            }
            if let Some(format) = export {
                let ontology = Ontology::full();
                let rendered = match format {
                    Format::Turtle => turtle::to_turtle(&store, ontology),
                    Format::NTriples => ntriples::to_ntriples(&store, ontology),
                    Format::JsonLd => {
                        serde_json::to_string_pretty(&jsonld::to_json_ld(&store, ontology))
                            .context("Failed to serialize graph to JSON-LD")?
                    }
                };
                emit(out.as_deref(), &rendered)?;
            }
        }
        Command::Query {
            data,
            class,
            order,
            namespace,
            pretty,
        } => {
            let order = order
                .as_deref()
                .map(str::parse::<Order>)
                .transpose()
                .context("Invalid --order")?;
            let (store, ingestion) = load(&settings, &data, namespace.as_deref())?;
            let engine = QueryEngine::new(
                &store,
                Schema::precis(),
                &settings.vocabulary,
                &ingestion.namespace,
            );
            let value = match class {
                Some(class) => serde_json::to_value(engine.get_all_of_type(&class, order)?)?,
                None => serde_json::to_value(engine.get_all(order)?)?,
            };
            let rendered = if pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            };
            println!("{rendered}");
        }
        Command::Build {
            data,
            template,
            prefs,
            overrides,
            namespace,
            out,
        } => {
            let config = TemplateConfig::load(&template)
                .with_context(|| format!("Failed to load template {}", template.display()))?;
            let preferences = read_preferences(&prefs, &overrides)
                .with_context(|| format!("Failed to read preferences {}", prefs.display()))?;
            let (store, ingestion) = load(&settings, &data, namespace.as_deref())?;
            let engine = QueryEngine::new(
                &store,
                Schema::precis(),
                &settings.vocabulary,
                &ingestion.namespace,
            );
            let registry = OverrideRegistry::with_defaults();
            let mut driver = TemplateDriver::new(config, engine, &registry)?;
            driver.set_preferences(preferences)?;
            driver.validate_overrides()?;
            driver.build_data()?;
            let rendered = driver.render(&JsonRenderer { pretty: true })?;
            emit(out.as_deref(), &rendered)?;
        }
    }

    Ok(())
}

fn init_logging(settings: &Settings) {
    let fallback = settings
        .log_filter
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(
    settings: &Settings,
    data: &Path,
    namespace: Option<&str>,
) -> Result<(MemoryStore, Ingestion)> {
    let objects = read_document(data)
        .with_context(|| format!("Failed to read data file {}", data.display()))?;
    let namespace = namespace.or(settings.namespace.as_deref());
    let mut store = MemoryStore::new();
    let ingestion = GraphBuilder::new(Schema::precis(), &settings.vocabulary)
        .ingest(&mut store, &objects, namespace)
        .with_context(|| format!("Failed to ingest {}", data.display()))?;
    tracing::debug!(individuals = store.len(), "graph ready");
    Ok((store, ingestion))
}

fn emit(out: Option<&Path>, rendered: &str) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("  Written: {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
