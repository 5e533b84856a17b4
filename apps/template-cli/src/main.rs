//! Template pipeline command line
//!
//! Analyzes legal documents for placeholders, converts them into templates and
//! generates dynamic forms. Every command prints JSON to stdout; logs go to stderr.
//!
//! ```text
//! template-cli analyze peticao.txt
//! template-cli convert peticao.txt --name "Peticao Inicial"
//! template-cli form peticao.txt --layout wizard --sample
//! template-cli instance peticao.txt --data respostas.json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing::{debug, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use template_pipeline::{
    ConversionRequest, FormLayout, PipelineConfig, PipelineError, ResultCache, TemplateContext,
    TemplatePipeline,
};

mod fs_source;

use fs_source::FsDocumentSource;

#[derive(Parser, Debug)]
#[command(name = "template-cli")]
#[command(version, about = "Turn legal documents into templates and dynamic forms")]
struct Args {
    /// Pipeline configuration file (TOML)
    #[arg(short, long, env = "TEMPLATE_CONFIG")]
    config: Option<PathBuf>,

    /// Distributed cache URL, overrides the config file
    #[arg(long, env = "TEMPLATE_CACHE_URL")]
    cache_url: Option<String>,

    /// Directory that relative document paths resolve against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract placeholders and score template suitability
    Analyze { document: String },

    /// Cheap pre-check without a full analysis
    Scan { document: String },

    /// Convert a document into a template
    Convert {
        document: String,
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Generate a form for the document's template
    Form {
        document: String,
        #[command(flatten)]
        overrides: Overrides,
        /// single_column, two_column, grouped, wizard, multi_author, authority_selection
        #[arg(short, long)]
        layout: Option<FormLayout>,
        /// default, modern or compact
        #[arg(short, long)]
        theme: Option<String>,
        /// Fill components with sample values
        #[arg(long)]
        sample: bool,
    },

    /// Validate form answers and compute derived fields
    Instance {
        document: String,
        #[command(flatten)]
        overrides: Overrides,
        /// JSON object with the submitted answers
        #[arg(short, long)]
        data: PathBuf,
        /// Document type whose entity requirements apply (e.g. defesa_previa)
        #[arg(long)]
        document_type: Option<String>,
    },

    /// Expand conditional blocks in the document text
    Blocks {
        document: String,
        /// JSON object with the data the blocks render from
        #[arg(short, long)]
        data: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct Overrides {
    /// Template name
    #[arg(long)]
    name: Option<String>,
    /// Template category
    #[arg(long)]
    category: Option<String>,
    /// Convert even when the document scores as unsuitable
    #[arg(long)]
    force: bool,
}

impl From<Overrides> for ConversionRequest {
    fn from(overrides: Overrides) -> Self {
        ConversionRequest {
            name: overrides.name,
            category: overrides.category,
            force: overrides.force,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(url) = args.cache_url {
        config.cache.backend.distributed_url = Some(url);
    }

    let cache = Arc::new(ResultCache::connect(&config.cache.backend).await);
    let source = Arc::new(FsDocumentSource::new(&args.root));
    let pipeline = TemplatePipeline::new(source, cache, config);

    let output = run(&pipeline, &args.root, args.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    debug!(stats = ?pipeline.cache_stats(), "Cache usage");
    Ok(())
}

async fn run(pipeline: &TemplatePipeline, root: &Path, command: Command) -> anyhow::Result<Value> {
    let output = match command {
        Command::Analyze { document } => {
            let result = pipeline.analyze_document(&document).await.map_err(explain)?;
            serde_json::to_value(result)?
        }
        Command::Scan { document } => {
            let result = pipeline.quick_scan(&document).await.map_err(explain)?;
            serde_json::to_value(result)?
        }
        Command::Convert { document, overrides } => {
            let template = pipeline
                .convert_to_template(&document, &overrides.into())
                .await
                .map_err(explain)?;
            serde_json::to_value(template)?
        }
        Command::Form {
            document,
            overrides,
            layout,
            theme,
            sample,
        } => {
            let template = pipeline
                .convert_to_template(&document, &overrides.into())
                .await
                .map_err(explain)?;
            let form = pipeline
                .generate_form(&template, layout, theme.as_deref(), sample)
                .map_err(explain)?;
            serde_json::to_value(form)?
        }
        Command::Instance {
            document,
            overrides,
            data,
            document_type,
        } => {
            let form_data = read_json_object(&data)?;
            let template = pipeline
                .convert_to_template(&document, &overrides.into())
                .await
                .map_err(explain)?;
            let result = match document_type {
                Some(document_type) => pipeline.create_instance_with_context(
                    &template,
                    &form_data,
                    Some(&TemplateContext::for_document_type(&document_type)),
                ),
                None => pipeline.create_instance(&template, &form_data),
            };
            match result {
                Ok(instance) => serde_json::to_value(instance)?,
                Err(PipelineError::ValidationFailed(errors)) => json!({ "errors": errors }),
                Err(err) => return Err(explain(err)),
            }
        }
        Command::Blocks { document, data } => {
            let data = read_json_object(&data)?;
            let text = tokio::fs::read_to_string(root.join(&document))
                .await
                .with_context(|| format!("Failed to read document: {}", document))?;
            serde_json::to_value(pipeline.resolve_blocks(&text, &data))?
        }
    };
    Ok(output)
}

fn read_json_object(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;
    match serde_json::from_str(&content).context("Data file is not valid JSON")? {
        Value::Object(map) => Ok(map),
        _ => bail!("Data file must contain a JSON object"),
    }
}

fn explain(err: PipelineError) -> anyhow::Error {
    let hint = match &err {
        PipelineError::UnsuitableDocument { .. } => Some("pass --force to convert anyway"),
        e if e.is_transient() => Some("the document source may be temporarily unavailable"),
        _ => None,
    };
    match hint {
        Some(hint) => anyhow::Error::new(err).context(hint),
        None => anyhow::Error::new(err),
    }
}
