// archdiagram - run the diagram handler locally
//
// `generate` runs the same handler the Lambda runs, against the configured
// store (filesystem by default outside Lambda), and prints the response
// envelope. `render` prints template markup without touching storage.

use anyhow::{Context, Result};
use archdiagram_config::{LogFormat, RuntimeConfig, StorageBackend};
use archdiagram_core::{view_url, DiagramHandler, DiagramKind, HandlerOutput, ObjectStore};
use archdiagram_storage::OpendalStore;
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate architecture diagrams and store them as Mermaid files
#[derive(Parser)]
#[command(name = "archdiagram")]
#[command(version)]
#[command(about = "Generate architecture diagrams and store them as Mermaid files", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Destination bucket (overrides BUCKET_NAME and config file)
    #[arg(short, long, value_name = "NAME", global = true)]
    bucket: Option<String>,

    /// Write to this directory instead of the configured store (fs backend)
    #[arg(short, long, value_name = "DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a diagram, store it, and print the response envelope
    Generate(GenerateArgs),
    /// Print a template without storing it
    Render(RenderArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Document the diagram belongs to
    #[arg(short, long, value_name = "ID")]
    document_id: Option<String>,

    /// Template name; anything other than quicksight-bi selects the generic template
    #[arg(short = 't', long, value_name = "TYPE")]
    diagram_type: Option<String>,

    /// Free-form description passed through to the handler
    #[arg(long, value_name = "TEXT")]
    description: Option<String>,

    /// Read the raw invocation event from a JSON file ("-" for stdin)
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["document_id", "diagram_type", "description"])]
    event: Option<PathBuf>,
}

#[derive(Args)]
struct RenderArgs {
    /// Template name
    #[arg(short = 't', long, value_name = "TYPE", default_value = "quicksight-bi")]
    diagram_type: String,

    /// Also print the viewer link
    #[arg(long)]
    url: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => RuntimeConfig::load().context("Failed to load configuration")?,
    };
    apply_cli_overrides(&mut config, &cli);
    init_tracing(&config);

    tracing::debug!(
        backend = %config.storage.backend,
        bucket = config.bucket().unwrap_or("<unset>"),
        "Configuration resolved"
    );
    for warning in config.warnings() {
        tracing::warn!("{}", warning);
    }

    match cli.command {
        Command::Generate(args) => generate(&config, args).await,
        Command::Render(args) => render(&config, &args),
    }
}

async fn generate(config: &RuntimeConfig, args: GenerateArgs) -> Result<ExitCode> {
    let event = match &args.event {
        Some(path) => read_event(path)?,
        None => event_from_args(&args),
    };

    let store = OpendalStore::from_config(&config.storage);
    let output = run_handler(store, config, &event).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize response")?
    );

    Ok(ExitCode::from(exit_status(&output)))
}

async fn run_handler<S: ObjectStore>(
    store: S,
    config: &RuntimeConfig,
    event: &Value,
) -> HandlerOutput {
    DiagramHandler::new(store, config.handler_config())
        .handle(event)
        .await
}

/// Process exit status for a response envelope: 1 for an error envelope
fn exit_status(output: &HandlerOutput) -> u8 {
    if output.is_success() {
        0
    } else {
        1
    }
}

fn render(config: &RuntimeConfig, args: &RenderArgs) -> Result<ExitCode> {
    let markup = DiagramKind::from_type_name(&args.diagram_type).render("");
    print!("{}", markup);
    if args.url {
        let url = view_url(&config.viewer.base_url, &markup)
            .context("Failed to encode viewer link")?;
        println!("{}", url);
    }
    Ok(ExitCode::SUCCESS)
}

/// Build the invocation event from individual flags
fn event_from_args(args: &GenerateArgs) -> Value {
    let mut event = Map::new();
    if let Some(id) = &args.document_id {
        event.insert("documentId".to_string(), json!(id));
    }
    if let Some(kind) = &args.diagram_type {
        event.insert("diagramType".to_string(), json!(kind));
    }
    if let Some(description) = &args.description {
        event.insert("description".to_string(), json!(description));
    }
    Value::Object(event)
}

fn read_event(path: &Path) -> Result<Value> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file: {}", path.display()))?
    };
    serde_json::from_str(&content).context("Event is not valid JSON")
}

fn apply_cli_overrides(config: &mut RuntimeConfig, cli: &Cli) {
    if let Some(bucket) = &cli.bucket {
        config.storage.bucket = Some(bucket.clone());
    }

    // An explicit output directory always means local files
    if let Some(dir) = &cli.output_dir {
        config.storage.backend = StorageBackend::Fs;
        config.storage.fs.get_or_insert_with(Default::default).path =
            dir.to_string_lossy().to_string();
    }

    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing(config: &RuntimeConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
