use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shift_resolver::api::{AppState, ResolutionRequest, create_router, resolve_request};
use shift_resolver::config::ConfigLoader;
use shift_resolver::models::{ExistingAssignment, LedgerBook, ShiftSlot};
use shift_resolver::resolution::{InMemorySlotSource, JsonLinesSink, ResolutionEngine};

/// Resolves open shift slots from the claims left on them.
#[derive(Debug, Parser)]
#[command(name = "shift-resolver", version, about)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one resolution pass over a JSON file of slots
    Resolve {
        /// Directory holding period.yaml and rules.yaml
        #[arg(short, long, env = "SHIFT_RESOLVER_CONFIG")]
        config: PathBuf,

        /// JSON file shaped like the /resolve request body
        #[arg(short, long)]
        slots: PathBuf,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stream one decision per line instead of a single report
        #[arg(long)]
        jsonl: bool,
    },

    /// Serve the HTTP API
    Serve {
        /// Directory holding period.yaml and rules.yaml
        #[arg(short, long, env = "SHIFT_RESOLVER_CONFIG")]
        config: PathBuf,

        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        addr: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Command::Resolve {
            config,
            slots,
            output,
            jsonl,
        } => {
            let engine = load_engine(&config)?;
            let request: ResolutionRequest = serde_json::from_reader(File::open(&slots)?)?;
            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                None => Box::new(io::stdout().lock()),
            };

            if jsonl {
                stream_decisions(&engine, request, writer)?;
            } else {
                let report = resolve_request(&engine, request)?;
                serde_json::to_writer_pretty(&mut writer, &report)?;
                writeln!(writer)?;
                writer.flush()?;
            }

            if let Some(path) = output {
                tracing::info!(output = %path.display(), "Report written");
            }
        }
        Command::Serve { config, addr } => {
            let engine = load_engine(&config)?;
            let router = create_router(AppState::new(engine));
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(addr = %addr, "Listening");
            axum::serve(listener, router).await?;
        }
    }

    Ok(())
}

fn init_logger(verbose: bool) {
    let default = if verbose {
        "shift_resolver=debug"
    } else {
        "shift_resolver=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_engine(dir: &Path) -> Result<ResolutionEngine, Box<dyn std::error::Error>> {
    let loader = ConfigLoader::load(dir)?;
    tracing::info!(
        period = %loader.period().name,
        version = %loader.period().version,
        "Loaded schedule configuration"
    );
    Ok(ResolutionEngine::new(loader.into_config()))
}

fn stream_decisions(
    engine: &ResolutionEngine,
    request: ResolutionRequest,
    writer: Box<dyn Write>,
) -> Result<(), Box<dyn std::error::Error>> {
    let existing: Vec<ExistingAssignment> = request
        .existing_assignments
        .into_iter()
        .map(Into::into)
        .collect();
    let slots: Vec<ShiftSlot> = request.slots.into_iter().map(Into::into).collect();

    let mut ledgers = LedgerBook::new();
    engine.seed(&mut ledgers, &existing)?;

    let mut source = InMemorySlotSource::new(slots);
    let mut sink = JsonLinesSink::new(writer);
    let summary = engine.run(&mut source, &mut sink, &mut ledgers)?;
    sink.into_inner()?;

    for failure in &summary.failures {
        tracing::warn!(
            slot = %failure.slot,
            error = %failure.message,
            "Slot needs manual attention"
        );
    }
    tracing::info!(
        pass_id = %summary.pass_id,
        slots = summary.slots_processed,
        assigned = summary.assigned,
        unassigned = summary.unassigned,
        failed = summary.failures.len(),
        "Decisions streamed"
    );
    Ok(())
}
