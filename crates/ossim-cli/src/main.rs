//! ossim binary.
//!
//! # Usage
//!
//! ```bash
//! # Read a request file, write pretty JSON to stdout
//! ossim request.json
//!
//! # Read stdin, write CBOR to a file
//! cat request.json | ossim --format cbor -o result.cbor
//! ```

use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
};

use clap::Parser;
use ossim_cli::OutputFormat;
use ossim_core::Limits;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// OS resource-management simulator
#[derive(Parser, Debug)]
#[command(name = "ossim")]
#[command(about = "Banker's safety, deadlock detection and page replacement simulator")]
#[command(version)]
struct Args {
    /// Request file (stdin when absent or "-")
    input: Option<PathBuf>,

    /// Output file (stdout when absent)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Maximum number of processes
    #[arg(long, default_value_t = Limits::default().max_processes)]
    max_processes: usize,

    /// Maximum number of resource types
    #[arg(long, default_value_t = Limits::default().max_resources)]
    max_resources: usize,

    /// Maximum number of graph nodes
    #[arg(long, default_value_t = Limits::default().max_nodes)]
    max_nodes: usize,

    /// Maximum number of frames
    #[arg(long, default_value_t = Limits::default().max_frames)]
    max_frames: usize,

    /// Maximum reference string length
    #[arg(long, default_value_t = Limits::default().max_references)]
    max_references: usize,
}

impl Args {
    fn limits(&self) -> Limits {
        Limits {
            max_processes: self.max_processes,
            max_resources: self.max_resources,
            max_nodes: self.max_nodes,
            max_frames: self.max_frames,
            max_references: self.max_references,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let input = match args.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => fs::read(path)?,
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            buf
        },
    };

    let encoded = match ossim_cli::handle(&input, &args.limits(), args.format, args.compact) {
        Ok(encoded) => encoded,
        Err(err) => {
            tracing::error!(error = %err, class = ?err.input_class(), "request failed");
            return Err(err.into());
        },
    };

    match &args.output {
        Some(path) => fs::write(path, &encoded)?,
        None => io::stdout().lock().write_all(&encoded)?,
    }

    Ok(())
}
