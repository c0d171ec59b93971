use anyhow::Result;
use clap::{Parser, Subcommand};
use docframe_cli::{commands, config};
use docframe_core::FramingKind;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "docframe")]
#[command(about = "Docframe - Bounded framing for YAML and JSON document streams", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file with reader/writer options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum size of a single frame in bytes
    #[arg(long, global = true)]
    max_frame_size: Option<u64>,

    /// Maximum number of frames per stream
    #[arg(long, global = true)]
    max_frames: Option<u64>,

    /// Framing kind of the input (yaml, json or a media type)
    #[arg(short, long, global = true, default_value = "yaml")]
    kind: FramingKind,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a stream with every frame sanitized
    Normalize {
        /// Input file, or - for stdin
        #[arg(short, long)]
        input: String,

        /// Output file, or - for stdout
        #[arg(short, long)]
        output: String,

        /// Framing kind of the output, defaults to the input kind
        #[arg(long)]
        output_kind: Option<FramingKind>,
    },

    /// Write every frame to its own file
    Split {
        /// Input file, or - for stdin
        #[arg(short, long)]
        input: String,

        /// Directory for the frame files
        #[arg(long)]
        out_dir: PathBuf,
    },

    /// Report frame count and sizes
    Inspect {
        /// Input file, or - for stdin
        #[arg(short, long)]
        input: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let overrides =
        [config::load_overrides(cli.config.as_deref(), cli.max_frame_size, cli.max_frames)?];

    // Execute command
    match cli.command {
        Commands::Normalize {
            input,
            output,
            output_kind,
        } => commands::normalize::execute(
            &input,
            &output,
            &cli.kind,
            output_kind.as_ref(),
            &overrides,
        ),

        Commands::Split { input, out_dir } => {
            commands::split::execute(&input, &out_dir, &cli.kind, &overrides).map(|_| ())
        }

        Commands::Inspect { input, json } => {
            commands::inspect::execute(&input, &cli.kind, json, &overrides)
        }
    }
}
