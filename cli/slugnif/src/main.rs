//! slugnif CLI — check native module declarations and drive bridged calls.

mod commands;
mod manifest;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "slugnif", version, about = "Bounded native text-transform bridge")]
struct Cli {
    /// Declaration file (default: nearest nif.toml)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a module declaration
    Check,
    /// List registered functions
    Table {
        /// Output format (human, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Call a registered function through a shared library
    Call {
        /// Public function name
        function: String,
        /// Text argument, passed as a charlist
        text: String,
        /// Shared library exporting the declared symbols
        #[arg(long)]
        library: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let path = manifest::resolve(cli.manifest.as_deref(), &cwd)?;

    match cli.command {
        Commands::Check => commands::check::run(&path),
        Commands::Table { format } => commands::table::run(&path, format.as_deref()),
        Commands::Call {
            function,
            text,
            library,
        } => commands::call::run(&path, &library, &function, &text),
    }
}
