//! Shuttlekit CLI - operator tools for shuttling graph files.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shuttlekit")]
#[command(author, version, about = "Ion shuttling engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the nodes, edges, and timing of a graph file
    Inspect(commands::inspect::InspectArgs),

    /// Plan a shuttle route between two positions
    Plan(commands::plan::PlanArgs),

    /// Compile a graph into its DAC waveform image
    Compile(commands::compile::CompileArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Compile(args) => commands::compile::run(args),
    }
}
