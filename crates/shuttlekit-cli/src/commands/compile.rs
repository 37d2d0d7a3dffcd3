//! Compile a graph into its DAC waveform image.

use std::fmt::Write as _;

use clap::Args;
use shuttlekit_dac::compile_waveform;

/// Compile the full waveform image of a graph file.
#[derive(Args)]
pub struct CompileArgs {
    /// Path to the graph TOML file
    pub file: std::path::PathBuf,

    /// Write the sample buffer to a file, one value per line
    #[arg(short, long)]
    pub output: Option<std::path::PathBuf>,
}

/// Run the compile command.
pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    let graph = shuttlekit_codec::load(&args.file)?;
    let image = compile_waveform(&graph);

    println!(
        "{} edges, {} samples",
        image.lookup.len(),
        image.samples.len()
    );
    println!("{:>4}  {:>8}  {:>8}  {:>6}  {:>4}  {:>4}", "edge", "offset", "count", "idle", "dir", "wait");
    for (i, entry) in image.lookup.iter().enumerate() {
        println!(
            "{i:>4}  {:>8}  {:>8}  {:>6}  {:>4}  {:>4}",
            entry.offset, entry.sample_count, entry.idle_count, entry.direction, entry.wait
        );
    }

    if let Some(path) = args.output {
        let mut text = String::new();
        for sample in &image.samples {
            writeln!(text, "{sample}")?;
        }
        std::fs::write(&path, text)?;
        println!("wrote {} samples to {}", image.samples.len(), path.display());
    }

    Ok(())
}
