//! Display graph file contents.

use clap::Args;
use shuttlekit_codec::envelope_name;
use shuttlekit_core::EnvelopeKind;

/// Display graph file information.
#[derive(Args)]
pub struct InspectArgs {
    /// Path to the graph TOML file
    pub file: std::path::PathBuf,
}

/// Run the inspect command.
pub fn run(args: InspectArgs) -> anyhow::Result<()> {
    let graph = shuttlekit_codec::load(&args.file)?;

    println!("File:  {}", args.file.display());
    println!("Edges: {}", graph.len());

    let mut nodes: Vec<(f64, String)> = Vec::new();
    for edge in graph.edges() {
        for (line, name) in [
            (edge.start_line(), edge.start_name()),
            (edge.stop_line(), edge.stop_name()),
        ] {
            if !nodes.iter().any(|(_, n)| n == name) {
                nodes.push((line, name.to_owned()));
            }
        }
    }
    nodes.sort_by(|a, b| a.0.total_cmp(&b.0));

    println!("\nNodes:");
    for (line, name) in &nodes {
        println!("  {name} @ line {line}");
    }

    println!("\nEdges:");
    for (i, edge) in graph.edges().enumerate() {
        let total_us = edge.total_time().as_secs_f64() * 1e6;
        println!(
            "  [{i}] {} ({}) -> {} ({})  steps {}  samples {}  {:.1} µs",
            edge.start_name(),
            edge.start_line(),
            edge.stop_name(),
            edge.stop_line(),
            edge.steps(),
            edge.total_sample_count(),
            total_us,
        );
        if edge.start_type() != EnvelopeKind::None || edge.stop_type() != EnvelopeKind::None {
            println!(
                "        envelopes: start '{}' ({}), stop '{}' ({})",
                envelope_name(edge.start_type()),
                edge.start_length(),
                envelope_name(edge.stop_type()),
                edge.stop_length(),
            );
        }
    }

    if let Some(line) = graph.current_position() {
        match graph.current_position_name() {
            Some(name) => println!("\nPosition: line {line} ({name})"),
            None => println!("\nPosition: line {line}"),
        }
    }

    Ok(())
}
