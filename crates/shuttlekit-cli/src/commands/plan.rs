//! Plan a shuttle route between two positions.

use clap::Args;
use shuttlekit_core::RouteKey;
use shuttlekit_dac::render_route;

/// Plan a route through a graph file.
#[derive(Args)]
pub struct PlanArgs {
    /// Path to the graph TOML file
    pub file: std::path::PathBuf,

    /// Route origin: a node name, or a line coordinate with --position
    pub from: String,

    /// Route destination: a node name, or a line coordinate with --position
    pub to: String,

    /// Accept raw line coordinates as route keys
    #[arg(long)]
    pub position: bool,

    /// Emit the plan as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_key(text: &str, allow_position: bool) -> RouteKey {
    if allow_position
        && let Ok(line) = text.parse::<f64>()
    {
        RouteKey::Line(line)
    } else {
        RouteKey::Node(text.to_owned())
    }
}

/// Run the plan command.
pub fn run(args: PlanArgs) -> anyhow::Result<()> {
    let graph = shuttlekit_codec::load(&args.file)?;
    tracing::debug!(file = %args.file.display(), edges = graph.len(), "graph loaded");
    let plan = graph.shuttle_path(
        Some(parse_key(&args.from, args.position)),
        parse_key(&args.to, args.position),
        args.position,
    )?;
    let samples = render_route(&graph, &plan).len();

    if args.json {
        let value = serde_json::json!({
            "from": args.from,
            "to": args.to,
            "samples": samples,
            "steps": plan
                .steps
                .iter()
                .map(|s| serde_json::json!({
                    "from": s.from,
                    "to": s.to,
                    "edge": s.edge_index,
                }))
                .collect::<Vec<_>>(),
            "preShuttle": plan.pre_shuttle.as_ref().map(|p| serde_json::json!({
                "edge": p.edge_index,
                "line": p.line,
                "node": p.node,
            })),
            "postShuttle": plan.post_shuttle.as_ref().map(|p| serde_json::json!({
                "edge": p.edge_index,
                "line": p.line,
                "node": p.node,
            })),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if plan.is_empty() {
        println!("{} and {} resolve to the same position; nothing to do", args.from, args.to);
        return Ok(());
    }
    if let Some(pre) = &plan.pre_shuttle {
        println!("pre-shuttle:  line {} -> {}  (edge {})", pre.line, pre.node, pre.edge_index);
    }
    for step in &plan.steps {
        println!("hop:          {} -> {}  (edge {})", step.from, step.to, step.edge_index);
    }
    if let Some(post) = &plan.post_shuttle {
        println!("post-shuttle: {} -> line {}  (edge {})", post.node, post.line, post.edge_index);
    }
    println!("{samples} samples total");

    Ok(())
}
