//! Shuttlekit Codec - graph file persistence
//!
//! Loads and saves shuttling graphs as TOML documents with a stable
//! attribute vocabulary, so files survive engine upgrades and unknown
//! attributes written by newer tools are ignored rather than rejected.
//!
//! Loading rebuilds the graph through the engine's own mutators: a file
//! that names two nodes on one line, reuses a name at two lines, or
//! overcommits an envelope budget fails with the index of the offending
//! edge record, and no partially built graph is ever returned.
//!
//! # Example
//!
//! ```rust,no_run
//! use shuttlekit_codec::{load, save};
//!
//! let graph = load("trap.toml")?;
//! save(&graph, "trap-copy.toml")?;
//! # Ok::<(), shuttlekit_codec::CodecError>(())
//! ```

mod document;
mod error;

use std::path::Path;

use shuttlekit_core::ShuttlingGraph;

pub use document::{
    ENVELOPE_LINEAR, ENVELOPE_NONE, ENVELOPE_SINE_SQUARE, EdgeRecord, GraphDocument, envelope_name,
};
pub use error::CodecError;

/// Loads a graph from a TOML file.
pub fn load(path: impl AsRef<Path>) -> Result<ShuttlingGraph, CodecError> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).map_err(|e| CodecError::read_file(path, e))?;
    from_toml(&content)
}

/// Loads a graph from a TOML string.
pub fn from_toml(toml_str: &str) -> Result<ShuttlingGraph, CodecError> {
    let document: GraphDocument = toml::from_str(toml_str)?;
    document.into_graph()
}

/// Saves a graph to a TOML file.
pub fn save(graph: &ShuttlingGraph, path: impl AsRef<Path>) -> Result<(), CodecError> {
    let path = path.as_ref();
    let content = to_toml(graph)?;
    std::fs::write(path, content).map_err(|e| CodecError::write_file(path, e))?;
    Ok(())
}

/// Serializes a graph to a TOML string.
pub fn to_toml(graph: &ShuttlingGraph) -> Result<String, CodecError> {
    Ok(toml::to_string_pretty(&GraphDocument::from_graph(graph))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuttlekit_core::{EnvelopeKind, ShuttleEdge};

    fn sample_graph() -> ShuttlingGraph {
        let mut graph = ShuttlingGraph::new();
        graph
            .add_edge(
                ShuttleEdge::new("loading", "transport", 0.0, 20.0)
                    .with_steps(1.0)
                    .with_idle_count(2)
                    .with_hardware_flags(1, 3)
                    .with_envelopes(EnvelopeKind::SineSquared, 3, EnvelopeKind::LinearRamp, 4)
                    .unwrap(),
            )
            .unwrap();
        graph
            .add_edge(ShuttleEdge::new("transport", "readout", 20.0, 30.0).with_steps(2.0))
            .unwrap();
        graph.set_position(20.0);
        graph
    }

    #[test]
    fn file_round_trip_preserves_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trap.toml");

        let original = sample_graph();
        save(&original, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded.len(), original.len());
        for (a, b) in loaded.edges().zip(original.edges()) {
            assert_eq!(a, b);
        }
        assert_eq!(loaded.current_position(), Some(20.0));
        assert_eq!(loaded.current_position_name(), Some("transport"));
    }

    #[test]
    fn stable_attribute_names_appear_in_the_output() {
        let text = to_toml(&sample_graph()).unwrap();
        for needle in [
            "currentPosition = 20.0",
            "currentPositionName = \"transport\"",
            "[[ShuttleEdge]]",
            "startName = \"loading\"",
            "idleCount = 2",
            "_startType = \"Sine square\"",
            "_stopType = \"Linear\"",
            "startLength = 3",
            "direction = 1",
            "wait = 3",
        ] {
            assert!(text.contains(needle), "missing `{needle}` in:\n{text}");
        }
    }

    #[test]
    fn missing_attributes_take_engine_defaults() {
        let graph = from_toml(
            r#"
            [[ShuttleEdge]]
            startName = "A"
            stopName = "B"
            startLine = 0.0
            stopLine = 5.0
            "#,
        )
        .unwrap();

        let edge = graph.edge(0).unwrap();
        assert_eq!(edge.steps(), 0.0);
        assert_eq!(edge.idle_count(), 0);
        assert_eq!(edge.start_type(), EnvelopeKind::None);
        assert_eq!(edge.start_length(), 0);
        assert_eq!(edge.direction(), 0);
        assert_eq!(edge.wait(), 0);
        assert!(graph.current_position().is_none());
    }

    #[test]
    fn unknown_attributes_are_ignored() {
        let graph = from_toml(
            r#"
            futureKnob = 42

            [[ShuttleEdge]]
            startName = "A"
            stopName = "B"
            startLine = 0.0
            stopLine = 5.0
            steps = 1.0
            futureEdgeKnob = "yes"
            "#,
        )
        .unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn inconsistent_documents_fail_with_the_edge_index() {
        let err = from_toml(
            r#"
            [[ShuttleEdge]]
            startName = "A"
            stopName = "B"
            startLine = 0.0
            stopLine = 5.0

            [[ShuttleEdge]]
            startName = "A"
            stopName = "C"
            startLine = 9.0
            stopLine = 11.0
            "#,
        )
        .unwrap_err();
        // A is pinned at line 0 by edge 0.
        assert!(matches!(err, CodecError::Graph { edge: 1, .. }));
    }

    #[test]
    fn overcommitted_envelope_budget_is_rejected_on_load() {
        let err = from_toml(
            r#"
            [[ShuttleEdge]]
            startName = "A"
            stopName = "B"
            startLine = 0.0
            stopLine = 5.0
            steps = 1.0
            _startType = "Linear"
            startLength = 6
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::Graph { edge: 0, .. }));
    }

    #[test]
    fn envelope_lengths_survive_a_none_kind() {
        // A stored length with kind "" must round-trip untouched.
        let mut graph = ShuttlingGraph::new();
        graph
            .add_edge(ShuttleEdge::new("A", "B", 0.0, 20.0).with_steps(1.0))
            .unwrap();
        graph.set_start_length(0, 3).unwrap();

        let reloaded = from_toml(&to_toml(&graph).unwrap()).unwrap();
        let edge = reloaded.edge(0).unwrap();
        assert_eq!(edge.start_type(), EnvelopeKind::None);
        assert_eq!(edge.start_length(), 3);
    }
}
