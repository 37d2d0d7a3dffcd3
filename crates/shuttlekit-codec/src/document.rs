//! The on-disk document model.
//!
//! Attribute names are part of the stable file format and never change:
//! `startName`, `stopName`, `startLine`, `stopLine`, `steps`, `idleCount`,
//! `_startType`, `_stopType`, `startLength`, `stopLength`, `direction`,
//! `wait`, plus the top-level `currentPosition` / `currentPositionName`
//! pair. Unknown attributes are ignored on load; missing ones take the
//! engine's defaults.

use serde::{Deserialize, Serialize};

use shuttlekit_core::{EnvelopeKind, ShuttleEdge, ShuttlingGraph};

use crate::error::CodecError;

/// Stable identifier for [`EnvelopeKind::None`].
pub const ENVELOPE_NONE: &str = "";

/// Stable identifier for [`EnvelopeKind::SineSquared`].
pub const ENVELOPE_SINE_SQUARE: &str = "Sine square";

/// Stable identifier for [`EnvelopeKind::LinearRamp`].
pub const ENVELOPE_LINEAR: &str = "Linear";

/// Maps an envelope kind to its stable file identifier.
pub fn envelope_name(kind: EnvelopeKind) -> &'static str {
    match kind {
        EnvelopeKind::None => ENVELOPE_NONE,
        EnvelopeKind::SineSquared => ENVELOPE_SINE_SQUARE,
        EnvelopeKind::LinearRamp => ENVELOPE_LINEAR,
    }
}

fn envelope_kind(value: &str, edge: usize) -> Result<EnvelopeKind, CodecError> {
    match value {
        ENVELOPE_NONE => Ok(EnvelopeKind::None),
        ENVELOPE_SINE_SQUARE => Ok(EnvelopeKind::SineSquared),
        ENVELOPE_LINEAR => Ok(EnvelopeKind::LinearRamp),
        other => Err(CodecError::UnknownEnvelope {
            edge,
            value: other.to_owned(),
        }),
    }
}

/// A whole graph file: the optional current position and the ordered edge
/// records.
///
/// # TOML Format
///
/// ```toml
/// currentPosition = 1.0
/// currentPositionName = "A"
///
/// [[ShuttleEdge]]
/// startName = "A"
/// stopName = "B"
/// startLine = 0.0
/// stopLine = 20.0
/// steps = 1.0
/// idleCount = 0
/// _startType = "Sine square"
/// _stopType = ""
/// startLength = 3
/// stopLength = 3
/// direction = 0
/// wait = 0
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GraphDocument {
    /// Tracked position on the line axis, if one was set.
    #[serde(
        rename = "currentPosition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_position: Option<f64>,

    /// Node name at the tracked position, if it sat on a node.
    #[serde(
        rename = "currentPositionName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub current_position_name: Option<String>,

    /// Edge records in graph insertion order.
    #[serde(rename = "ShuttleEdge", default)]
    pub edges: Vec<EdgeRecord>,
}

/// One serialized edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeRecord {
    /// Name of the start node.
    #[serde(rename = "startName")]
    pub start_name: String,

    /// Name of the stop node.
    #[serde(rename = "stopName")]
    pub stop_name: String,

    /// Line coordinate of the start node.
    #[serde(rename = "startLine")]
    pub start_line: f64,

    /// Line coordinate of the stop node.
    #[serde(rename = "stopLine")]
    pub stop_line: f64,

    /// Central sweep density in samples per unit line.
    #[serde(default)]
    pub steps: f64,

    /// Idle padding applied to every sample.
    #[serde(rename = "idleCount", default)]
    pub idle_count: u32,

    /// Leading envelope identifier.
    #[serde(rename = "_startType", default)]
    pub start_type: String,

    /// Trailing envelope identifier.
    #[serde(rename = "_stopType", default)]
    pub stop_type: String,

    /// Nominal leading envelope length.
    #[serde(rename = "startLength", default)]
    pub start_length: usize,

    /// Nominal trailing envelope length.
    #[serde(rename = "stopLength", default)]
    pub stop_length: usize,

    /// Hardware `direction` flag (uninterpreted pass-through).
    #[serde(default)]
    pub direction: i32,

    /// Hardware `wait` flag (uninterpreted pass-through).
    #[serde(default)]
    pub wait: u32,
}

impl EdgeRecord {
    /// Captures an engine edge as a serializable record.
    pub fn from_edge(edge: &ShuttleEdge) -> Self {
        Self {
            start_name: edge.start_name().to_owned(),
            stop_name: edge.stop_name().to_owned(),
            start_line: edge.start_line(),
            stop_line: edge.stop_line(),
            steps: edge.steps(),
            idle_count: edge.idle_count(),
            start_type: envelope_name(edge.start_type()).to_owned(),
            stop_type: envelope_name(edge.stop_type()).to_owned(),
            start_length: edge.start_length(),
            stop_length: edge.stop_length(),
            direction: edge.direction(),
            wait: edge.wait(),
        }
    }

    /// Rebuilds the engine edge, validating envelope identifiers, finiteness
    /// of the line coordinates, and the envelope length budget. `index` is
    /// the record's position in the document, used for error reporting.
    pub fn to_edge(&self, index: usize) -> Result<ShuttleEdge, CodecError> {
        if !self.start_line.is_finite() {
            return Err(CodecError::NonFiniteLine {
                edge: index,
                attribute: "startLine",
            });
        }
        if !self.stop_line.is_finite() {
            return Err(CodecError::NonFiniteLine {
                edge: index,
                attribute: "stopLine",
            });
        }
        let start_type = envelope_kind(&self.start_type, index)?;
        let stop_type = envelope_kind(&self.stop_type, index)?;

        ShuttleEdge::new(
            self.start_name.clone(),
            self.stop_name.clone(),
            self.start_line,
            self.stop_line,
        )
        .with_steps(self.steps)
        .with_idle_count(self.idle_count)
        .with_hardware_flags(self.direction, self.wait)
        .with_envelopes(start_type, self.start_length, stop_type, self.stop_length)
        .map_err(|source| CodecError::Graph {
            edge: index,
            source,
        })
    }
}

impl GraphDocument {
    /// Captures a graph as a serializable document.
    pub fn from_graph(graph: &ShuttlingGraph) -> Self {
        Self {
            current_position: graph.current_position(),
            current_position_name: graph.current_position_name().map(str::to_owned),
            edges: graph.edges().map(EdgeRecord::from_edge).collect(),
        }
    }

    /// Rebuilds a fresh graph through the engine's public mutators.
    ///
    /// The first record the engine rejects aborts the load with its index;
    /// no partially built graph escapes. The current position is restored
    /// name-first, falling back to the raw line when the name is absent or
    /// no longer resolves to a node.
    pub fn into_graph(self) -> Result<ShuttlingGraph, CodecError> {
        let mut graph = ShuttlingGraph::new();
        for (index, record) in self.edges.iter().enumerate() {
            let edge = record.to_edge(index)?;
            graph
                .add_edge(edge)
                .map_err(|source| CodecError::Graph { edge: index, source })?;
        }

        let restored_line = self
            .current_position_name
            .as_deref()
            .and_then(|name| graph.node_line(name))
            .or(self.current_position);
        if let Some(line) = restored_line {
            graph.set_position(line);
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(a: &str, b: &str, start: f64, stop: f64) -> EdgeRecord {
        EdgeRecord {
            start_name: a.to_owned(),
            stop_name: b.to_owned(),
            start_line: start,
            stop_line: stop,
            steps: 1.0,
            idle_count: 0,
            start_type: String::new(),
            stop_type: String::new(),
            start_length: 0,
            stop_length: 0,
            direction: 0,
            wait: 0,
        }
    }

    #[test]
    fn edge_record_round_trips_through_the_engine() {
        let mut original = record("A", "B", 0.0, 20.0);
        original.steps = 2.0;
        original.idle_count = 7;
        original.start_type = ENVELOPE_SINE_SQUARE.to_owned();
        original.start_length = 3;
        original.direction = 1;
        original.wait = 4;

        let edge = original.to_edge(0).unwrap();
        assert_eq!(EdgeRecord::from_edge(&edge), original);
    }

    #[test]
    fn unknown_envelope_identifiers_are_rejected_with_the_index() {
        let mut bad = record("A", "B", 0.0, 1.0);
        bad.stop_type = "Gauss".to_owned();
        let err = bad.to_edge(5).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownEnvelope { edge: 5, ref value } if value == "Gauss"
        ));
    }

    #[test]
    fn non_finite_lines_are_a_parse_error() {
        let mut bad = record("A", "B", f64::NAN, 1.0);
        assert!(matches!(
            bad.to_edge(2),
            Err(CodecError::NonFiniteLine {
                edge: 2,
                attribute: "startLine"
            })
        ));
        bad.start_line = 0.0;
        bad.stop_line = f64::INFINITY;
        assert!(matches!(
            bad.to_edge(2),
            Err(CodecError::NonFiniteLine {
                edge: 2,
                attribute: "stopLine"
            })
        ));
    }

    #[test]
    fn position_restoration_prefers_the_node_name() {
        let mut doc = GraphDocument {
            edges: vec![record("A", "B", 0.0, 1.0)],
            // A stale raw line together with a live name: the name wins.
            current_position: Some(0.25),
            current_position_name: Some("B".to_owned()),
        };
        let graph = doc.clone().into_graph().unwrap();
        assert_eq!(graph.current_position(), Some(1.0));
        assert_eq!(graph.current_position_name(), Some("B"));

        // Without a resolvable name the raw line is used as-is.
        doc.current_position_name = Some("gone".to_owned());
        let graph = doc.into_graph().unwrap();
        assert_eq!(graph.current_position(), Some(0.25));
        assert_eq!(graph.current_position_name(), None);
    }

    #[test]
    fn first_rejected_record_aborts_with_its_index() {
        let doc = GraphDocument {
            current_position: None,
            current_position_name: None,
            edges: vec![
                record("A", "B", 0.0, 1.0),
                // Line 1.0 is already named B.
                record("C", "D", 1.0, 2.0),
            ],
        };
        let err = doc.into_graph().unwrap_err();
        assert!(matches!(err, CodecError::Graph { edge: 1, .. }));
    }
}
