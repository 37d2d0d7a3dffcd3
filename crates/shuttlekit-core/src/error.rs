//! Error types for the shuttling engine.
//!
//! Structural failures (endpoint conflicts, invalid envelope lengths) are
//! rejected at the mutator boundary with the graph unchanged; planning
//! failures surface to the caller. No partial mutation is ever committed.

use core::fmt;
use thiserror::Error;

/// Which side of a route request a key belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteSide {
    /// The origin of the requested shuttle.
    From,
    /// The destination of the requested shuttle.
    To,
}

impl fmt::Display for RouteSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteSide::From => write!(f, "from"),
            RouteSide::To => write!(f, "to"),
        }
    }
}

/// Errors produced by graph mutation and route planning.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// The edge index does not refer to an edge of the graph.
    #[error("edge index {0} is out of range")]
    EdgeOutOfRange(usize),

    /// A line coordinate is already bound to a different node name.
    #[error("line {line} is already assigned to node '{existing}', cannot bind it to '{requested}'")]
    LineConflict {
        /// The contested line coordinate.
        line: f64,
        /// Name currently bound at that line.
        existing: String,
        /// Name the rejected mutation tried to bind.
        requested: String,
    },

    /// A node name is already pinned at a different line coordinate.
    #[error("node '{name}' is already pinned at line {existing}, cannot also appear at {requested}")]
    NameConflict {
        /// The contested node name.
        name: String,
        /// Line where the node currently lives.
        existing: f64,
        /// Line the rejected mutation tried to use.
        requested: f64,
    },

    /// Envelope lengths would consume the whole edge:
    /// `start_length + stop_length` must stay below the nominal sample count.
    #[error("envelope lengths {start_length} + {stop_length} exceed the edge sample budget ({sample_count} samples)")]
    InvalidEnvelopeLength {
        /// Requested leading envelope length.
        start_length: usize,
        /// Requested trailing envelope length.
        stop_length: usize,
        /// Nominal sample count of the edge.
        sample_count: f64,
    },

    /// A route key matched neither a node name nor (when permitted) a point
    /// on any edge.
    #[error("no node or edge matches the {side} key '{key}'")]
    NoSuchNode {
        /// Side of the request the key came from.
        side: RouteSide,
        /// Textual form of the offending key.
        key: String,
    },

    /// The graph is disconnected across the requested endpoints.
    #[error("no route from '{from}' to '{to}'")]
    NoPath {
        /// Resolved origin of the request.
        from: String,
        /// Resolved destination of the request.
        to: String,
    },
}
