//! Shuttlekit Core - the shuttling graph engine
//!
//! This crate compiles a user-defined graph of voltage waveform segments into
//! the sample streams that drive DAC hardware to move ions between trap
//! zones. It is a purely geometric/temporal compiler: no real-time
//! scheduling, no physics — the hardware plays back what this crate emits.
//!
//! # Core Abstractions
//!
//! - [`ShuttleEdge`] - a waveform segment between two named trap positions,
//!   with soft-start/soft-stop envelopes and a uniformly sampled central
//!   sweep. Emits its sample stream via [`ShuttleEdge::line_samples`].
//! - [`EnvelopeKind`] - the envelope strategies (`None`, `SineSquared`,
//!   `LinearRamp`).
//! - [`ShuttlingGraph`] - the ordered edge collection with a multigraph
//!   overlay (parallel edges allowed), endpoint coherence enforcement,
//!   shortest-path planning, and live position tracking.
//! - [`RoutePlan`] - the output of [`ShuttlingGraph::shuttle_path`]: ordered
//!   hops plus partial segments for routes that begin or end in the interior
//!   of an edge.
//! - [`ChangeObservables`] - the two change channels (`graph_changed`,
//!   `position_changed`), delivered only after a mutation has committed.
//!
//! # Concurrency Model
//!
//! Single-threaded cooperative: all operations run on the caller's thread
//! and never block. Sample generation is synchronous and pure. Mutators are
//! not re-entrant — an observer callback must not mutate the same graph.
//!
//! # Example
//!
//! ```rust
//! use shuttlekit_core::{RouteKey, ShuttleEdge, ShuttlingGraph};
//!
//! let mut graph = ShuttlingGraph::new();
//! graph.add_edge(ShuttleEdge::new("loading", "transport", 0.0, 20.0).with_steps(1.0))?;
//! graph.add_edge(ShuttleEdge::new("transport", "readout", 20.0, 30.0).with_steps(2.0))?;
//!
//! let plan = graph.shuttle_path(
//!     Some(RouteKey::Node("loading".into())),
//!     RouteKey::Node("readout".into()),
//!     false,
//! )?;
//! assert_eq!(plan.steps.len(), 2);
//!
//! let samples: Vec<f64> = graph.edge(0).unwrap().line_samples().collect();
//! assert_eq!(samples.len(), 21);
//! # Ok::<(), shuttlekit_core::GraphError>(())
//! ```

pub mod edge;
pub mod envelope;
pub mod error;
pub mod events;
pub mod graph;
pub mod line;

// Re-export main types at crate root
pub use edge::{BASE_SAMPLE_PERIOD, IDLE_UNIT, ShuttleEdge};
pub use envelope::EnvelopeKind;
pub use error::{GraphError, RouteSide};
pub use events::{ChangeObservables, SubscriberId};
pub use graph::{EdgeKey, PartialSegment, PathStep, RouteKey, RoutePlan, ShuttlingGraph};
pub use line::LineKey;
