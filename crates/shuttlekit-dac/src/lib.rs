//! Shuttlekit DAC - waveform upload and route execution
//!
//! The hardware-facing half of the shuttling engine. The core crate decides
//! *where* to go; this crate turns the decision into DAC artifacts:
//!
//! - [`compile_waveform`] flattens a whole graph into one contiguous sample
//!   buffer plus a per-edge lookup table ([`WaveformImage`]).
//! - [`DacDriver`] is the upload/trigger seam to real hardware;
//!   [`MockDacDriver`] records calls for tests.
//! - [`RouteCompiler`] plans routes, renders their playback streams
//!   ([`render_route`]), keeps the driver synchronized with the graph's
//!   generation, and fires the trigger.
//!
//! # Example
//!
//! ```rust
//! use shuttlekit_core::{RouteKey, ShuttleEdge, ShuttlingGraph};
//! use shuttlekit_dac::{MockDacDriver, RouteCompiler};
//!
//! let mut graph = ShuttlingGraph::new();
//! graph.add_edge(ShuttleEdge::new("loading", "readout", 0.0, 10.0).with_steps(1.0))?;
//!
//! let mut compiler = RouteCompiler::new(MockDacDriver::new());
//! let plan = compiler.shuttle(
//!     &mut graph,
//!     Some(RouteKey::Node("loading".into())),
//!     RouteKey::Node("readout".into()),
//!     false,
//! )?;
//! assert_eq!(plan.steps.len(), 1);
//! assert_eq!(compiler.driver().triggers, 1);
//! # Ok::<(), shuttlekit_dac::DacError>(())
//! ```

mod compiler;
mod driver;
mod error;
mod waveform;

pub use compiler::{RouteCompiler, render_route};
pub use driver::{DacDriver, MockDacDriver};
pub use error::DacError;
pub use waveform::{LookupEntry, WaveformImage, compile_waveform};
