//! The shuttling graph: ordered edges, multigraph overlay, route planning.
//!
//! [`ShuttlingGraph`] owns the user-visible ordered edge list and keeps three
//! derived structures coherent through every mutation: a name-keyed
//! multigraph (parallel edges allowed, weight `|stop_line - start_line|`), a
//! line-to-name lookup for endpoint matching, and the tracked current
//! position. Mutators validate first, commit all derived state, and only then
//! deliver buffered change events.
//!
//! Route planning runs Dijkstra over the multigraph; requests may start or
//! end at an arbitrary point on an edge, in which case the planner enumerates
//! the candidate node endpoints of the anchoring edge and keeps the candidate
//! with the fewest hops.

mod adjacency;
mod planner;
mod shuttling;

pub use planner::{PartialSegment, PathStep, RouteKey, RoutePlan};
pub use shuttling::ShuttlingGraph;

/// Stable identity of an edge within the multigraph.
///
/// Keys are assigned sequentially and never reused, so an edge keeps its
/// identity across endpoint edits; only its weight is recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub(crate) u32);

impl EdgeKey {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}
