//! [`ShuttlingGraph`]: the ordered edge collection and its mutation API.
//!
//! Every mutator follows the same discipline: validate against the
//! invariants, commit the edge list and all derived structures (multigraph,
//! line lookup, generation counter, current-position name), and only then
//! deliver the buffered change events. A failed mutation changes nothing and
//! delivers nothing.

use std::collections::HashMap;

use crate::edge::ShuttleEdge;
use crate::envelope::EnvelopeKind;
use crate::error::GraphError;
use crate::events::{ChangeObservables, GraphEvent, SubscriberId};
use crate::line::LineKey;

use super::EdgeKey;
use super::adjacency::MultiGraph;

/// An edge of the ordered list together with its stable multigraph key.
#[derive(Debug)]
pub(crate) struct EdgeEntry {
    pub key: EdgeKey,
    pub edge: ShuttleEdge,
}

/// Ordered collection of shuttle edges with a multigraph overlay, endpoint
/// lookup, live position tracking, and change notification.
///
/// The edge order is user-visible: it is the serialization order and the
/// deterministic tie-breaker when several edges share endpoints.
#[derive(Default)]
pub struct ShuttlingGraph {
    pub(crate) edges: Vec<EdgeEntry>,
    pub(crate) multigraph: MultiGraph,
    pub(crate) node_lookup: HashMap<LineKey, String>,
    pub(crate) current_position: Option<f64>,
    pub(crate) current_position_name: Option<String>,
    observables: ChangeObservables,
    generation: u64,
    synced_generation: u64,
    next_key: u32,
}

impl std::fmt::Debug for ShuttlingGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShuttlingGraph")
            .field("edges", &self.edges)
            .field("multigraph", &self.multigraph)
            .field("node_lookup", &self.node_lookup)
            .field("current_position", &self.current_position)
            .field("current_position_name", &self.current_position_name)
            .field("generation", &self.generation)
            .field("synced_generation", &self.synced_generation)
            .field("next_key", &self.next_key)
            .finish_non_exhaustive()
    }
}

impl ShuttlingGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &ShuttleEdge> {
        self.edges.iter().map(|entry| &entry.edge)
    }

    /// The edge at `index`, if any.
    pub fn edge(&self, index: usize) -> Option<&ShuttleEdge> {
        self.edges.get(index).map(|entry| &entry.edge)
    }

    /// The stable key of the edge at `index`, if any.
    pub fn edge_key(&self, index: usize) -> Option<EdgeKey> {
        self.edges.get(index).map(|entry| entry.key)
    }

    /// Name of the node at `line`, if the line coincides with an endpoint.
    pub fn node_name(&self, line: f64) -> Option<&str> {
        self.node_lookup.get(&LineKey::new(line)).map(String::as_str)
    }

    /// Line of the named node, if the name is in use.
    pub fn node_line(&self, name: &str) -> Option<f64> {
        self.edges.iter().find_map(|entry| {
            if entry.edge.start_name() == name {
                Some(entry.edge.start_line())
            } else if entry.edge.stop_name() == name {
                Some(entry.edge.stop_line())
            } else {
                None
            }
        })
    }

    /// True if `name` is a node of the multigraph.
    pub fn has_node(&self, name: &str) -> bool {
        self.multigraph.contains(name)
    }

    /// The tracked position on the line axis, if one has been set.
    pub fn current_position(&self) -> Option<f64> {
        self.current_position
    }

    /// The node name at the tracked position; set iff the position coincides
    /// with some endpoint line.
    pub fn current_position_name(&self) -> Option<&str> {
        self.current_position_name.as_deref()
    }

    /// Attaches a `graph_changed` subscriber.
    pub fn on_graph_changed(&mut self, callback: impl FnMut() + 'static) -> SubscriberId {
        self.observables.on_graph_changed(callback)
    }

    /// Attaches a `position_changed` subscriber.
    pub fn on_position_changed(
        &mut self,
        callback: impl FnMut(f64, Option<&str>) + 'static,
    ) -> SubscriberId {
        self.observables.on_position_changed(callback)
    }

    /// Detaches a subscriber from either channel.
    pub fn detach(&mut self, id: SubscriberId) -> bool {
        self.observables.detach(id)
    }

    /// Monotonic counter advanced by every structural mutation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if the graph changed since [`mark_synced`](Self::mark_synced).
    pub fn is_dirty(&self) -> bool {
        self.generation != self.synced_generation
    }

    /// Records that the hardware-side data matches the current generation.
    pub fn mark_synced(&mut self) {
        self.synced_generation = self.generation;
    }

    /// Appends an edge, enforcing endpoint coherence: a line may carry only
    /// one name and a name may live at only one line.
    pub fn add_edge(&mut self, edge: ShuttleEdge) -> Result<(), GraphError> {
        let start_key = LineKey::new(edge.start_line());
        let stop_key = LineKey::new(edge.stop_line());

        self.check_endpoint(edge.start_name(), edge.start_line(), start_key)?;
        self.check_endpoint(edge.stop_name(), edge.stop_line(), stop_key)?;
        // The two new endpoints must also agree with each other.
        if edge.start_name() == edge.stop_name() && start_key != stop_key {
            return Err(GraphError::NameConflict {
                name: edge.stop_name().to_owned(),
                existing: edge.start_line(),
                requested: edge.stop_line(),
            });
        }
        if start_key == stop_key && edge.start_name() != edge.stop_name() {
            return Err(GraphError::LineConflict {
                line: edge.stop_line(),
                existing: edge.start_name().to_owned(),
                requested: edge.stop_name().to_owned(),
            });
        }

        let key = EdgeKey(self.next_key);
        self.next_key += 1;
        self.multigraph
            .insert(edge.start_name(), edge.stop_name(), key, edge.weight());
        self.node_lookup
            .insert(start_key, edge.start_name().to_owned());
        self.node_lookup
            .insert(stop_key, edge.stop_name().to_owned());
        #[cfg(feature = "tracing")]
        tracing::debug!(
            start = edge.start_name(),
            stop = edge.stop_name(),
            key = key.index(),
            "edge added"
        );
        self.edges.push(EdgeEntry { key, edge });
        self.commit_structural();
        Ok(())
    }

    /// Removes the edge at `index` and returns it. Endpoints left without
    /// incident edges disappear from the multigraph and the line lookup.
    pub fn remove_edge(&mut self, index: usize) -> Result<ShuttleEdge, GraphError> {
        if index >= self.edges.len() {
            return Err(GraphError::EdgeOutOfRange(index));
        }
        let entry = self.edges.remove(index);
        self.multigraph.remove(entry.key);
        self.rebuild_node_lookup();
        self.commit_structural();
        Ok(entry.edge)
    }

    /// Renames the start node of the edge at `index`. No-op if unchanged.
    ///
    /// Inconsistent renames are rejected: the endpoint line must not be
    /// shared with any other endpoint (the rename would bind the line to two
    /// names), and the new name must not be pinned at a different line.
    pub fn set_start_name(&mut self, index: usize, name: &str) -> Result<(), GraphError> {
        self.rename_endpoint(index, Endpoint::Start, name)
    }

    /// Renames the stop node of the edge at `index`. See
    /// [`set_start_name`](Self::set_start_name) for the rejection rules.
    pub fn set_stop_name(&mut self, index: usize, name: &str) -> Result<(), GraphError> {
        self.rename_endpoint(index, Endpoint::Stop, name)
    }

    /// Moves the start endpoint of the edge at `index` to a new line.
    /// Fails if the line is already bound to a different node name.
    pub fn set_start_line(&mut self, index: usize, line: f64) -> Result<(), GraphError> {
        self.move_endpoint(index, Endpoint::Start, line)
    }

    /// Moves the stop endpoint of the edge at `index` to a new line.
    /// Fails if the line is already bound to a different node name.
    pub fn set_stop_line(&mut self, index: usize, line: f64) -> Result<(), GraphError> {
        self.move_endpoint(index, Endpoint::Stop, line)
    }

    /// Sets the sweep density of the edge at `index`.
    pub fn set_steps(&mut self, index: usize, steps: f64) -> Result<(), GraphError> {
        let entry = self.entry_mut(index)?;
        entry.edge.set_steps(steps);
        self.commit_structural();
        Ok(())
    }

    /// Sets the idle count of the edge at `index`.
    pub fn set_idle_count(&mut self, index: usize, idle_count: u32) -> Result<(), GraphError> {
        let entry = self.entry_mut(index)?;
        entry.edge.set_idle_count(idle_count);
        self.commit_structural();
        Ok(())
    }

    /// Sets the leading envelope shape of the edge at `index`.
    pub fn set_start_type(&mut self, index: usize, kind: EnvelopeKind) -> Result<(), GraphError> {
        let entry = self.entry_mut(index)?;
        entry.edge.set_start_type(kind);
        self.commit_structural();
        Ok(())
    }

    /// Sets the trailing envelope shape of the edge at `index`.
    pub fn set_stop_type(&mut self, index: usize, kind: EnvelopeKind) -> Result<(), GraphError> {
        let entry = self.entry_mut(index)?;
        entry.edge.set_stop_type(kind);
        self.commit_structural();
        Ok(())
    }

    /// Sets the leading envelope length of the edge at `index`, enforcing
    /// the envelope budget.
    pub fn set_start_length(&mut self, index: usize, length: usize) -> Result<(), GraphError> {
        let entry = self.entry_mut(index)?;
        entry.edge.set_start_length(length)?;
        self.commit_structural();
        Ok(())
    }

    /// Sets the trailing envelope length of the edge at `index`, enforcing
    /// the envelope budget.
    pub fn set_stop_length(&mut self, index: usize, length: usize) -> Result<(), GraphError> {
        let entry = self.entry_mut(index)?;
        entry.edge.set_stop_length(length)?;
        self.commit_structural();
        Ok(())
    }

    /// Updates the tracked position. Idempotent: the `position_changed`
    /// event fires only when the position or its node name actually changes.
    pub fn set_position(&mut self, line: f64) {
        let name = self
            .node_lookup
            .get(&LineKey::new(line))
            .cloned();
        if self.current_position == Some(line) && self.current_position_name == name {
            return;
        }
        self.current_position = Some(line);
        self.current_position_name.clone_from(&name);
        self.observables
            .dispatch(&[GraphEvent::PositionChanged { line, name }]);
    }

    /// A fresh edge guaranteed not to collide with the existing graph:
    /// names `Start_k` / `Stop_k` with the smallest unused `k`, start line
    /// one above the highest known endpoint (or 1 for an empty graph).
    pub fn get_valid_edge(&self) -> ShuttleEdge {
        let mut k = 0usize;
        let (start_name, stop_name) = loop {
            let start = format!("Start_{k}");
            let stop = format!("Stop_{k}");
            if !self.has_node(&start) && !self.has_node(&stop) {
                break (start, stop);
            }
            k += 1;
        };
        let start_line = self
            .edges
            .iter()
            .flat_map(|entry| [entry.edge.start_line(), entry.edge.stop_line()])
            .fold(f64::NEG_INFINITY, f64::max);
        let start_line = if start_line.is_finite() {
            start_line + 1.0
        } else {
            1.0
        };
        ShuttleEdge::new(start_name, stop_name, start_line, start_line + 1.0)
    }

    // --- internal plumbing ---

    fn entry_mut(&mut self, index: usize) -> Result<&mut EdgeEntry, GraphError> {
        self.edges
            .get_mut(index)
            .ok_or(GraphError::EdgeOutOfRange(index))
    }

    /// Validates one endpoint of a prospective edge against both directions
    /// of the name/line binding.
    fn check_endpoint(&self, name: &str, line: f64, key: LineKey) -> Result<(), GraphError> {
        if let Some(existing) = self.node_lookup.get(&key)
            && existing != name
        {
            return Err(GraphError::LineConflict {
                line,
                existing: existing.clone(),
                requested: name.to_owned(),
            });
        }
        if let Some(existing_line) = self.node_line(name)
            && LineKey::new(existing_line) != key
        {
            return Err(GraphError::NameConflict {
                name: name.to_owned(),
                existing: existing_line,
                requested: line,
            });
        }
        Ok(())
    }

    fn rename_endpoint(
        &mut self,
        index: usize,
        endpoint: Endpoint,
        name: &str,
    ) -> Result<(), GraphError> {
        let entry = self
            .edges
            .get(index)
            .ok_or(GraphError::EdgeOutOfRange(index))?;
        let (old_name, line) = match endpoint {
            Endpoint::Start => (entry.edge.start_name(), entry.edge.start_line()),
            Endpoint::Stop => (entry.edge.stop_name(), entry.edge.stop_line()),
        };
        if old_name == name {
            return Ok(());
        }
        let line_key = LineKey::new(line);
        if let Some(other_name) = self.shared_endpoint(index, endpoint, line_key) {
            return Err(GraphError::LineConflict {
                line,
                existing: other_name,
                requested: name.to_owned(),
            });
        }
        if let Some(existing_line) = self.node_line(name)
            && LineKey::new(existing_line) != line_key
        {
            return Err(GraphError::NameConflict {
                name: name.to_owned(),
                existing: existing_line,
                requested: line,
            });
        }

        let entry = &mut self.edges[index];
        match endpoint {
            Endpoint::Start => entry.edge.set_start_name(name),
            Endpoint::Stop => entry.edge.set_stop_name(name),
        }
        let (key, weight) = (entry.key, entry.edge.weight());
        let (start, stop) = (
            entry.edge.start_name().to_owned(),
            entry.edge.stop_name().to_owned(),
        );
        // Re-seat the edge under its new endpoint names; the old node
        // disappears if this was its last incidence.
        self.multigraph.remove(key);
        self.multigraph.insert(&start, &stop, key, weight);
        self.rebuild_node_lookup();
        self.commit_structural();
        Ok(())
    }

    fn move_endpoint(
        &mut self,
        index: usize,
        endpoint: Endpoint,
        line: f64,
    ) -> Result<(), GraphError> {
        let entry = self
            .edges
            .get(index)
            .ok_or(GraphError::EdgeOutOfRange(index))?;
        let (name, old_line) = match endpoint {
            Endpoint::Start => (entry.edge.start_name(), entry.edge.start_line()),
            Endpoint::Stop => (entry.edge.stop_name(), entry.edge.stop_line()),
        };
        if old_line == line {
            return Ok(());
        }
        if let Some(existing) = self.node_lookup.get(&LineKey::new(line))
            && existing != name
        {
            return Err(GraphError::LineConflict {
                line,
                existing: existing.clone(),
                requested: name.to_owned(),
            });
        }

        let entry = &mut self.edges[index];
        match endpoint {
            Endpoint::Start => entry.edge.set_start_line(line),
            Endpoint::Stop => entry.edge.set_stop_line(line),
        }
        let (key, weight) = (entry.key, entry.edge.weight());
        self.multigraph.set_weight(key, weight);
        self.rebuild_node_lookup();
        self.commit_structural();
        Ok(())
    }

    /// Finds another endpoint (any edge, any side, excluding exactly the one
    /// being edited) that sits on the same line.
    fn shared_endpoint(
        &self,
        skip_index: usize,
        skip_endpoint: Endpoint,
        key: LineKey,
    ) -> Option<String> {
        for (i, entry) in self.edges.iter().enumerate() {
            let skip_start = i == skip_index && skip_endpoint == Endpoint::Start;
            let skip_stop = i == skip_index && skip_endpoint == Endpoint::Stop;
            if !skip_start && LineKey::new(entry.edge.start_line()) == key {
                return Some(entry.edge.start_name().to_owned());
            }
            if !skip_stop && LineKey::new(entry.edge.stop_line()) == key {
                return Some(entry.edge.stop_name().to_owned());
            }
        }
        None
    }

    /// Recomputes the line-to-name lookup from the ordered edge list.
    fn rebuild_node_lookup(&mut self) {
        self.node_lookup.clear();
        for entry in &self.edges {
            self.node_lookup.insert(
                LineKey::new(entry.edge.start_line()),
                entry.edge.start_name().to_owned(),
            );
            self.node_lookup.insert(
                LineKey::new(entry.edge.stop_line()),
                entry.edge.stop_name().to_owned(),
            );
        }
    }

    /// Advances the generation, refreshes the position name against the new
    /// lookup, and delivers the buffered events.
    fn commit_structural(&mut self) {
        self.generation += 1;
        let mut events = vec![GraphEvent::GraphChanged];
        if let Some(line) = self.current_position {
            let name = self.node_lookup.get(&LineKey::new(line)).cloned();
            if name != self.current_position_name {
                self.current_position_name.clone_from(&name);
                events.push(GraphEvent::PositionChanged { line, name });
            }
        }
        self.observables.dispatch(&events);
    }
}

/// Which end of an edge a mutator targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Endpoint {
    Start,
    Stop,
}
