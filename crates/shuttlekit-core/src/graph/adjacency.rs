//! Name-keyed multigraph overlay and shortest-path search.
//!
//! Nodes are names; incidences carry the owning edge's stable key and its
//! current weight. Parallel edges between the same node pair are kept as
//! separate incidences. The adjacency stores weights itself — they are
//! recomputed here on line edits, never cached on the edge.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use super::EdgeKey;

/// One end of an edge as seen from a node's adjacency list.
#[derive(Clone, Debug)]
struct Incidence {
    neighbor: String,
    key: EdgeKey,
    weight: f64,
}

/// Multigraph over node names with per-incidence weights.
#[derive(Debug, Default)]
pub(crate) struct MultiGraph {
    adjacency: HashMap<String, Vec<Incidence>>,
}

impl MultiGraph {
    /// True if `name` has at least one incident edge.
    pub fn contains(&self, name: &str) -> bool {
        self.adjacency.contains_key(name)
    }

    /// Number of live nodes.
    #[cfg(test)]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Inserts an edge between `a` and `b`. Self-loops get a single incidence.
    pub fn insert(&mut self, a: &str, b: &str, key: EdgeKey, weight: f64) {
        self.adjacency
            .entry(a.to_owned())
            .or_default()
            .push(Incidence {
                neighbor: b.to_owned(),
                key,
                weight,
            });
        if a != b {
            self.adjacency
                .entry(b.to_owned())
                .or_default()
                .push(Incidence {
                    neighbor: a.to_owned(),
                    key,
                    weight,
                });
        }
    }

    /// Removes the edge with the given key; nodes left without incident
    /// edges disappear from the multigraph.
    pub fn remove(&mut self, key: EdgeKey) {
        for incidences in self.adjacency.values_mut() {
            incidences.retain(|inc| inc.key != key);
        }
        self.adjacency.retain(|_, incidences| !incidences.is_empty());
    }

    /// Updates the weight of an edge in place (both directions).
    pub fn set_weight(&mut self, key: EdgeKey, weight: f64) {
        for incidences in self.adjacency.values_mut() {
            for inc in incidences.iter_mut().filter(|inc| inc.key == key) {
                inc.weight = weight;
            }
        }
    }

    /// Minimal-weight node path from `from` to `to`, as the visited node
    /// sequence (inclusive of both ends). Returns `None` when disconnected.
    ///
    /// Equal-distance nodes are settled in insertion (FIFO) order, so the
    /// result is deterministic for a given mutation history.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        if !self.contains(from) || !self.contains(to) {
            return None;
        }
        if from == to {
            return Some(vec![from.to_owned()]);
        }

        let mut dist: HashMap<&str, f64> = HashMap::new();
        let mut prev: HashMap<&str, &str> = HashMap::new();
        let mut heap: BinaryHeap<Reverse<QueueEntry<'_>>> = BinaryHeap::new();
        let mut seq = 0u64;

        dist.insert(from, 0.0);
        heap.push(Reverse(QueueEntry {
            dist: 0.0,
            seq,
            node: from,
        }));

        while let Some(Reverse(entry)) = heap.pop() {
            if entry.node == to {
                break;
            }
            if dist
                .get(entry.node)
                .is_some_and(|&settled| entry.dist > settled)
            {
                continue;
            }
            for inc in &self.adjacency[entry.node] {
                let candidate = entry.dist + inc.weight;
                let improves = dist
                    .get(inc.neighbor.as_str())
                    .is_none_or(|&known| candidate < known);
                if improves {
                    dist.insert(&inc.neighbor, candidate);
                    prev.insert(&inc.neighbor, entry.node);
                    seq += 1;
                    heap.push(Reverse(QueueEntry {
                        dist: candidate,
                        seq,
                        node: &inc.neighbor,
                    }));
                }
            }
        }

        if !prev.contains_key(to) {
            return None;
        }
        let mut path = vec![to.to_owned()];
        let mut cursor = to;
        while let Some(&previous) = prev.get(cursor) {
            path.push(previous.to_owned());
            cursor = previous;
        }
        path.reverse();
        Some(path)
    }
}

/// Priority-queue entry ordered by distance, then by insertion sequence.
#[derive(Debug)]
struct QueueEntry<'a> {
    dist: f64,
    seq: u64,
    node: &'a str,
}

impl PartialEq for QueueEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry<'_> {}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: u32) -> EdgeKey {
        EdgeKey(k)
    }

    #[test]
    fn chain_path_is_found_in_order() {
        let mut graph = MultiGraph::default();
        graph.insert("A", "B", key(0), 1.0);
        graph.insert("B", "C", key(1), 1.0);
        graph.insert("C", "D", key(2), 1.0);

        let path = graph.shortest_path("A", "D").unwrap();
        assert_eq!(path, ["A", "B", "C", "D"]);
    }

    #[test]
    fn weight_governs_route_choice() {
        let mut graph = MultiGraph::default();
        graph.insert("A", "B", key(0), 10.0);
        graph.insert("A", "C", key(1), 1.0);
        graph.insert("C", "B", key(2), 1.0);

        let path = graph.shortest_path("A", "B").unwrap();
        assert_eq!(path, ["A", "C", "B"]);
    }

    #[test]
    fn disconnected_components_yield_none() {
        let mut graph = MultiGraph::default();
        graph.insert("A", "B", key(0), 1.0);
        graph.insert("C", "D", key(1), 1.0);
        assert!(graph.shortest_path("A", "D").is_none());
        assert!(graph.shortest_path("A", "Z").is_none());
    }

    #[test]
    fn removing_last_incidence_drops_the_node() {
        let mut graph = MultiGraph::default();
        graph.insert("A", "B", key(0), 1.0);
        graph.insert("B", "C", key(1), 1.0);
        graph.remove(key(1));
        assert!(!graph.contains("C"));
        assert!(graph.contains("A") && graph.contains("B"));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn weight_updates_apply_to_both_directions() {
        let mut graph = MultiGraph::default();
        graph.insert("A", "B", key(0), 10.0);
        graph.insert("A", "C", key(1), 2.0);
        graph.insert("C", "B", key(2), 2.0);
        graph.set_weight(key(0), 1.0);

        assert_eq!(graph.shortest_path("A", "B").unwrap(), ["A", "B"]);
        assert_eq!(graph.shortest_path("B", "A").unwrap(), ["B", "A"]);
    }

    #[test]
    fn parallel_edges_do_not_confuse_search() {
        let mut graph = MultiGraph::default();
        graph.insert("A", "B", key(0), 5.0);
        graph.insert("A", "B", key(1), 1.0);
        let path = graph.shortest_path("A", "B").unwrap();
        assert_eq!(path, ["A", "B"]);
    }
}
