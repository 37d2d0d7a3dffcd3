//! Route planning: from a node or mid-edge position to another.
//!
//! A route request names each end either by node name or, when the caller
//! permits it, by a raw line coordinate. A raw line that does not coincide
//! with a node anchors on the first edge (in insertion order) whose line
//! interval contains it; the planner then enumerates the anchor edge's two
//! node endpoints as exit (or entry) candidates, computes a shortest path
//! for every candidate pairing, and keeps the pairing with the fewest hops.
//! Ties fall to the candidate enumerated first: from-anchor names before
//! to-anchor names, each in the edge's `(start_name, stop_name)` order.

use crate::error::{GraphError, RouteSide};
use crate::line::LineKey;

use super::EdgeKey;
use super::shuttling::ShuttlingGraph;

/// Key identifying one end of a shuttle request.
#[derive(Clone, Debug, PartialEq)]
pub enum RouteKey {
    /// A named node.
    Node(String),
    /// A raw line coordinate; only accepted when the caller allows
    /// positional keys.
    Line(f64),
}

/// One hop of a planned route: traverse the edge at `edge_index` from `from`
/// to `to`. The hop plays the edge backwards when `from` is the edge's stop
/// name.
#[derive(Clone, Debug, PartialEq)]
pub struct PathStep {
    /// Node the hop leaves.
    pub from: String,
    /// Node the hop arrives at.
    pub to: String,
    /// Index of the traversed edge in the ordered edge list.
    pub edge_index: usize,
    /// Stable identity of the traversed edge.
    pub edge_key: EdgeKey,
}

/// Partial traversal between a mid-edge line and one of that edge's nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialSegment {
    /// Index of the anchor edge in the ordered edge list.
    pub edge_index: usize,
    /// The mid-edge line coordinate.
    pub line: f64,
    /// The node endpoint the partial traversal connects to.
    pub node: String,
}

/// A planned route: ordered hops plus the partial segments needed to reach
/// or leave mid-edge anchors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoutePlan {
    /// Full-edge hops in traversal order. Empty when origin and destination
    /// resolve to the same node.
    pub steps: Vec<PathStep>,
    /// Partial traversal from the origin line to the first hop's node.
    pub pre_shuttle: Option<PartialSegment>,
    /// Partial traversal from the last hop's node to the destination line.
    pub post_shuttle: Option<PartialSegment>,
}

impl RoutePlan {
    /// True if the plan involves no motion at all.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty() && self.pre_shuttle.is_none() && self.post_shuttle.is_none()
    }
}

/// A resolved route endpoint: either a node of the multigraph or a point in
/// the interior of a specific edge.
#[derive(Clone, Debug)]
enum Anchor {
    Node(String),
    MidEdge { edge_index: usize, line: f64 },
}

impl Anchor {
    fn describe(&self) -> String {
        match self {
            Anchor::Node(name) => name.clone(),
            Anchor::MidEdge { line, .. } => format!("line {line}"),
        }
    }
}

impl ShuttlingGraph {
    /// Plans a route between two keys.
    ///
    /// `from = None` substitutes the current position: its node name when it
    /// sits on a node, otherwise its raw line. Raw-line keys supplied by the
    /// caller are only accepted when `allow_position` is set.
    ///
    /// Fails with [`GraphError::NoSuchNode`] when a key matches neither a
    /// node nor (when permitted) a point on some edge, and with
    /// [`GraphError::NoPath`] when the graph is disconnected across the
    /// request.
    pub fn shuttle_path(
        &self,
        from: Option<RouteKey>,
        to: RouteKey,
        allow_position: bool,
    ) -> Result<RoutePlan, GraphError> {
        let from_anchor = match from {
            Some(key) => self.resolve_key(key, RouteSide::From, allow_position)?,
            None => self.resolve_current_position()?,
        };
        let to_anchor = self.resolve_key(to, RouteSide::To, allow_position)?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            from = %from_anchor.describe(),
            to = %to_anchor.describe(),
            "planning shuttle route"
        );
        self.plan_between(&from_anchor, &to_anchor)
    }

    fn resolve_key(
        &self,
        key: RouteKey,
        side: RouteSide,
        allow_position: bool,
    ) -> Result<Anchor, GraphError> {
        match key {
            RouteKey::Node(name) => {
                if self.multigraph.contains(&name) {
                    Ok(Anchor::Node(name))
                } else {
                    Err(GraphError::NoSuchNode { side, key: name })
                }
            }
            RouteKey::Line(line) => {
                if !allow_position {
                    return Err(GraphError::NoSuchNode {
                        side,
                        key: format!("line {line}"),
                    });
                }
                self.resolve_line(line, side)
            }
        }
    }

    fn resolve_line(&self, line: f64, side: RouteSide) -> Result<Anchor, GraphError> {
        if let Some(name) = self.node_lookup.get(&LineKey::new(line)) {
            return Ok(Anchor::Node(name.clone()));
        }
        for (edge_index, entry) in self.edges.iter().enumerate() {
            let (start, stop) = (entry.edge.start_line(), entry.edge.stop_line());
            let (lo, hi) = (start.min(stop), start.max(stop));
            if line >= lo && line <= hi {
                return Ok(Anchor::MidEdge { edge_index, line });
            }
        }
        Err(GraphError::NoSuchNode {
            side,
            key: format!("line {line}"),
        })
    }

    fn resolve_current_position(&self) -> Result<Anchor, GraphError> {
        if let Some(name) = &self.current_position_name {
            return Ok(Anchor::Node(name.clone()));
        }
        if let Some(line) = self.current_position {
            return self.resolve_line(line, RouteSide::From);
        }
        Err(GraphError::NoSuchNode {
            side: RouteSide::From,
            key: String::from("current position"),
        })
    }

    fn plan_between(&self, from: &Anchor, to: &Anchor) -> Result<RoutePlan, GraphError> {
        let from_candidates = self.anchor_candidates(from);
        let to_candidates = self.anchor_candidates(to);

        // At most four pairings; fewest hops wins, first enumeration breaks
        // ties (strict comparison keeps the earlier candidate).
        let mut best: Option<(Vec<String>, Option<PartialSegment>, Option<PartialSegment>)> = None;
        for (pre, from_node) in &from_candidates {
            for (post, to_node) in &to_candidates {
                let Some(node_path) = self.multigraph.shortest_path(from_node, to_node) else {
                    continue;
                };
                let improves = best
                    .as_ref()
                    .is_none_or(|(current, _, _)| node_path.len() < current.len());
                if improves {
                    best = Some((node_path, pre.clone(), post.clone()));
                }
            }
        }

        let Some((node_path, pre_shuttle, post_shuttle)) = best else {
            return Err(GraphError::NoPath {
                from: from.describe(),
                to: to.describe(),
            });
        };

        let steps = node_path
            .windows(2)
            .map(|pair| self.select_edge(&pair[0], &pair[1]))
            .collect();
        Ok(RoutePlan {
            steps,
            pre_shuttle,
            post_shuttle,
        })
    }

    /// The node endpoints reachable from an anchor, with the partial segment
    /// needed to get there. Enumeration order is part of the contract.
    fn anchor_candidates(&self, anchor: &Anchor) -> Vec<(Option<PartialSegment>, String)> {
        match anchor {
            Anchor::Node(name) => vec![(None, name.clone())],
            Anchor::MidEdge { edge_index, line } => {
                let edge = &self.edges[*edge_index].edge;
                [edge.start_name(), edge.stop_name()]
                    .into_iter()
                    .map(|node| {
                        (
                            Some(PartialSegment {
                                edge_index: *edge_index,
                                line: *line,
                                node: node.to_owned(),
                            }),
                            node.to_owned(),
                        )
                    })
                    .collect()
            }
        }
    }

    /// Picks the concrete edge for a hop between two adjacent nodes: the
    /// lightest connecting edge, lowest insertion index among equals.
    fn select_edge(&self, from: &str, to: &str) -> PathStep {
        let mut best: Option<(f64, usize, EdgeKey)> = None;
        for (i, entry) in self.edges.iter().enumerate() {
            let edge = &entry.edge;
            let connects = (edge.start_name() == from && edge.stop_name() == to)
                || (edge.start_name() == to && edge.stop_name() == from);
            if !connects {
                continue;
            }
            let weight = edge.weight();
            if best.is_none_or(|(current, _, _)| weight < current) {
                best = Some((weight, i, entry.key));
            }
        }
        let (_, edge_index, edge_key) = best
            .expect("node path came from the multigraph, so a connecting edge must exist");
        PathStep {
            from: from.to_owned(),
            to: to.to_owned(),
            edge_index,
            edge_key,
        }
    }
}
