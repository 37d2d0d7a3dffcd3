//! Route compilation and driver synchronization.
//!
//! [`RouteCompiler`] sits between the graph and a [`DacDriver`]: it plans a
//! route, renders its contiguous sample stream (reversing edges traversed
//! stop to start and slicing partial segments at the sample nearest the
//! anchor line), decides whether the hardware needs a re-upload, and fires
//! the playback trigger.

use shuttlekit_core::{PartialSegment, RouteKey, RoutePlan, ShuttlingGraph};

use crate::driver::DacDriver;
use crate::error::DacError;
use crate::waveform::compile_waveform;

/// Renders the full sample stream of a planned route, in playback order.
///
/// Panics if the plan does not belong to `graph` (its edge indices are
/// resolved against the graph's current edge list).
pub fn render_route(graph: &ShuttlingGraph, plan: &RoutePlan) -> Vec<f64> {
    let mut stream = Vec::new();

    if let Some(segment) = &plan.pre_shuttle {
        render_partial(graph, segment, true, &mut stream);
    }
    for step in &plan.steps {
        let edge = graph
            .edge(step.edge_index)
            .unwrap_or_else(|| panic!("plan references edge {} beyond the graph", step.edge_index));
        if step.from == edge.start_name() {
            stream.extend(edge.line_samples());
        } else {
            let mut samples: Vec<f64> = edge.line_samples().collect();
            samples.reverse();
            stream.extend(samples);
        }
    }
    if let Some(segment) = &plan.post_shuttle {
        render_partial(graph, segment, false, &mut stream);
    }
    stream
}

/// Renders a partial traversal between a mid-edge line and the segment's
/// node. `leaving` selects the direction: from the line towards the node
/// (pre-shuttle) or from the node back out to the line (post-shuttle).
fn render_partial(
    graph: &ShuttlingGraph,
    segment: &PartialSegment,
    leaving: bool,
    stream: &mut Vec<f64>,
) {
    let edge = graph
        .edge(segment.edge_index)
        .unwrap_or_else(|| panic!("plan references edge {} beyond the graph", segment.edge_index));
    let samples: Vec<f64> = edge.line_samples().collect();
    let anchor = nearest_sample(&samples, segment.line);

    // The stored stream runs start to stop; pick the half that connects the
    // anchor sample to the segment's node and orient it for playback.
    let towards_stop = segment.node == edge.stop_name();
    match (leaving, towards_stop) {
        (true, true) => stream.extend_from_slice(&samples[anchor..]),
        (true, false) => stream.extend(samples[..=anchor].iter().rev()),
        (false, true) => stream.extend(samples[anchor..].iter().rev()),
        (false, false) => stream.extend_from_slice(&samples[..=anchor]),
    }
}

/// Index of the sample closest to `line`; the earliest wins ties.
fn nearest_sample(samples: &[f64], line: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, &sample) in samples.iter().enumerate() {
        let distance = (sample - line).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

/// Orchestrates planning, upload, and playback against one driver.
#[derive(Debug)]
pub struct RouteCompiler<D: DacDriver> {
    driver: D,
}

impl<D: DacDriver> RouteCompiler<D> {
    /// Wraps a driver.
    pub fn new(driver: D) -> Self {
        Self { driver }
    }

    /// The wrapped driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The wrapped driver, mutably.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Re-uploads the compiled graph when the graph has unsynchronized
    /// changes or the driver reports its data invalid. Returns whether an
    /// upload happened.
    pub fn sync(&mut self, graph: &mut ShuttlingGraph) -> Result<bool, DacError> {
        if !graph.is_dirty() && self.driver.shuttling_data_valid() {
            return Ok(false);
        }
        let image = compile_waveform(graph);
        tracing::info!(samples = image.samples.len(), "uploading waveform data");
        self.driver.write_data(&image.samples)?;
        self.driver.write_shuttle_lookup(&image.lookup)?;
        graph.mark_synced();
        Ok(true)
    }

    /// Plans a route, synchronizes the driver, and triggers playback.
    /// Returns the executed plan.
    pub fn shuttle(
        &mut self,
        graph: &mut ShuttlingGraph,
        from: Option<RouteKey>,
        to: RouteKey,
        allow_position: bool,
    ) -> Result<RoutePlan, DacError> {
        let plan = graph.shuttle_path(from, to, allow_position)?;
        self.sync(graph)?;
        self.driver.trigger()?;
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDacDriver;
    use shuttlekit_core::ShuttleEdge;

    fn edge(a: &str, b: &str, start: f64, stop: f64) -> ShuttleEdge {
        ShuttleEdge::new(a, b, start, stop).with_steps(10.0)
    }

    fn chain() -> ShuttlingGraph {
        let mut graph = ShuttlingGraph::new();
        graph.add_edge(edge("A", "B", 0.0, 1.0)).unwrap();
        graph.add_edge(edge("B", "C", 1.0, 2.0)).unwrap();
        graph
    }

    fn node(name: &str) -> RouteKey {
        RouteKey::Node(name.to_owned())
    }

    #[test]
    fn forward_route_concatenates_forward_streams() {
        let graph = chain();
        let plan = graph.shuttle_path(Some(node("A")), node("C"), false).unwrap();
        let stream = render_route(&graph, &plan);

        assert_eq!(stream.len(), 22);
        assert!((stream[0] - 0.0).abs() < 1e-9);
        assert!((stream[21] - 2.0).abs() < 1e-9);
        assert!(stream.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn reverse_hops_play_their_edges_backwards() {
        let graph = chain();
        let plan = graph.shuttle_path(Some(node("C")), node("A"), false).unwrap();
        let stream = render_route(&graph, &plan);

        assert_eq!(stream.len(), 22);
        assert!((stream[0] - 2.0).abs() < 1e-9);
        assert!((stream[21] - 0.0).abs() < 1e-9);
        assert!(stream.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn pre_shuttle_slices_the_anchor_edge_at_the_nearest_sample() {
        let graph = chain();
        // 0.55 sits between samples 0.5 and 0.6; 0.5 wins the tie.
        let plan = graph
            .shuttle_path(Some(RouteKey::Line(0.55)), node("C"), true)
            .unwrap();
        let stream = render_route(&graph, &plan);

        // Forward from 0.5 to B (6 samples), then B to C (11 samples).
        assert_eq!(stream.len(), 17);
        assert!((stream[0] - 0.5).abs() < 1e-9);
        assert!((stream[16] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn post_shuttle_reaches_the_destination_line() {
        let graph = chain();
        let plan = graph
            .shuttle_path(Some(node("A")), RouteKey::Line(1.3), true)
            .unwrap();
        let stream = render_route(&graph, &plan);

        // A to B (11 samples), then forward along B→C up to 1.3 (4 samples).
        assert_eq!(stream.len(), 15);
        assert!((stream[0] - 0.0).abs() < 1e-9);
        assert!((stream[14] - 1.3).abs() < 1e-9);
    }

    #[test]
    fn empty_plans_render_no_samples() {
        let graph = chain();
        let plan = graph.shuttle_path(Some(node("B")), node("B"), false).unwrap();
        assert!(render_route(&graph, &plan).is_empty());
    }

    #[test]
    fn sync_uploads_once_per_generation() {
        let mut graph = chain();
        let mut compiler = RouteCompiler::new(MockDacDriver::new());

        assert!(compiler.sync(&mut graph).unwrap());
        assert!(!compiler.sync(&mut graph).unwrap());
        assert_eq!(compiler.driver().data_writes.len(), 1);

        graph.set_steps(0, 5.0).unwrap();
        assert!(compiler.sync(&mut graph).unwrap());
        assert_eq!(compiler.driver().data_writes.len(), 2);
    }

    #[test]
    fn sync_reuploads_when_the_driver_loses_its_data() {
        let mut graph = chain();
        let mut compiler = RouteCompiler::new(MockDacDriver::new());
        compiler.sync(&mut graph).unwrap();

        compiler.driver_mut().invalidate();
        assert!(compiler.sync(&mut graph).unwrap());
        assert_eq!(compiler.driver().data_writes.len(), 2);
    }

    #[test]
    fn shuttle_plans_syncs_and_triggers() {
        let mut graph = chain();
        let mut compiler = RouteCompiler::new(MockDacDriver::new());

        let plan = compiler
            .shuttle(&mut graph, Some(node("A")), node("C"), false)
            .unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(compiler.driver().triggers, 1);
        assert_eq!(compiler.driver().data_writes.len(), 1);
        assert_eq!(compiler.driver().lookup_writes[0].len(), 2);

        // Second shuttle on a clean graph triggers without re-uploading.
        compiler
            .shuttle(&mut graph, Some(node("C")), node("A"), false)
            .unwrap();
        assert_eq!(compiler.driver().triggers, 2);
        assert_eq!(compiler.driver().data_writes.len(), 1);
    }
}
