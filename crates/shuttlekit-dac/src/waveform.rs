//! Whole-graph waveform compilation.
//!
//! The hardware holds one contiguous sample buffer for the entire graph
//! plus a per-edge lookup table. Edge `i` occupies
//! `offset[i] .. offset[i] + sample_count[i]` of the buffer, always stored
//! in forward (start to stop) orientation; the hardware plays a slot
//! forward or reversed per shuttle command.

use shuttlekit_core::ShuttlingGraph;

/// Hardware-side metadata for one edge's slot in the sample buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LookupEntry {
    /// Starting sample index of the edge within the buffer.
    pub offset: usize,
    /// Number of samples the edge occupies.
    pub sample_count: usize,
    /// Idle padding applied to every sample during playback.
    pub idle_count: u32,
    /// Hardware `direction` flag (uninterpreted pass-through).
    pub direction: i32,
    /// Hardware `wait` flag (uninterpreted pass-through).
    pub wait: u32,
}

/// The compiled form of a whole graph: one contiguous sample buffer and the
/// lookup table indexing it by edge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaveformImage {
    /// All edges' forward sample streams, concatenated in insertion order.
    pub samples: Vec<f64>,
    /// Per-edge slot metadata, indexed by edge index.
    pub lookup: Vec<LookupEntry>,
}

impl WaveformImage {
    /// The slice of the buffer belonging to the edge at `index`, if any.
    pub fn edge_samples(&self, index: usize) -> Option<&[f64]> {
        let entry = self.lookup.get(index)?;
        self.samples.get(entry.offset..entry.offset + entry.sample_count)
    }
}

/// Compiles every edge of the graph, in insertion order, into a single
/// waveform image.
pub fn compile_waveform(graph: &ShuttlingGraph) -> WaveformImage {
    let mut image = WaveformImage::default();
    for edge in graph.edges() {
        let offset = image.samples.len();
        image.samples.extend(edge.line_samples());
        image.lookup.push(LookupEntry {
            offset,
            sample_count: image.samples.len() - offset,
            idle_count: edge.idle_count(),
            direction: edge.direction(),
            wait: edge.wait(),
        });
    }
    tracing::debug!(
        edges = image.lookup.len(),
        samples = image.samples.len(),
        "waveform compiled"
    );
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuttlekit_core::ShuttleEdge;

    fn graph() -> ShuttlingGraph {
        let mut graph = ShuttlingGraph::new();
        graph
            .add_edge(
                ShuttleEdge::new("A", "B", 0.0, 10.0)
                    .with_steps(1.0)
                    .with_idle_count(2)
                    .with_hardware_flags(1, 3),
            )
            .unwrap();
        graph
            .add_edge(ShuttleEdge::new("B", "C", 10.0, 15.0).with_steps(2.0))
            .unwrap();
        graph
    }

    #[test]
    fn offsets_are_cumulative_and_counts_exact() {
        let graph = graph();
        let image = compile_waveform(&graph);

        assert_eq!(image.lookup.len(), 2);
        assert_eq!(image.lookup[0].offset, 0);
        assert_eq!(image.lookup[0].sample_count, 11);
        assert_eq!(image.lookup[1].offset, 11);
        assert_eq!(image.lookup[1].sample_count, 11);
        assert_eq!(image.samples.len(), 22);
    }

    #[test]
    fn hardware_flags_are_copied_through() {
        let image = compile_waveform(&graph());
        assert_eq!(image.lookup[0].idle_count, 2);
        assert_eq!(image.lookup[0].direction, 1);
        assert_eq!(image.lookup[0].wait, 3);
        assert_eq!(image.lookup[1].idle_count, 0);
    }

    #[test]
    fn edge_samples_slices_match_the_edge_streams() {
        let graph = graph();
        let image = compile_waveform(&graph);
        for (i, edge) in graph.edges().enumerate() {
            let expected: Vec<f64> = edge.line_samples().collect();
            assert_eq!(image.edge_samples(i).unwrap(), expected.as_slice());
        }
        assert!(image.edge_samples(2).is_none());
    }

    #[test]
    fn empty_graph_compiles_to_an_empty_image() {
        let image = compile_waveform(&ShuttlingGraph::new());
        assert!(image.samples.is_empty());
        assert!(image.lookup.is_empty());
    }
}
