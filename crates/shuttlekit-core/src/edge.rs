//! The waveform segment entity: a [`ShuttleEdge`] between two named trap
//! positions.
//!
//! An edge owns its endpoint names and line coordinates, the sample-rate
//! knobs (`steps`, `idle_count`), and an envelope choice and length per end.
//! From those it derives the geometry of the central linear sweep, the total
//! sample count and duration, and the lazy sample stream the DAC layer
//! consumes.

use std::time::Duration;

use crate::envelope::EnvelopeKind;
use crate::error::GraphError;

/// Hardware time consumed by every emitted sample before idle padding.
pub const BASE_SAMPLE_PERIOD: Duration = Duration::from_nanos(2060);

/// Additional hardware time per unit of `idle_count` on each sample.
pub const IDLE_UNIT: Duration = Duration::from_nanos(20);

/// A voltage waveform segment between two named trap positions.
///
/// The sample stream of an edge is the concatenation of the leading
/// envelope, a uniformly spaced central sweep (inclusive of both central
/// endpoints), and the trailing envelope. Its length always equals
/// [`total_sample_count`](Self::total_sample_count), its first sample equals
/// `start_line` and its last equals `stop_line` up to rounding.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuttleEdge {
    start_name: String,
    stop_name: String,
    start_line: f64,
    stop_line: f64,
    steps: f64,
    idle_count: u32,
    start_type: EnvelopeKind,
    stop_type: EnvelopeKind,
    start_length: usize,
    stop_length: usize,
    direction: i32,
    wait: u32,
}

impl ShuttleEdge {
    /// Creates an edge with the given endpoints and default knobs
    /// (`steps = 0`, `idle_count = 0`, `None` envelopes, lengths 0).
    pub fn new(
        start_name: impl Into<String>,
        stop_name: impl Into<String>,
        start_line: f64,
        stop_line: f64,
    ) -> Self {
        Self {
            start_name: start_name.into(),
            stop_name: stop_name.into(),
            start_line,
            stop_line,
            steps: 0.0,
            idle_count: 0,
            start_type: EnvelopeKind::None,
            stop_type: EnvelopeKind::None,
            start_length: 0,
            stop_length: 0,
            direction: 0,
            wait: 0,
        }
    }

    /// Sets the central sweep density (samples per unit line). Negative input
    /// is clamped to zero.
    pub fn with_steps(mut self, steps: f64) -> Self {
        self.steps = steps.max(0.0);
        self
    }

    /// Sets the per-sample idle count.
    pub fn with_idle_count(mut self, idle_count: u32) -> Self {
        self.idle_count = idle_count;
        self
    }

    /// Sets the hardware pass-through flags (`direction`, `wait`). The engine
    /// stores these for the DAC lookup table and does not interpret them.
    pub fn with_hardware_flags(mut self, direction: i32, wait: u32) -> Self {
        self.direction = direction;
        self.wait = wait;
        self
    }

    /// Sets both envelopes, validating that the lengths leave room for the
    /// central sweep (`start_length + stop_length < sample_count`).
    pub fn with_envelopes(
        mut self,
        start_type: EnvelopeKind,
        start_length: usize,
        stop_type: EnvelopeKind,
        stop_length: usize,
    ) -> Result<Self, GraphError> {
        self.check_lengths(start_length, stop_length)?;
        self.start_type = start_type;
        self.start_length = start_length;
        self.stop_type = stop_type;
        self.stop_length = stop_length;
        Ok(self)
    }

    /// Name of the start node.
    pub fn start_name(&self) -> &str {
        &self.start_name
    }

    /// Name of the stop node.
    pub fn stop_name(&self) -> &str {
        &self.stop_name
    }

    /// Line coordinate of the start node.
    pub fn start_line(&self) -> f64 {
        self.start_line
    }

    /// Line coordinate of the stop node.
    pub fn stop_line(&self) -> f64 {
        self.stop_line
    }

    /// Central sweep density in samples per unit line.
    pub fn steps(&self) -> f64 {
        self.steps
    }

    /// Idle padding applied to every sample.
    pub fn idle_count(&self) -> u32 {
        self.idle_count
    }

    /// Leading envelope shape.
    pub fn start_type(&self) -> EnvelopeKind {
        self.start_type
    }

    /// Trailing envelope shape.
    pub fn stop_type(&self) -> EnvelopeKind {
        self.stop_type
    }

    /// Nominal leading envelope length, before the envelope's expansion.
    pub fn start_length(&self) -> usize {
        self.start_length
    }

    /// Nominal trailing envelope length, before the envelope's expansion.
    pub fn stop_length(&self) -> usize {
        self.stop_length
    }

    /// Hardware `direction` flag (uninterpreted pass-through).
    pub fn direction(&self) -> i32 {
        self.direction
    }

    /// Hardware `wait` flag (uninterpreted pass-through).
    pub fn wait(&self) -> u32 {
        self.wait
    }

    pub(crate) fn set_start_name(&mut self, name: impl Into<String>) {
        self.start_name = name.into();
    }

    pub(crate) fn set_stop_name(&mut self, name: impl Into<String>) {
        self.stop_name = name.into();
    }

    pub(crate) fn set_start_line(&mut self, line: f64) {
        self.start_line = line;
    }

    pub(crate) fn set_stop_line(&mut self, line: f64) {
        self.stop_line = line;
    }

    pub(crate) fn set_steps(&mut self, steps: f64) {
        self.steps = steps.max(0.0);
    }

    pub(crate) fn set_idle_count(&mut self, idle_count: u32) {
        self.idle_count = idle_count;
    }

    pub(crate) fn set_start_type(&mut self, kind: EnvelopeKind) {
        self.start_type = kind;
    }

    pub(crate) fn set_stop_type(&mut self, kind: EnvelopeKind) {
        self.stop_type = kind;
    }

    /// Sets the leading envelope length, rejecting lengths that leave no room
    /// for the central sweep.
    pub fn set_start_length(&mut self, length: usize) -> Result<(), GraphError> {
        self.check_lengths(length, self.stop_length)?;
        self.start_length = length;
        Ok(())
    }

    /// Sets the trailing envelope length, rejecting lengths that leave no
    /// room for the central sweep.
    pub fn set_stop_length(&mut self, length: usize) -> Result<(), GraphError> {
        self.check_lengths(self.start_length, length)?;
        self.stop_length = length;
        Ok(())
    }

    /// Nominal pre-envelope sample count: `|stop_line - start_line| * steps + 1`.
    pub fn sample_count(&self) -> f64 {
        (self.stop_line - self.start_line).abs() * self.steps + 1.0
    }

    /// First line of the central sweep, after the leading envelope has
    /// consumed its share of the sweep.
    pub fn central_start_line(&self) -> f64 {
        let cut = self.start_cut();
        if cut == 0 || self.steps <= 0.0 {
            self.start_line
        } else {
            self.start_line + self.sweep_sign() * cut as f64 / self.steps
        }
    }

    /// Last line of the central sweep, before the trailing envelope.
    pub fn central_stop_line(&self) -> f64 {
        let cut = self.stop_cut();
        if cut == 0 || self.steps <= 0.0 {
            self.stop_line
        } else {
            self.stop_line - self.sweep_sign() * cut as f64 / self.steps
        }
    }

    /// Number of uniformly spaced samples in the central sweep.
    pub fn central_steps(&self) -> usize {
        let remaining = self.sample_count() - (self.start_cut() + self.stop_cut()) as f64;
        if remaining <= 0.0 {
            0
        } else {
            remaining.round() as usize
        }
    }

    /// Samples actually emitted by the leading envelope.
    pub fn effective_start_length(&self) -> usize {
        self.start_type.effective_length(self.start_length)
    }

    /// Samples actually emitted by the trailing envelope.
    pub fn effective_stop_length(&self) -> usize {
        self.stop_type.effective_length(self.stop_length)
    }

    /// Total number of samples in [`line_samples`](Self::line_samples).
    pub fn total_sample_count(&self) -> usize {
        self.effective_start_length() + self.central_steps() + self.effective_stop_length()
    }

    /// Hardware time consumed per sample:
    /// `BASE_SAMPLE_PERIOD + idle_count * IDLE_UNIT`.
    pub fn time_per_sample(&self) -> Duration {
        BASE_SAMPLE_PERIOD + IDLE_UNIT * self.idle_count
    }

    /// Playback duration of the whole edge.
    pub fn total_time(&self) -> Duration {
        self.time_per_sample() * self.total_sample_count() as u32
    }

    /// The edge's weight in the multigraph: the line span it covers.
    pub fn weight(&self) -> f64 {
        (self.stop_line - self.start_line).abs()
    }

    /// Lazy, finite, restartable sample stream: leading envelope, central
    /// sweep (inclusive of both central endpoints), trailing envelope.
    pub fn line_samples(&self) -> impl Iterator<Item = f64> {
        let central_start = self.central_start_line();
        let central_stop = self.central_stop_line();
        let central = self.central_steps();

        let sweep = (0..central).map(move |i| {
            if central <= 1 {
                central_start
            } else {
                central_start + (central_stop - central_start) * i as f64 / (central - 1) as f64
            }
        });

        self.start_type
            .start_samples(self.start_length, self.start_line, central_start)
            .chain(sweep)
            .chain(
                self.stop_type
                    .stop_samples(self.stop_length, central_stop, self.stop_line),
            )
    }

    fn check_lengths(&self, start_length: usize, stop_length: usize) -> Result<(), GraphError> {
        let sample_count = self.sample_count();
        if (start_length + stop_length) as f64 >= sample_count {
            return Err(GraphError::InvalidEnvelopeLength {
                start_length,
                stop_length,
                sample_count,
            });
        }
        Ok(())
    }

    /// Sign of the sweep direction along the line axis; zero for degenerate
    /// edges with coincident endpoints.
    fn sweep_sign(&self) -> f64 {
        if self.stop_line > self.start_line {
            1.0
        } else if self.stop_line < self.start_line {
            -1.0
        } else {
            0.0
        }
    }

    /// Sweep samples consumed by the leading envelope. `None` envelopes
    /// ignore their stored length.
    fn start_cut(&self) -> usize {
        match self.start_type {
            EnvelopeKind::None => 0,
            _ => self.start_length,
        }
    }

    fn stop_cut(&self) -> usize {
        match self.stop_type {
            EnvelopeKind::None => 0,
            _ => self.stop_length,
        }
    }
}
