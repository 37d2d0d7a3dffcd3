//! Soft-start / soft-stop envelope shapes for shuttle edges.
//!
//! An envelope shapes the leading or trailing region of an edge's sample
//! stream so the ion accelerates from rest up to the central sweep velocity
//! and back down again. [`EnvelopeKind::SineSquared`] has continuous
//! (cosine-shaped) acceleration; [`EnvelopeKind::LinearRamp`] has constant
//! acceleration (a parabolic position ramp); [`EnvelopeKind::None`] enters
//! the sweep immediately.
//!
//! Both shaped envelopes expand their nominal `length` (the number of sweep
//! samples they consume) into `2 * length` emitted samples, covering the same
//! line span at half the average velocity.

use core::f64::consts::PI;

/// Envelope shape applied at one end of a [`ShuttleEdge`](crate::ShuttleEdge).
///
/// The shape and its length are independent edge attributes: a length set
/// while the shape is `None` costs zero samples but survives a later switch
/// to a shaped envelope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnvelopeKind {
    /// No shaping; the stream enters the central sweep at full velocity.
    #[default]
    None,
    /// Sine-squared velocity profile with continuous acceleration.
    SineSquared,
    /// Constant-acceleration ramp (parabolic position profile).
    LinearRamp,
}

impl EnvelopeKind {
    /// Number of samples actually emitted for a nominal envelope `length`.
    ///
    /// `None` emits nothing; the shaped envelopes expand by a factor of two.
    pub fn effective_length(self, length: usize) -> usize {
        match self {
            EnvelopeKind::None => 0,
            EnvelopeKind::SineSquared | EnvelopeKind::LinearRamp => 2 * length,
        }
    }

    /// Leading envelope samples, from `outer` (the edge's start line) toward
    /// `inner` (the central sweep's first line).
    ///
    /// The first sample equals `outer`; `inner` itself is excluded and is
    /// emitted by the central sweep.
    pub fn start_samples(self, length: usize, outer: f64, inner: f64) -> impl Iterator<Item = f64> {
        let total = self.effective_length(length);
        let span = total as f64;
        (0..total).map(move |n| {
            let x = n as f64 / span;
            match self {
                // Unreachable: `total` is zero for `None`.
                EnvelopeKind::None => outer,
                EnvelopeKind::SineSquared => {
                    outer + (inner - outer) * 2.0 * (x / 2.0 - (PI * x).sin() / (2.0 * PI))
                }
                EnvelopeKind::LinearRamp => outer + (inner - outer) * x * x,
            }
        })
    }

    /// Trailing envelope samples, from `outer` (the central sweep's last
    /// line) toward `inner` (the edge's stop line).
    ///
    /// `outer` itself is excluded (the central sweep already emitted it); the
    /// last sample equals `inner`.
    pub fn stop_samples(self, length: usize, outer: f64, inner: f64) -> impl Iterator<Item = f64> {
        let total = self.effective_length(length);
        let span = total as f64;
        (1..=total).map(move |n| {
            let x = n as f64 / span;
            match self {
                EnvelopeKind::None => inner,
                EnvelopeKind::SineSquared => {
                    outer + (inner - outer) * 2.0 * (x / 2.0 + (PI * x).sin() / (2.0 * PI))
                }
                EnvelopeKind::LinearRamp => outer + (inner - outer) * (2.0 * x - x * x),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn none_emits_nothing() {
        assert_eq!(EnvelopeKind::None.effective_length(5), 0);
        assert_eq!(EnvelopeKind::None.start_samples(5, 0.0, 10.0).count(), 0);
        assert_eq!(EnvelopeKind::None.stop_samples(5, 0.0, 10.0).count(), 0);
    }

    #[test]
    fn shaped_envelopes_double_their_length() {
        assert_eq!(EnvelopeKind::SineSquared.effective_length(3), 6);
        assert_eq!(EnvelopeKind::LinearRamp.effective_length(4), 8);
        assert_eq!(EnvelopeKind::LinearRamp.effective_length(0), 0);
    }

    #[test]
    fn linear_ramp_start_is_parabolic() {
        let samples: Vec<f64> = EnvelopeKind::LinearRamp.start_samples(3, 0.0, 3.0).collect();
        assert_eq!(samples.len(), 6);
        for (n, &s) in samples.iter().enumerate() {
            let x = n as f64 / 6.0;
            assert!((s - 3.0 * x * x).abs() < EPS, "sample {n} was {s}");
        }
    }

    #[test]
    fn linear_ramp_stop_lands_on_inner() {
        let samples: Vec<f64> = EnvelopeKind::LinearRamp.stop_samples(3, 17.0, 20.0).collect();
        assert_eq!(samples.len(), 6);
        assert!((samples[5] - 20.0).abs() < EPS);
        // First trailing sample continues at sweep velocity away from outer.
        assert!(samples[0] > 17.0 && samples[0] < 20.0);
    }

    #[test]
    fn sine_squared_start_begins_at_outer() {
        let samples: Vec<f64> = EnvelopeKind::SineSquared
            .start_samples(4, 0.15, 4.15)
            .collect();
        assert_eq!(samples.len(), 8);
        assert!((samples[0] - 0.15).abs() < EPS);
        // Monotonic toward the sweep for an increasing edge.
        for pair in samples.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(samples[7] < 4.15);
    }

    #[test]
    fn sine_squared_stop_ends_at_inner() {
        let samples: Vec<f64> = EnvelopeKind::SineSquared
            .stop_samples(4, 16.0, 20.0)
            .collect();
        assert_eq!(samples.len(), 8);
        assert!((samples[7] - 20.0).abs() < EPS);
    }

    #[test]
    fn envelopes_work_on_decreasing_edges() {
        let samples: Vec<f64> = EnvelopeKind::LinearRamp.start_samples(2, 10.0, 6.0).collect();
        assert!((samples[0] - 10.0).abs() < EPS);
        for pair in samples.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }
}
