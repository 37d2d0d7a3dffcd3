//! Canonical normalization for line coordinates.
//!
//! A *line* is a real number indexing the continuum of trap voltage
//! configurations. The engine matches lines to named nodes by equality, so
//! floating-point coordinates need a canonical form: two lines denote the
//! same position iff they agree after rounding to nine decimal places.

/// A line coordinate quantized to 1e-9 line units, usable as a hash key.
///
/// The quantization makes line equality a true equivalence relation, which an
/// epsilon comparison would not be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineKey(i64);

impl LineKey {
    /// Quantizes a line coordinate. Coordinates must be finite; non-finite
    /// input saturates and is caught by the codec before it reaches a graph.
    pub fn new(line: f64) -> Self {
        Self((line * 1e9).round() as i64)
    }

    /// The nearest line coordinate represented by this key.
    pub fn line(self) -> f64 {
        self.0 as f64 / 1e9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_half_quantum_differences_collapse() {
        assert_eq!(LineKey::new(1.0), LineKey::new(1.0 + 4e-10));
        assert_eq!(LineKey::new(-2.5), LineKey::new(-2.5 - 4e-10));
    }

    #[test]
    fn multi_quantum_differences_stay_distinct() {
        assert_ne!(LineKey::new(1.0), LineKey::new(1.0 + 2e-9));
        assert_ne!(LineKey::new(0.0), LineKey::new(1e-8));
    }

    #[test]
    fn round_trips_typical_lab_coordinates() {
        for &line in &[0.0, 0.15, 20.15, -3.75, 1024.5] {
            assert!((LineKey::new(line).line() - line).abs() < 1e-9);
        }
    }
}
