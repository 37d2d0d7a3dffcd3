//! The hardware driver seam.
//!
//! The engine never talks to a DAC directly; it hands compiled artifacts to
//! a [`DacDriver`]. Uploads run in the driver's own context, so the trait
//! methods are expected to return quickly. [`MockDacDriver`] records every
//! call for tests.

use crate::error::DacError;
use crate::waveform::LookupEntry;

/// Upload and playback interface of the shuttling DAC.
pub trait DacDriver {
    /// Uploads the compiled sample buffer.
    fn write_data(&mut self, samples: &[f64]) -> Result<(), DacError>;

    /// Uploads the per-edge offset/metadata table.
    fn write_shuttle_lookup(&mut self, lookup: &[LookupEntry]) -> Result<(), DacError>;

    /// Whether the driver's uploaded data still matches what it was given.
    /// A driver may invalidate its buffers on its own (power cycle, watchdog
    /// reset), independently of graph edits.
    fn shuttling_data_valid(&self) -> bool;

    /// Starts playback of the most recently planned path.
    fn trigger(&mut self) -> Result<(), DacError>;
}

/// In-memory driver that records every call.
#[derive(Debug, Default)]
pub struct MockDacDriver {
    /// Every sample buffer passed to [`DacDriver::write_data`].
    pub data_writes: Vec<Vec<f64>>,
    /// Every table passed to [`DacDriver::write_shuttle_lookup`].
    pub lookup_writes: Vec<Vec<LookupEntry>>,
    /// Number of [`DacDriver::trigger`] calls.
    pub triggers: usize,
    valid: bool,
}

impl MockDacDriver {
    /// Creates a mock with no uploaded data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a hardware-side data loss (power cycle).
    pub fn invalidate(&mut self) {
        self.valid = false;
    }
}

impl DacDriver for MockDacDriver {
    fn write_data(&mut self, samples: &[f64]) -> Result<(), DacError> {
        self.data_writes.push(samples.to_vec());
        Ok(())
    }

    fn write_shuttle_lookup(&mut self, lookup: &[LookupEntry]) -> Result<(), DacError> {
        self.lookup_writes.push(lookup.to_vec());
        self.valid = true;
        Ok(())
    }

    fn shuttling_data_valid(&self) -> bool {
        self.valid
    }

    fn trigger(&mut self) -> Result<(), DacError> {
        self.triggers += 1;
        Ok(())
    }
}
