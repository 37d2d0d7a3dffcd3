//! Error types for DAC operations.

use thiserror::Error;

use shuttlekit_core::GraphError;

/// Errors that can occur while compiling or uploading waveform data.
#[derive(Debug, Error)]
pub enum DacError {
    /// The sample buffer upload was rejected by the driver
    #[error("waveform upload failed: {0}")]
    Upload(String),

    /// The lookup table upload was rejected by the driver
    #[error("lookup upload failed: {0}")]
    Lookup(String),

    /// Playback could not be started
    #[error("trigger failed: {0}")]
    Trigger(String),

    /// Route planning failed
    #[error(transparent)]
    Graph(#[from] GraphError),
}
