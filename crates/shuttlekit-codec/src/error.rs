//! Error types for graph file operations.

use std::path::PathBuf;
use thiserror::Error;

use shuttlekit_core::GraphError;

/// Errors that can occur while loading or saving graph files.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Unknown envelope identifier
    #[error("unknown envelope type '{value}' on edge {edge}")]
    UnknownEnvelope {
        /// Index of the offending edge record in the document.
        edge: usize,
        /// The unrecognized identifier.
        value: String,
    },

    /// A line coordinate in the document is NaN or infinite
    #[error("non-finite {attribute} on edge {edge}")]
    NonFiniteLine {
        /// Index of the offending edge record in the document.
        edge: usize,
        /// Name of the offending attribute.
        attribute: &'static str,
    },

    /// An edge record violates a graph invariant
    #[error("invalid edge {edge}: {source}")]
    Graph {
        /// Index of the offending edge record in the document.
        edge: usize,
        /// The engine's rejection.
        #[source]
        source: GraphError,
    },
}

impl CodecError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodecError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodecError::WriteFile {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn read_file_factory_produces_correct_variant() {
        let err = CodecError::read_file("/some/path", mock_io_err());
        assert!(
            matches!(err, CodecError::ReadFile { ref path, .. } if path == std::path::Path::new("/some/path"))
        );
    }

    #[test]
    fn graph_variant_reports_the_edge_index() {
        let err = CodecError::Graph {
            edge: 3,
            source: GraphError::EdgeOutOfRange(3),
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid edge 3"), "got: {msg}");
        assert!(err.source().is_some(), "Graph must expose its engine source");
    }

    #[test]
    fn unknown_envelope_display() {
        let err = CodecError::UnknownEnvelope {
            edge: 1,
            value: "Gauss".to_string(),
        };
        assert_eq!(err.to_string(), "unknown envelope type 'Gauss' on edge 1");
    }
}
