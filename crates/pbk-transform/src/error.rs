//! Error types for dose reconstruction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading one beam's dose contribution.
///
/// Each of these skips the affected beam only; reconstruction continues with
/// the remaining beams.
#[derive(Debug, Error)]
pub enum DoseError {
    /// Beam names no binary dose file.
    #[error("beam {beam} has no dose volume reference")]
    MissingDoseVolume { beam: String },

    /// Referenced binary dose file is absent.
    #[error("dose file for beam {beam} is missing: {path}")]
    DataFileMissing { beam: String, path: PathBuf },

    /// Failed to read a dose file.
    #[error("failed to read dose file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Dose file length is not a whole number of samples.
    #[error("dose stream for beam {beam} ends inside a sample ({bytes} bytes)")]
    TruncatedStream { beam: String, bytes: usize },

    /// Decoded array does not match the trial's voxel count.
    #[error("dose for beam {beam} holds {actual} voxels, grid expects {expected}")]
    DimensionMismatch {
        beam: String,
        expected: usize,
        actual: usize,
    },
}

/// Result type alias for dose operations.
pub type Result<T> = std::result::Result<T, DoseError>;
