//! Error types for building and emitting output objects.

use thiserror::Error;

use pbk_ingest::IngestError;
use pbk_model::ObjectKind;

/// Error returned by an [`ObjectSink`](crate::ObjectSink).
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that abort one output object, or one group of objects sharing
/// the same input.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Reading or binding backup records failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The backup lists no image set a plan could be placed on.
    #[error("plan {plan_id} has no image set to reference")]
    MissingImageSet { plan_id: i64 },

    /// No treatment trial survived filtering and splitting.
    #[error("plan {plan_id} has no treatment trials")]
    NoTrials { plan_id: i64 },

    /// Every beam of a trial was skipped during dose reconstruction.
    #[error("no beam dose could be read for trial {trial} of plan {plan_id}")]
    EmptyDose { plan_id: i64, trial: String },

    /// Image slice points past the decoded voxel volume.
    #[error("slice {index} lies outside the voxel volume of {slices} slices")]
    SliceOutOfRange { index: usize, slices: usize },

    /// The sink rejected a finished object.
    #[error("failed to write {kind} object {file_name}: {source}")]
    Sink {
        kind: ObjectKind,
        file_name: String,
        #[source]
        source: SinkError,
    },
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
