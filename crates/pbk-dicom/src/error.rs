//! Error types for encoding and writing output objects.

use std::path::PathBuf;

use pbk_model::Tag;
use thiserror::Error;

/// Boxed error of the underlying encoder.
pub type EncoderError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum EncodeError {
    /// The dataset lacks an identifier the file meta group is built from.
    #[error("dataset has no value for {tag}")]
    MissingIdentifier { tag: Tag },

    /// The file meta group could not be built.
    #[error("failed to build file meta group for {sop_instance_uid}: {source}")]
    Meta {
        sop_instance_uid: String,
        #[source]
        source: EncoderError,
    },

    /// Writing the Part 10 file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: EncoderError,
    },
}

/// Result type alias for encoding operations.
pub type Result<T> = std::result::Result<T, EncodeError>;
