//! Error types for reading a patient backup.

use std::path::PathBuf;
use thiserror::Error;

use crate::bind::BindError;
use crate::parser::MalformedRecord;

/// Errors that can occur while reading and binding backup records.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Backup directory not found.
    #[error("backup directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record or voxel file the backup layout requires is absent.
    #[error("required data file is missing: {path}")]
    DataFileMissing { path: PathBuf },

    // === Record Errors ===
    /// Record text could not be parsed.
    #[error("malformed record {path}: {source}")]
    MalformedRecord {
        path: PathBuf,
        #[source]
        source: MalformedRecord,
    },

    /// Record kind name not recognized.
    #[error("unknown record kind: {name}")]
    UnknownRecordKind { name: String },

    /// Record parsed but did not bind to its typed form.
    #[error("cannot bind {path}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: BindError,
    },

    // === Lookup Errors ===
    /// Image set not listed in the patient record.
    #[error("image set {id} is not part of this backup")]
    ImageSetNotFound { id: i64 },

    /// Plan not listed in the patient record.
    #[error("plan {id} is not part of this backup")]
    PlanNotFound { id: i64 },

    // === Voxel Errors ===
    /// Voxel file holds fewer samples than the header declares.
    #[error("voxel file {path} holds {actual} samples, header declares {expected}")]
    VoxelCount {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// Unsupported sample width in an image-set header.
    #[error("unsupported sample width of {bits} bits in {path}")]
    SampleWidth { path: PathBuf, bits: u32 },

    // === Settings Errors ===
    /// Settings file could not be parsed.
    #[error("invalid settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Settings parsed but hold unusable values.
    #[error("invalid settings file {path}: {source}")]
    SettingsInvalid {
        path: PathBuf,
        #[source]
        source: pbk_model::ModelError,
    },
}

/// Result type alias for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
