//! Reading of treatment-planning backups.
//!
//! This crate turns a patient backup directory into typed planning records.
//!
//! # Features
//!
//! - **Record Parsing**: Parse the nested record notation into a [`RecordTree`]
//! - **Schema Binding**: Bind trees to typed records with [`FromRecord`], reporting every missing field
//! - **Backup Loading**: Open a patient directory and load image sets, plans, trials and machines
//! - **Voxel Reading**: Decode raw image-set voxel files
//! - **Settings**: Load site settings from TOML
//!
//! # Example
//!
//! ```ignore
//! use pbk_ingest::PatientBackup;
//!
//! let backup = PatientBackup::open("Patient_6204")?;
//! let plan = backup.load_plan(0)?;
//! let trials = backup.load_trials(0)?;
//! ```

mod backup;
mod bind;
mod error;
mod kind;
mod normalize;
mod parser;
mod records;
mod settings;
mod tree;
mod voxels;

// === Error Types ===
pub use error::{IngestError, Result};

// === Record Parsing ===
pub use kind::RecordKind;
pub use parser::{MalformedReason, MalformedRecord, parse_record, parse_record_file};
pub use tree::{RecordNode, RecordTree};

// === Schema Binding ===
pub use bind::{BindError, FieldProblem, FieldReader, FromRecord, ProblemKind, bind, bind_list};

// === Backup Loading ===
pub use backup::{BackupLayout, PatientBackup};
pub use voxels::read_volume;

// === Settings ===
pub use settings::load_settings;
