//! Output object builders and conversion orchestration.
//!
//! Builders turn typed planning records into encoder-neutral
//! [`Dataset`](pbk_model::Dataset)s. The orchestrator walks an opened backup,
//! isolates failures per image set, plan and trial, and hands every finished
//! object to an [`ObjectSink`].
//!
//! # Features
//!
//! - **CT Series**: One image object per slice with pixel data and plane geometry
//! - **Structure Sets**: Points and regions as contours referencing their CT slices
//! - **Plans**: Prescription, fraction scheme, beams and control points per trial
//! - **Doses**: Reconstructed trial dose as a multi-frame grid
//! - **Orchestration**: [`run_conversion`] with a per-run identifier allocator
//!
//! # Example
//!
//! ```ignore
//! use pbk_core::{CollectingSink, ConversionRequest, run_conversion};
//! use pbk_ingest::PatientBackup;
//! use pbk_model::ConversionSettings;
//!
//! let backup = PatientBackup::open("Patient_6204")?;
//! let mut sink = CollectingSink::default();
//! let report = run_conversion(
//!     &backup,
//!     &ConversionRequest::default(),
//!     &ConversionSettings::default(),
//!     &mut sink,
//! );
//! ```

mod colors;
mod context;
mod convert;
mod ct;
mod dose;
mod error;
#[cfg(test)]
mod fixtures;
mod modules;
mod plan;
mod structure_set;

// === Error Types ===
pub use error::{ConvertError, Result, SinkError};

// === Build Context ===
pub use context::{BuildContext, ImageSetUids, PlanContext, PlanUids};
pub use modules::Stamp;

// === Builders ===
pub use colors::display_color;
pub use ct::build_ct_slice;
pub use dose::build_dose;
pub use plan::{build_plan, leaf_boundaries, support_angle};
pub use structure_set::{UNRESOLVED_IMAGE_UID, build_structure_set};

// === Orchestration ===
pub use convert::{
    CollectingSink, ConversionFailure, ConversionReport, ConversionRequest, ObjectSink,
    OutputObject, ProducedObject, run_conversion,
};
