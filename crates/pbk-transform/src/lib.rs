//! Geometry, identity and dose computations between typed records and
//! output objects.
//!
//! # Features
//!
//! - **Coordinates**: Map planning coordinates (cm, couch-relative) to patient coordinates
//! - **Identifiers**: Reproducible, role-coded UIDs with a per-run cache
//! - **Trial Splitting**: One trial per prescription, imaging trials removed
//! - **Dose Reconstruction**: Sum per-beam binary dose scaled by monitor units and fractions
//!
//! # Example
//!
//! ```ignore
//! use pbk_transform::{BinaryDoseFiles, prepare_trials, reconstruct};
//!
//! let trials = prepare_trials(&backup.load_trials(0)?);
//! let source = BinaryDoseFiles::new(backup.layout().plan_dir(0));
//! let dose = reconstruct(&trials[0].dose_grid, &trials[0].beams, &machines, &source);
//! ```

mod coords;
mod dose;
mod error;
mod split;
mod uid;

// === Error Types ===
pub use error::{DoseError, Result};

// === Coordinates ===
pub use coords::{CoordinateTransform, Unit};

// === Identifiers ===
pub use uid::{IdentityAllocator, MAX_UID_LEN, UidRole};

// === Trial Splitting ===
pub use split::{link_prescriptions, prepare_trials, split_trial};

// === Dose Reconstruction ===
pub use dose::{
    BinaryDoseFiles, DoseGrid, DoseReconstruction, DoseSource, decode_big_endian, monitor_units,
    reconstruct,
};
