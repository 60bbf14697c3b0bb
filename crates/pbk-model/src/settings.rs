//! Site-level settings stamped into every generated object.
//!
//! Every field has a default so a settings file only needs to name the
//! values a site wants to change:
//!
//! ```toml
//! institution_name = "Radiation Oncology"
//! window_width = 350.0
//!
//! [treatment_machine]
//! serial_number = "1234"
//!
//! [slice_match]
//! mode = "absolute"
//! cm = 0.1
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// How contour planes are matched to image slices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SliceMatchTolerance {
    /// Within half of the image set's slice thickness.
    #[default]
    HalfSliceThickness,
    /// Within a fixed distance in centimeters.
    Absolute { cm: f64 },
}

impl SliceMatchTolerance {
    pub fn resolve(self, slice_thickness: f64) -> f64 {
        match self {
            Self::HalfSliceThickness => slice_thickness / 2.0,
            Self::Absolute { cm } => cm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreatmentMachineSettings {
    pub manufacturer: String,
    pub model_name: String,
    pub serial_number: String,
    pub name: String,
}

impl Default for TreatmentMachineSettings {
    fn default() -> Self {
        Self {
            manufacturer: "Varian Medical Systems".to_string(),
            model_name: "TDS".to_string(),
            serial_number: String::new(),
            name: "TB1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    pub institution_name: String,
    pub institution_address: String,
    pub station_name: String,
    /// Manufacturer written into structure set, plan and dose objects.
    pub manufacturer: String,
    pub treatment_machine: TreatmentMachineSettings,
    pub window_center: f64,
    pub window_width: f64,
    /// Offset subtracted from stored voxel values to obtain Hounsfield units.
    pub hu_offset: i32,
    pub dose_rate: f64,
    /// Source-axis distance in mm.
    pub source_axis_distance: f64,
    /// Gy per stored dose unit.
    pub dose_grid_scaling: f64,
    /// Root under which every generated UID is allocated.
    pub uid_root: String,
    pub slice_match: SliceMatchTolerance,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            institution_name: String::new(),
            institution_address: String::new(),
            station_name: "PBK WS".to_string(),
            manufacturer: "pbk2dicom".to_string(),
            treatment_machine: TreatmentMachineSettings::default(),
            window_center: 20.0,
            window_width: 400.0,
            hu_offset: 1000,
            dose_rate: 600.0,
            source_axis_distance: 1000.0,
            dose_grid_scaling: 1e-6,
            uid_root: "1.2.826.0.1.3680043.8.498.".to_string(),
            slice_match: SliceMatchTolerance::default(),
        }
    }
}

impl ConversionSettings {
    #[must_use]
    pub fn with_institution(mut self, name: impl Into<String>) -> Self {
        self.institution_name = name.into();
        self
    }

    #[must_use]
    pub fn with_slice_match(mut self, slice_match: SliceMatchTolerance) -> Self {
        self.slice_match = slice_match;
        self
    }

    #[must_use]
    pub fn with_uid_root(mut self, root: impl Into<String>) -> Self {
        self.uid_root = root.into();
        self
    }

    /// Checks values that would otherwise produce invalid objects.
    pub fn validate(&self) -> Result<()> {
        let root = self.uid_root.trim_end_matches('.');
        let valid_root = !root.is_empty()
            && root.len() <= 32
            && root
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()));
        if !valid_root {
            return Err(ModelError::InvalidUidRoot(self.uid_root.clone()));
        }
        if !is_positive(self.dose_grid_scaling) {
            return Err(ModelError::InvalidSetting {
                name: "dose_grid_scaling",
                message: format!("must be positive, got {}", self.dose_grid_scaling),
            });
        }
        if !is_positive(self.window_width) {
            return Err(ModelError::InvalidSetting {
                name: "window_width",
                message: format!("must be positive, got {}", self.window_width),
            });
        }
        if let SliceMatchTolerance::Absolute { cm } = self.slice_match
            && !is_positive(cm)
        {
            return Err(ModelError::InvalidSetting {
                name: "slice_match",
                message: format!("absolute tolerance must be positive, got {cm}"),
            });
        }
        Ok(())
    }

    /// UID root with exactly one trailing dot.
    pub fn uid_prefix(&self) -> String {
        format!("{}.", self.uid_root.trim_end_matches('.'))
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
