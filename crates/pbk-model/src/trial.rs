//! Trial, prescription, beam and control-point records (`plan.Trial`).

use serde::{Deserialize, Serialize};

use crate::patient::ObjectVersion;

/// Dose grid geometry of a trial, in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoseGridGeometry {
    pub voxel_size: [f64; 3],
    pub dimension: [usize; 3],
    pub origin: [f64; 3],
}

impl DoseGridGeometry {
    pub fn voxel_count(&self) -> usize {
        self.dimension.iter().product()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub name: String,
    pub requested_monitor_units_per_fraction: Option<f64>,
    /// Dose in cGy.
    pub prescription_dose: f64,
    pub prescription_percent: Option<f64>,
    pub number_of_fractions: u32,
    pub prescription_point: Option<String>,
    pub method: Option<String>,
    pub normalization_method: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorUnitInfo {
    pub prescription_dose: Option<f64>,
    pub normalized_dose: Option<f64>,
    pub collimator_output_factor: Option<f64>,
    pub total_transmission_fraction: Option<f64>,
    pub source_to_prescription_point_distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WedgeContext {
    pub wedge_name: Option<String>,
    pub orientation: Option<String>,
    pub angle: Option<f64>,
}

/// Block or aperture modifier attached to a control point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamModifier {
    pub name: Option<String>,
    pub structure_to_block: Option<String>,
    pub margin: Option<f64>,
    /// Each contour is a flat sequence of coordinates.
    pub contours: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub gantry: f64,
    pub couch: f64,
    pub collimator: f64,
    pub left_jaw_position: f64,
    pub right_jaw_position: f64,
    pub top_jaw_position: f64,
    pub bottom_jaw_position: f64,
    pub weight: f64,
    pub weight_locked: Option<i64>,
    pub percent_of_arc: Option<f64>,
    pub wedge: Option<WedgeContext>,
    pub modifiers: Vec<BeamModifier>,
    /// Leaf positions in cm as stored: one `(bank A, bank B)` pair per leaf.
    pub mlc_leaf_positions: Option<Vec<f64>>,
}

impl ControlPoint {
    /// Leaf pairs as `(bank A, bank B)` tuples.
    pub fn leaf_pairs(&self) -> Vec<(f64, f64)> {
        self.mlc_leaf_positions
            .as_deref()
            .unwrap_or_default()
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpManager {
    pub number_of_control_points: Option<i64>,
    pub gantry_is_ccw: Option<i64>,
    pub mlc_push_method: Option<String>,
    pub jaws_conformance: Option<String>,
    pub control_points: Vec<ControlPoint>,
}

/// How a beam's control points are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamDelivery {
    Static,
    StepAndShoot,
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub name: String,
    pub isocenter_name: Option<String>,
    pub prescription_name: Option<String>,
    pub machine_name_and_version: Option<String>,
    pub modality: Option<String>,
    pub machine_energy_name: Option<String>,
    pub set_beam_type: Option<String>,
    pub use_mlc: Option<i64>,
    pub ssd: Option<f64>,
    pub avg_ssd: Option<f64>,
    pub cp_managers: Vec<CpManager>,
    pub monitor_unit_info: MonitorUnitInfo,
    /// Reference to the binary dose file, e.g. `XDR:3`.
    pub dose_volume: Option<String>,
    /// Prescription resolved from `prescription_name` by the linking pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription: Option<Prescription>,
}

impl Beam {
    pub fn is_imaging(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("image") || name.contains("imaging")
    }

    pub fn is_electron(&self) -> bool {
        self.modality
            .as_deref()
            .is_some_and(|modality| modality.to_lowercase().starts_with("electron"))
    }

    /// Radiation type in upper case singular form (`PHOTON`, `ELECTRON`).
    pub fn radiation_type(&self) -> String {
        let modality = self.modality.as_deref().unwrap_or("Photons").trim();
        let singular = modality.strip_suffix(['s', 'S']).unwrap_or(modality);
        singular.to_uppercase()
    }

    /// Nominal energy parsed from the energy name without its unit letter.
    pub fn nominal_energy(&self) -> Option<f64> {
        let name = self.machine_energy_name.as_deref()?.trim();
        let digits = name.trim_end_matches(|c: char| c.is_ascii_alphabetic());
        digits.parse().ok()
    }

    pub fn delivery(&self) -> BeamDelivery {
        let beam_type = self.set_beam_type.as_deref().unwrap_or_default();
        if beam_type.trim().eq_ignore_ascii_case("static") {
            BeamDelivery::Static
        } else if beam_type
            .split_whitespace()
            .any(|word| word.eq_ignore_ascii_case("step"))
        {
            BeamDelivery::StepAndShoot
        } else {
            BeamDelivery::Dynamic
        }
    }

    /// Index of the binary dose file named by `dose_volume`.
    pub fn dose_volume_index(&self) -> Option<u32> {
        let reference = self.dose_volume.as_deref()?;
        let (_, index) = reference.rsplit_once(':')?;
        let digits: String = index.chars().filter(char::is_ascii_digit).collect();
        digits.parse().ok()
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        self.cp_managers
            .first()
            .map(|manager| manager.control_points.as_slice())
            .unwrap_or_default()
    }

    /// Machine name without its version suffix.
    pub fn machine_name(&self) -> Option<&str> {
        let value = self.machine_name_and_version.as_deref()?;
        let name = value.split(':').next().unwrap_or(value).trim();
        (!name.is_empty()).then_some(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub name: String,
    /// Sequential identifier assigned when trials are split.
    #[serde(default)]
    pub id: usize,
    pub dose_grid: DoseGridGeometry,
    pub dose_start_slice: Option<i64>,
    pub dose_end_slice: Option<i64>,
    pub prescriptions: Vec<Prescription>,
    pub beams: Vec<Beam>,
    pub object_version: Option<ObjectVersion>,
}

impl Trial {
    pub fn is_imaging(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("image") || name.contains("imaging")
    }

    pub fn prescription(&self, name: &str) -> Option<&Prescription> {
        self.prescriptions
            .iter()
            .find(|prescription| prescription.name == name)
    }

    /// Part of the trial name after its last underscore, used in plan labels.
    pub fn label_suffix(&self) -> &str {
        self.name
            .rsplit_once('_')
            .map(|(_, suffix)| suffix)
            .unwrap_or(self.name.as_str())
    }

    pub fn write_time_stamp(&self) -> Option<&str> {
        self.object_version
            .as_ref()
            .and_then(|version| version.write_time_stamp.as_deref())
    }
}
