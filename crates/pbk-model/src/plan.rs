//! Plan-level records: plan info, patient setup, points and regions of interest.

use serde::{Deserialize, Serialize};

use crate::patient::ObjectVersion;

/// `plan.PlanInfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanInfo {
    pub plan_name: Option<String>,
    pub patient_name: Option<String>,
    pub institution: Option<String>,
    pub planner: Option<String>,
    pub physician: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub medical_record_number: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
}

/// `plan.PatientSetup`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientSetup {
    pub position: Option<String>,
    pub orientation: Option<String>,
    pub table_motion: Option<String>,
    pub object_version: Option<ObjectVersion>,
}

/// A named point of interest in planning coordinates (cm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: Option<f64>,
    pub color: Option<String>,
    pub coord_sys: Option<String>,
}

impl Poi {
    pub fn coordinates(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// One closed planar curve of a region of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub num_points: usize,
    /// Interleaved x, y, z triples in planning coordinates (cm).
    pub points: Vec<f64>,
}

impl Curve {
    /// Table position of the curve plane, taken from its first point.
    pub fn plane_z(&self) -> Option<f64> {
        self.points.get(2).copied()
    }
}

/// A named region of interest made of closed curves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub name: String,
    pub color: Option<String>,
    pub density: Option<f64>,
    pub density_units: Option<String>,
    pub curves: Vec<Curve>,
}

/// Plan-level data shared by every trial of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub plan_id: i64,
    pub plan_name: String,
    /// Image set the plan was contoured on, as declared by the patient record.
    pub primary_image_set_id: Option<i64>,
    pub info: PlanInfo,
    pub setup: PatientSetup,
    pub points: Vec<Poi>,
    pub rois: Vec<Roi>,
}

impl PlanRecord {
    pub fn poi(&self, name: &str) -> Option<&Poi> {
        self.points.iter().find(|poi| poi.name == name)
    }

    /// Write time stamp of the patient setup, used as the creation stamp of
    /// plan-derived objects.
    pub fn write_time_stamp(&self) -> Option<&str> {
        self.setup
            .object_version
            .as_ref()
            .and_then(|version| version.write_time_stamp.as_deref())
    }
}
