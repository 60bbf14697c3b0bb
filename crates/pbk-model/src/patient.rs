//! Patient identity and the image-set/plan directory it owns.

use serde::{Deserialize, Serialize};

/// Write/creation stamps carried by most planning objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectVersion {
    pub write_version: Option<String>,
    pub create_version: Option<String>,
    pub create_time_stamp: Option<String>,
    pub write_time_stamp: Option<String>,
    pub last_modified_time_stamp: Option<String>,
}

/// One entry of the patient's image-set directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSetSummary {
    pub image_set_id: i64,
    pub image_name: Option<String>,
    pub exam_id: Option<String>,
    pub study_id: Option<String>,
    pub modality: Option<String>,
    pub number_of_images: Option<i64>,
    pub scan_time_from_scanner: Option<String>,
}

/// One entry of the patient's plan directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub plan_id: i64,
    pub plan_name: Option<String>,
    pub primary_ct_image_set_id: Option<i64>,
    pub primary_image_type: Option<String>,
    pub tool_type: Option<String>,
    pub pinnacle_version_description: Option<String>,
    pub object_version: Option<ObjectVersion>,
}

/// Root of the object graph for one patient backup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub medical_record_number: String,
    pub radiation_oncologist: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub image_sets: Vec<ImageSetSummary>,
    pub plans: Vec<PlanSummary>,
    pub object_version: Option<ObjectVersion>,
}

impl PatientRecord {
    /// Person name in `Last^First^Middle` form.
    pub fn person_name(&self) -> String {
        let parts = [
            self.last_name.as_deref().unwrap_or_default(),
            self.first_name.as_deref().unwrap_or_default(),
            self.middle_name.as_deref().unwrap_or_default(),
        ];
        parts.join("^")
    }

    /// Single-letter sex code taken from the recorded gender.
    pub fn sex_code(&self) -> Option<String> {
        self.gender
            .as_deref()
            .and_then(|gender| gender.trim().chars().next())
            .map(|first| first.to_ascii_uppercase().to_string())
    }

    pub fn image_set(&self, image_set_id: i64) -> Option<&ImageSetSummary> {
        self.image_sets
            .iter()
            .find(|summary| summary.image_set_id == image_set_id)
    }

    pub fn plan(&self, plan_id: i64) -> Option<&PlanSummary> {
        self.plans.iter().find(|plan| plan.plan_id == plan_id)
    }
}
