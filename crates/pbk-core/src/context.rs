//! Shared inputs of every builder for one image set.

use std::collections::BTreeMap;

use pbk_model::{ConversionSettings, ImageSetRecord, PatientRecord, PlanRecord, Trial};
use pbk_transform::{CoordinateTransform, IdentityAllocator, UidRole};

/// Identifiers tied to one image set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSetUids {
    pub study: String,
    pub series: String,
    pub frame_of_reference: String,
    /// One per slice, keyed by position in the voxel file.
    pub ct: BTreeMap<usize, String>,
}

impl ImageSetUids {
    pub fn allocate(
        allocator: &mut IdentityAllocator,
        patient: &PatientRecord,
        image_set: &ImageSetRecord,
    ) -> Self {
        let mrn = patient.medical_record_number.as_str();
        let image_set_id = image_set.image_set_id.to_string();
        let ct = image_set
            .slices
            .iter()
            .map(|slice| {
                let number = slice.info.slice_number.to_string();
                let uid = allocator.allocate(
                    UidRole::CtImage,
                    slice.index as u64 + 1,
                    &[mrn, image_set_id.as_str(), number.as_str()],
                );
                (slice.index, uid)
            })
            .collect();
        Self {
            study: allocator.allocate(UidRole::Study, 0, &[mrn]),
            series: allocator.allocate(UidRole::Series, 0, &[mrn, image_set_id.as_str()]),
            frame_of_reference: allocator.allocate(
                UidRole::FrameOfReference,
                0,
                &[mrn, image_set_id.as_str()],
            ),
            ct,
        }
    }

    /// Identifier of the slice at file position `index`.
    pub fn ct_uid(&self, index: usize) -> Option<&str> {
        self.ct.get(&index).map(String::as_str)
    }
}

/// Identifiers of the objects derived from one plan trial.
///
/// Each object kind gets a series of its own, apart from the CT series it
/// references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanUids {
    pub structure_set: String,
    pub structure_set_series: String,
    pub plan: String,
    pub plan_series: String,
    pub dose: String,
    pub dose_series: String,
}

impl PlanUids {
    pub fn allocate(
        allocator: &mut IdentityAllocator,
        patient: &PatientRecord,
        image_set: &ImageSetRecord,
        plan_id: i64,
        trial: Option<&Trial>,
    ) -> Self {
        let mrn = patient.medical_record_number.as_str();
        let image_set_id = image_set.image_set_id.to_string();
        let plan_text = plan_id.to_string();
        let trial_text = trial.map(|trial| trial.id).unwrap_or_default().to_string();
        let index = plan_id.unsigned_abs();
        let plan_parts = [mrn, image_set_id.as_str(), plan_text.as_str()];
        let trial_parts = [
            mrn,
            image_set_id.as_str(),
            plan_text.as_str(),
            trial_text.as_str(),
        ];
        let mut series = |role: UidRole, parts: &[&str]| {
            let mut keyed = vec![role.tag()];
            keyed.extend_from_slice(parts);
            allocator.allocate(UidRole::Series, 0, &keyed)
        };
        let structure_set_series = series(UidRole::StructureSet, &plan_parts);
        let plan_series = series(UidRole::Plan, &trial_parts);
        let dose_series = series(UidRole::Dose, &trial_parts);
        Self {
            structure_set: allocator.allocate(UidRole::StructureSet, index, &plan_parts),
            structure_set_series,
            plan: allocator.allocate(UidRole::Plan, index, &trial_parts),
            plan_series,
            dose: allocator.allocate(UidRole::Dose, index, &trial_parts),
            dose_series,
        }
    }
}

/// Everything a builder reads besides its own payload.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub settings: &'a ConversionSettings,
    pub patient: &'a PatientRecord,
    pub image_set: &'a ImageSetRecord,
    pub transform: &'a CoordinateTransform,
    pub uids: &'a ImageSetUids,
}

/// Plan-level inputs of the structure set, plan and dose builders.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub base: BuildContext<'a>,
    pub plan: &'a PlanRecord,
    pub uids: &'a PlanUids,
}
