//! Patient backup directory layout and record loading.
//!
//! ```text
//! Patient_N/
//! ├── Patient
//! ├── ImageSet_0.header
//! ├── ImageSet_0.ImageInfo
//! ├── ImageSet_0.ImageSet
//! ├── ImageSet_0.img
//! └── Plan_0/
//!     ├── plan.PlanInfo
//!     ├── plan.PatientSetup
//!     ├── plan.Points
//!     ├── plan.roi
//!     ├── plan.Trial
//!     ├── plan.Trial.binary.000
//!     └── plan.Pinnacle.Machines
//! ```

use std::path::{Path, PathBuf};

use pbk_model::{
    ImageSetHeader, ImageSetInfo, ImageSetRecord, ImageSliceInfo, ImageSlices, ImageVolume, Machine,
    PatientRecord, PatientSetup, PlanInfo, PlanRecord, Poi, Roi, Trial,
};
use tracing::{debug, info, warn};

use crate::bind::{FromRecord, bind, bind_list};
use crate::error::{IngestError, Result};
use crate::kind::RecordKind;
use crate::parser::parse_record_file;
use crate::voxels::read_volume;

/// File names inside a patient backup directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupLayout {
    root: PathBuf,
}

impl BackupLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn patient_file(&self) -> PathBuf {
        self.root.join("Patient")
    }

    fn image_set_file(&self, image_set_id: i64, extension: &str) -> PathBuf {
        self.root.join(format!("ImageSet_{image_set_id}.{extension}"))
    }

    pub fn header_file(&self, image_set_id: i64) -> PathBuf {
        self.image_set_file(image_set_id, "header")
    }

    pub fn image_info_file(&self, image_set_id: i64) -> PathBuf {
        self.image_set_file(image_set_id, "ImageInfo")
    }

    pub fn image_set_info_file(&self, image_set_id: i64) -> PathBuf {
        self.image_set_file(image_set_id, "ImageSet")
    }

    pub fn voxel_file(&self, image_set_id: i64) -> PathBuf {
        self.image_set_file(image_set_id, "img")
    }

    pub fn plan_dir(&self, plan_id: i64) -> PathBuf {
        self.root.join(format!("Plan_{plan_id}"))
    }

    /// A `plan.*` record file, e.g. `plan_file(0, "Trial")`.
    pub fn plan_file(&self, plan_id: i64, record: &str) -> PathBuf {
        self.plan_dir(plan_id).join(format!("plan.{record}"))
    }
}

/// Image sets and plans actually present on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Inventory {
    pub(crate) image_set_ids: Vec<i64>,
    pub(crate) plan_ids: Vec<i64>,
}

/// Scans a backup directory for `ImageSet_N.header` files and `Plan_N` directories.
///
/// Ids are sorted ascending.
pub(crate) fn scan_backup(root: &Path) -> Result<Inventory> {
    if !root.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: root.to_path_buf(),
        });
    }
    let entries = std::fs::read_dir(root).map_err(|source| IngestError::DirectoryRead {
        path: root.to_path_buf(),
        source,
    })?;

    let mut inventory = Inventory::default();
    for entry_result in entries {
        let entry = entry_result.map_err(|source| IngestError::DirectoryRead {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if path.is_dir() {
            if let Some(id) = name.strip_prefix("Plan_").and_then(|id| id.parse().ok()) {
                inventory.plan_ids.push(id);
            }
        } else if let Some(id) = name
            .strip_prefix("ImageSet_")
            .and_then(|rest| rest.strip_suffix(".header"))
            .and_then(|id| id.parse().ok())
        {
            inventory.image_set_ids.push(id);
        }
    }
    inventory.image_set_ids.sort_unstable();
    inventory.plan_ids.sort_unstable();
    Ok(inventory)
}

/// An opened patient backup: the parsed patient record plus on-demand
/// loading of image sets and plans.
#[derive(Debug, Clone)]
pub struct PatientBackup {
    layout: BackupLayout,
    patient: PatientRecord,
}

impl PatientBackup {
    /// Opens a backup by reading its `Patient` record.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let inventory = scan_backup(root)?;
        let layout = BackupLayout::new(root);
        let patient: PatientRecord = read_record(&layout.patient_file(), RecordKind::Patient)?;

        for summary in &patient.image_sets {
            if !inventory.image_set_ids.contains(&summary.image_set_id) {
                warn!(image_set = summary.image_set_id, "listed image set has no header file");
            }
        }
        for summary in &patient.plans {
            if !inventory.plan_ids.contains(&summary.plan_id) {
                warn!(plan = summary.plan_id, "listed plan has no directory");
            }
        }
        info!(
            path = %root.display(),
            mrn = %patient.medical_record_number,
            image_sets = patient.image_sets.len(),
            plans = patient.plans.len(),
            "opened patient backup"
        );
        Ok(Self { layout, patient })
    }

    pub fn layout(&self) -> &BackupLayout {
        &self.layout
    }

    pub fn patient(&self) -> &PatientRecord {
        &self.patient
    }

    pub fn image_set_ids(&self) -> Vec<i64> {
        self.patient
            .image_sets
            .iter()
            .map(|summary| summary.image_set_id)
            .collect()
    }

    pub fn plan_ids(&self) -> Vec<i64> {
        self.patient.plans.iter().map(|plan| plan.plan_id).collect()
    }

    /// Loads an image set's header and slice list.
    pub fn load_image_set(&self, image_set_id: i64) -> Result<ImageSetRecord> {
        if self.patient.image_set(image_set_id).is_none() {
            return Err(IngestError::ImageSetNotFound { id: image_set_id });
        }
        let header: ImageSetHeader = read_record(
            &self.layout.header_file(image_set_id),
            RecordKind::ImageSetHeader,
        )?;
        let entries: Vec<ImageSliceInfo> = read_list(
            &self.layout.image_info_file(image_set_id),
            RecordKind::ImageInfo,
            "ImageInfo",
        )?;
        let declared = entries.len();
        let slices = ImageSlices::new(entries);
        if slices.len() < declared {
            warn!(
                image_set = image_set_id,
                dropped = declared - slices.len(),
                "duplicate slice numbers dropped"
            );
        }

        let info_path = self.layout.image_set_info_file(image_set_id);
        let info = if info_path.is_file() {
            Some(read_record::<ImageSetInfo>(&info_path, RecordKind::ImageSet)?)
        } else {
            debug!(path = %info_path.display(), "no image set description");
            None
        };

        debug!(
            image_set = image_set_id,
            dims = ?[header.x_dim, header.y_dim, header.z_dim],
            slices = slices.len(),
            "loaded image set"
        );
        Ok(ImageSetRecord {
            image_set_id,
            header,
            info,
            slices,
        })
    }

    /// Reads the voxel file of a loaded image set.
    pub fn load_volume(&self, image_set: &ImageSetRecord, hu_offset: i32) -> Result<ImageVolume> {
        read_volume(
            &self.layout.voxel_file(image_set.image_set_id),
            &image_set.header,
            hu_offset,
        )
    }

    /// Loads the plan-level records shared by every trial of a plan.
    pub fn load_plan(&self, plan_id: i64) -> Result<PlanRecord> {
        let summary = self
            .patient
            .plan(plan_id)
            .ok_or(IngestError::PlanNotFound { id: plan_id })?;

        let info: PlanInfo = read_optional(
            &self.layout.plan_file(plan_id, "PlanInfo"),
            RecordKind::PlanInfo,
        )?
        .unwrap_or_default();
        let setup: PatientSetup = read_optional(
            &self.layout.plan_file(plan_id, "PatientSetup"),
            RecordKind::PatientSetup,
        )?
        .unwrap_or_default();
        let points: Vec<Poi> = read_optional_list(
            &self.layout.plan_file(plan_id, "Points"),
            RecordKind::Points,
            "Poi",
        )?;
        let rois: Vec<Roi> = read_optional_list(
            &self.layout.plan_file(plan_id, "roi"),
            RecordKind::Roi,
            "roi",
        )?;

        let plan_name = summary
            .plan_name
            .clone()
            .or_else(|| info.plan_name.clone())
            .unwrap_or_else(|| format!("Plan_{plan_id}"));
        debug!(
            plan = plan_id,
            name = %plan_name,
            points = points.len(),
            rois = rois.len(),
            "loaded plan"
        );
        Ok(PlanRecord {
            plan_id,
            plan_name,
            primary_image_set_id: summary.primary_ct_image_set_id,
            info,
            setup,
            points,
            rois,
        })
    }

    /// Loads every trial of a plan as written, before linking and splitting.
    pub fn load_trials(&self, plan_id: i64) -> Result<Vec<Trial>> {
        if self.patient.plan(plan_id).is_none() {
            return Err(IngestError::PlanNotFound { id: plan_id });
        }
        let trials: Vec<Trial> = read_list(
            &self.layout.plan_file(plan_id, "Trial"),
            RecordKind::Trial,
            "Trial",
        )?;
        debug!(plan = plan_id, trials = trials.len(), "loaded trials");
        Ok(trials)
    }

    /// Loads the plan's machine models; an absent machine file yields none.
    pub fn load_machines(&self, plan_id: i64) -> Result<Vec<Machine>> {
        let path = self.layout.plan_file(plan_id, "Pinnacle.Machines");
        if !path.is_file() {
            warn!(plan = plan_id, path = %path.display(), "no machine file, calibration unavailable");
            return Ok(Vec::new());
        }
        read_list(&path, RecordKind::Machines, "Machine")
    }
}

fn read_record<T: FromRecord>(path: &Path, kind: RecordKind) -> Result<T> {
    let tree = parse_record_file(path, kind)?;
    bind(&tree).map_err(|source| IngestError::Bind {
        path: path.to_path_buf(),
        source,
    })
}

fn read_list<T: FromRecord>(path: &Path, kind: RecordKind, key: &str) -> Result<Vec<T>> {
    let tree = parse_record_file(path, kind)?;
    bind_list(&tree, key).map_err(|source| IngestError::Bind {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional<T: FromRecord>(path: &Path, kind: RecordKind) -> Result<Option<T>> {
    if !path.is_file() {
        warn!(path = %path.display(), "record file missing, using empty {}", T::RECORD);
        return Ok(None);
    }
    read_record(path, kind).map(Some)
}

fn read_optional_list<T: FromRecord>(path: &Path, kind: RecordKind, key: &str) -> Result<Vec<T>> {
    if !path.is_file() {
        warn!(path = %path.display(), "record file missing, no {} entries", T::RECORD);
        return Ok(Vec::new());
    }
    read_list(path, kind, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn layout_names_files() {
        let layout = BackupLayout::new("/data/Patient_6204");
        assert_eq!(
            layout.header_file(0),
            PathBuf::from("/data/Patient_6204/ImageSet_0.header")
        );
        assert_eq!(
            layout.plan_file(1, "Pinnacle.Machines"),
            PathBuf::from("/data/Patient_6204/Plan_1/plan.Pinnacle.Machines")
        );
    }

    #[test]
    fn scan_finds_image_sets_and_plans() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Patient"), "").unwrap();
        std::fs::write(dir.path().join("ImageSet_2.header"), "").unwrap();
        std::fs::write(dir.path().join("ImageSet_0.header"), "").unwrap();
        std::fs::write(dir.path().join("ImageSet_0.img"), "").unwrap();
        std::fs::create_dir(dir.path().join("Plan_1")).unwrap();
        std::fs::create_dir(dir.path().join("Plan_x")).unwrap();

        let inventory = scan_backup(dir.path()).unwrap();
        assert_eq!(inventory.image_set_ids, vec![0, 2]);
        assert_eq!(inventory.plan_ids, vec![1]);
    }

    #[test]
    fn missing_root_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            PatientBackup::open(&missing),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }
}
