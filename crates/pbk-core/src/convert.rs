//! Conversion orchestration over one opened backup.
//!
//! Objects are built in a fixed order: CT series per image set, then per
//! plan the structure set followed by plan and dose objects per trial. Each
//! image set, plan and trial is an independent unit; a failure is recorded
//! in the [`ConversionReport`] and the run moves on to the next unit.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use pbk_ingest::PatientBackup;
use pbk_model::{ConversionSettings, Dataset, ImageSetRecord, ObjectKind, PlanRecord, Trial};
use pbk_transform::{
    BinaryDoseFiles, CoordinateTransform, IdentityAllocator, prepare_trials, reconstruct,
};
use tracing::{debug, error, info, info_span, warn};

use crate::context::{BuildContext, ImageSetUids, PlanContext, PlanUids};
use crate::ct::build_ct_slice;
use crate::dose::build_dose;
use crate::error::{ConvertError, Result, SinkError};
use crate::plan::build_plan;
use crate::structure_set::build_structure_set;

/// What to convert and where the output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub kinds: BTreeSet<ObjectKind>,
    /// Plans to convert; empty means every plan.
    pub plan_ids: Vec<i64>,
    /// Image sets whose CT series to convert; empty means every image set.
    pub image_set_ids: Vec<i64>,
    pub output_dir: Option<PathBuf>,
}

impl Default for ConversionRequest {
    fn default() -> Self {
        Self {
            kinds: ObjectKind::ALL.into_iter().collect(),
            plan_ids: Vec::new(),
            image_set_ids: Vec::new(),
            output_dir: None,
        }
    }
}

impl ConversionRequest {
    #[must_use]
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = ObjectKind>) -> Self {
        self.kinds = kinds.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_plans(mut self, plan_ids: impl IntoIterator<Item = i64>) -> Self {
        self.plan_ids = plan_ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_image_sets(mut self, image_set_ids: impl IntoIterator<Item = i64>) -> Self {
        self.image_set_ids = image_set_ids.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn wants(&self, kind: ObjectKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Output directory, `./{mrn}` unless one was given.
    pub fn resolve_output_dir(&self, mrn: &str) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".").join(mrn.trim()))
    }

    fn selected(requested: &[i64], available: Vec<i64>) -> Vec<i64> {
        if requested.is_empty() {
            available
        } else {
            requested.to_vec()
        }
    }
}

/// A finished object handed to the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputObject {
    pub kind: ObjectKind,
    pub file_name: String,
    pub sop_instance_uid: String,
    pub dataset: Dataset,
    pub plan_id: Option<i64>,
    pub trial_id: Option<usize>,
}

/// Receives every finished object of a run.
///
/// The file sink of the command line encodes and writes each object; tests
/// and dry runs collect them instead.
pub trait ObjectSink {
    fn accept(&mut self, object: OutputObject) -> std::result::Result<(), SinkError>;
}

/// Sink that keeps every object in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub objects: Vec<OutputObject>,
}

impl CollectingSink {
    pub fn of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = &OutputObject> {
        self.objects.iter().filter(move |object| object.kind == kind)
    }
}

impl ObjectSink for CollectingSink {
    fn accept(&mut self, object: OutputObject) -> std::result::Result<(), SinkError> {
        self.objects.push(object);
        Ok(())
    }
}

/// Report line for one object the sink accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducedObject {
    pub kind: ObjectKind,
    pub file_name: String,
    pub sop_instance_uid: String,
    pub plan_id: Option<i64>,
    pub trial_id: Option<usize>,
}

/// One unit of work that did not produce its object.
#[derive(Debug)]
pub struct ConversionFailure {
    /// The image set, plan, trial or slice the failure belongs to.
    pub scope: String,
    pub error: ConvertError,
}

#[derive(Debug, Default)]
pub struct ConversionReport {
    pub produced: Vec<ProducedObject>,
    pub failures: Vec<ConversionFailure>,
}

impl ConversionReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.produced
            .iter()
            .filter(|object| object.kind == kind)
            .count()
    }
}

/// Converts the requested objects of `backup`, handing each one to `sink`.
///
/// One identifier allocator serves the whole run, so every object refers to
/// the same study identifier.
pub fn run_conversion(
    backup: &PatientBackup,
    request: &ConversionRequest,
    settings: &ConversionSettings,
    sink: &mut dyn ObjectSink,
) -> ConversionReport {
    let mut conversion = Conversion {
        backup,
        request,
        settings,
        sink,
        allocator: IdentityAllocator::new(&settings.uid_root),
        image_sets: BTreeMap::new(),
        report: ConversionReport::default(),
    };

    if request.wants(ObjectKind::Image) {
        for id in ConversionRequest::selected(&request.image_set_ids, backup.image_set_ids()) {
            conversion.convert_image_set(id);
        }
    }
    let plan_kinds = [ObjectKind::StructureSet, ObjectKind::Plan, ObjectKind::Dose];
    if plan_kinds.iter().any(|kind| request.wants(*kind)) {
        for id in ConversionRequest::selected(&request.plan_ids, backup.plan_ids()) {
            conversion.convert_plan(id);
        }
    }

    let report = conversion.report;
    info!(
        produced = report.produced.len(),
        failed = report.failures.len(),
        identifiers = conversion.allocator.len(),
        "conversion finished"
    );
    report
}

#[derive(Debug, Clone)]
struct LoadedImageSet {
    record: ImageSetRecord,
    transform: CoordinateTransform,
    uids: ImageSetUids,
}

struct Conversion<'a> {
    backup: &'a PatientBackup,
    request: &'a ConversionRequest,
    settings: &'a ConversionSettings,
    sink: &'a mut dyn ObjectSink,
    allocator: IdentityAllocator,
    image_sets: BTreeMap<i64, LoadedImageSet>,
    report: ConversionReport,
}

impl Conversion<'_> {
    /// Loads an image set once per run, allocating its identifiers.
    fn image_set(&mut self, id: i64) -> Result<&LoadedImageSet> {
        match self.image_sets.entry(id) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let record = self.backup.load_image_set(id)?;
                let transform = CoordinateTransform::from_header(&record.header);
                let uids =
                    ImageSetUids::allocate(&mut self.allocator, self.backup.patient(), &record);
                Ok(entry.insert(LoadedImageSet {
                    record,
                    transform,
                    uids,
                }))
            }
        }
    }

    fn convert_image_set(&mut self, id: i64) {
        let _span = info_span!("build", kind = %ObjectKind::Image, image_set = id).entered();
        if let Err(error) = self.try_image_set(id) {
            self.fail(format!("image set {id}"), error);
        }
    }

    fn try_image_set(&mut self, id: i64) -> Result<()> {
        let (backup, settings) = (self.backup, self.settings);
        let loaded = self.image_set(id)?.clone();
        let volume = backup.load_volume(&loaded.record, settings.hu_offset)?;
        let ctx = BuildContext {
            settings,
            patient: backup.patient(),
            image_set: &loaded.record,
            transform: &loaded.transform,
            uids: &loaded.uids,
        };
        for (ordinal, slice) in (1..).zip(loaded.record.slices.in_file_order()) {
            let dataset = match build_ct_slice(&ctx, &volume, slice, ordinal) {
                Ok(dataset) => dataset,
                Err(error) => {
                    let scope = format!("image set {id} slice {}", slice.info.slice_number);
                    self.fail(scope, error);
                    continue;
                }
            };
            let uid = ctx.uids.ct_uid(slice.index).unwrap_or_default().to_string();
            self.emit(OutputObject {
                kind: ObjectKind::Image,
                file_name: format!("CT_{:03}.{uid}.dcm", slice.index + 1),
                sop_instance_uid: uid,
                dataset,
                plan_id: None,
                trial_id: None,
            });
        }
        Ok(())
    }

    fn convert_plan(&mut self, plan_id: i64) {
        let _span = info_span!("build", plan_id).entered();
        if let Err(error) = self.try_plan(plan_id) {
            self.fail(format!("plan {plan_id}"), error);
        }
    }

    fn try_plan(&mut self, plan_id: i64) -> Result<()> {
        let (backup, settings, request) = (self.backup, self.settings, self.request);
        let plan = backup.load_plan(plan_id)?;
        let image_set_id = self.plan_image_set(&plan)?;
        let loaded = self.image_set(image_set_id)?.clone();
        let base = BuildContext {
            settings,
            patient: backup.patient(),
            image_set: &loaded.record,
            transform: &loaded.transform,
            uids: &loaded.uids,
        };

        if request.wants(ObjectKind::StructureSet) {
            let uids = PlanUids::allocate(
                &mut self.allocator,
                backup.patient(),
                &loaded.record,
                plan_id,
                None,
            );
            let ctx = PlanContext {
                base,
                plan: &plan,
                uids: &uids,
            };
            let dataset = build_structure_set(&ctx);
            self.emit(OutputObject {
                kind: ObjectKind::StructureSet,
                file_name: format!("RS_{plan_id:03}.{}.dcm", uids.structure_set),
                sop_instance_uid: uids.structure_set.clone(),
                dataset,
                plan_id: Some(plan_id),
                trial_id: None,
            });
        }
        if !request.wants(ObjectKind::Plan) && !request.wants(ObjectKind::Dose) {
            return Ok(());
        }

        let trials = prepare_trials(&backup.load_trials(plan_id)?);
        if trials.is_empty() {
            return Err(ConvertError::NoTrials { plan_id });
        }
        let machines = backup.load_machines(plan_id)?;
        let doses = BinaryDoseFiles::new(backup.layout().plan_dir(plan_id));
        for trial in &trials {
            let _span = info_span!("trial", trial = %trial.name, trial_id = trial.id).entered();
            let uids = PlanUids::allocate(
                &mut self.allocator,
                backup.patient(),
                &loaded.record,
                plan_id,
                Some(trial),
            );
            let ctx = PlanContext {
                base,
                plan: &plan,
                uids: &uids,
            };
            if request.wants(ObjectKind::Plan) {
                let dataset = build_plan(&ctx, trial, &machines);
                self.emit(trial_object(ObjectKind::Plan, &plan, trial, &uids.plan, dataset));
            }
            if request.wants(ObjectKind::Dose) {
                let reconstruction = reconstruct(&trial.dose_grid, &trial.beams, &machines, &doses);
                match build_dose(&ctx, trial, &reconstruction) {
                    Ok(dataset) => {
                        self.emit(trial_object(ObjectKind::Dose, &plan, trial, &uids.dose, dataset));
                    }
                    Err(error) => {
                        let scope = format!("plan {plan_id} trial {} ({})", trial.id, trial.name);
                        self.fail(scope, error);
                    }
                }
            }
        }
        Ok(())
    }

    /// The plan's primary image set, or the first image set when it does not
    /// resolve.
    fn plan_image_set(&self, plan: &PlanRecord) -> Result<i64> {
        let available = self.backup.image_set_ids();
        if let Some(id) = plan.primary_image_set_id
            && available.contains(&id)
        {
            return Ok(id);
        }
        let fallback = available
            .first()
            .copied()
            .ok_or(ConvertError::MissingImageSet {
                plan_id: plan.plan_id,
            })?;
        warn!(
            plan_id = plan.plan_id,
            declared = ?plan.primary_image_set_id,
            fallback,
            "primary image set does not resolve, using the first image set"
        );
        Ok(fallback)
    }

    fn emit(&mut self, object: OutputObject) {
        let produced = ProducedObject {
            kind: object.kind,
            file_name: object.file_name.clone(),
            sop_instance_uid: object.sop_instance_uid.clone(),
            plan_id: object.plan_id,
            trial_id: object.trial_id,
        };
        match self.sink.accept(object) {
            Ok(()) => {
                debug!(kind = %produced.kind, file = %produced.file_name, "object written");
                self.report.produced.push(produced);
            }
            Err(source) => {
                let scope = produced.file_name.clone();
                self.fail(
                    scope,
                    ConvertError::Sink {
                        kind: produced.kind,
                        file_name: produced.file_name,
                        source,
                    },
                );
            }
        }
    }

    fn fail(&mut self, scope: String, error: ConvertError) {
        error!(scope = %scope, error = %error, "conversion step failed");
        self.report.failures.push(ConversionFailure { scope, error });
    }
}

fn trial_object(
    kind: ObjectKind,
    plan: &PlanRecord,
    trial: &Trial,
    uid: &str,
    dataset: Dataset,
) -> OutputObject {
    OutputObject {
        kind,
        file_name: format!(
            "{}_{:03}_{:03}.{uid}.dcm",
            kind.code(),
            plan.plan_id,
            trial.id
        ),
        sop_instance_uid: uid.to_string(),
        dataset,
        plan_id: Some(plan.plan_id),
        trial_id: Some(trial.id),
    }
}
