//! Modules shared by every output object: SOP common, patient, study,
//! series, frame of reference and equipment.

use chrono::{NaiveDate, NaiveDateTime};
use pbk_model::tags::{
    ACCESSION_NUMBER, FRAME_OF_REFERENCE_UID, INSTANCE_CREATION_DATE, INSTANCE_CREATION_TIME,
    INSTITUTION_ADDRESS, INSTITUTION_NAME, MANUFACTURER, MANUFACTURER_MODEL_NAME, MODALITY,
    PATIENT_BIRTH_DATE, PATIENT_ID, PATIENT_NAME, PATIENT_POSITION, PATIENT_SEX,
    POSITION_REFERENCE_INDICATOR, REFERENCED_SOP_CLASS_UID, REFERENCED_SOP_INSTANCE_UID,
    REFERRING_PHYSICIAN_NAME, SERIES_INSTANCE_UID, SERIES_NUMBER, SOP_CLASS_UID,
    SOP_INSTANCE_UID, SPECIFIC_CHARACTER_SET, STATION_NAME, STUDY_DATE, STUDY_ID,
    STUDY_INSTANCE_UID, STUDY_TIME,
};
use pbk_model::{Dataset, ObjectKind, Vr};
use tracing::warn;

use crate::context::BuildContext;

/// Date and time in `YYYYMMDD` / `HHMMSS` form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stamp {
    pub date: String,
    pub time: String,
}

impl Stamp {
    /// Parses a record time stamp such as `2019-03-05 10:11:12`.
    ///
    /// A stamp that does not parse keeps whatever date digits it has and an
    /// empty time.
    pub fn parse(text: Option<&str>) -> Self {
        let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
            return Self::default();
        };
        let parsed = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok());
        if let Some(stamp) = parsed {
            return Self {
                date: stamp.format("%Y%m%d").to_string(),
                time: stamp.format("%H%M%S").to_string(),
            };
        }
        warn!(stamp = text, "unrecognized time stamp");
        Self {
            date: date_digits(text),
            time: String::new(),
        }
    }
}

/// `YYYYMMDD` from the first word of a record date.
pub fn date_digits(text: &str) -> String {
    let first = text.split_whitespace().next().unwrap_or_default();
    NaiveDate::parse_from_str(first, "%Y-%m-%d")
        .map(|date| date.format("%Y%m%d").to_string())
        .unwrap_or_else(|_| first.chars().filter(char::is_ascii_digit).collect())
}

/// Scan date of the image set, used as study date.
pub fn scan_date(ctx: &BuildContext<'_>) -> String {
    ctx.image_set
        .header
        .date
        .as_deref()
        .map(date_digits)
        .unwrap_or_default()
}

pub fn reference_item(class_uid: &str, instance_uid: &str) -> Dataset {
    let mut item = Dataset::new();
    item.put_str(REFERENCED_SOP_CLASS_UID, Vr::UI, class_uid)
        .put_str(REFERENCED_SOP_INSTANCE_UID, Vr::UI, instance_uid);
    item
}

/// Identifiers of one output object.
#[derive(Debug, Clone, Copy)]
pub struct ObjectIds<'a> {
    pub instance: &'a str,
    pub series: &'a str,
}

/// Writes the modules every object kind carries.
pub fn put_common_modules(
    dataset: &mut Dataset,
    ctx: &BuildContext<'_>,
    kind: ObjectKind,
    ids: ObjectIds<'_>,
    created: &Stamp,
) {
    put_sop_common(dataset, kind, ids.instance, created);
    put_patient(dataset, ctx);
    put_frame_of_reference(dataset, ctx);
    put_study(dataset, ctx);
    put_series(dataset, ctx, kind, ids.series);
    put_equipment(dataset, ctx, kind);
}

fn put_sop_common(dataset: &mut Dataset, kind: ObjectKind, instance_uid: &str, created: &Stamp) {
    dataset
        .put_str(SPECIFIC_CHARACTER_SET, Vr::CS, "ISO_IR 100")
        .put_str(SOP_CLASS_UID, Vr::UI, kind.sop_class_uid())
        .put_str(SOP_INSTANCE_UID, Vr::UI, instance_uid)
        .put_str(INSTANCE_CREATION_DATE, Vr::DA, created.date.as_str());
    if !created.time.is_empty() {
        dataset.put_str(INSTANCE_CREATION_TIME, Vr::TM, created.time.as_str());
    }
}

fn put_patient(dataset: &mut Dataset, ctx: &BuildContext<'_>) {
    let patient = ctx.patient;
    let birth_date: String = patient
        .date_of_birth
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    dataset
        .put_str(PATIENT_NAME, Vr::PN, patient.person_name())
        .put_str(PATIENT_ID, Vr::LO, patient.medical_record_number.as_str())
        .put_str(PATIENT_BIRTH_DATE, Vr::DA, birth_date)
        .put_str(PATIENT_SEX, Vr::CS, patient.sex_code().unwrap_or_default());
}

fn put_frame_of_reference(dataset: &mut Dataset, ctx: &BuildContext<'_>) {
    dataset
        .put_str(FRAME_OF_REFERENCE_UID, Vr::UI, ctx.uids.frame_of_reference.as_str())
        .put_empty(POSITION_REFERENCE_INDICATOR, Vr::LO);
}

fn put_study(dataset: &mut Dataset, ctx: &BuildContext<'_>) {
    let header = &ctx.image_set.header;
    let study_id = [header.study_id.as_deref(), header.exam_id.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|id| !id.is_empty())
        .map_or_else(|| mrn_tail(&ctx.patient.medical_record_number, 4), str::to_string);
    dataset
        .put_str(STUDY_DATE, Vr::DA, scan_date(ctx))
        .put_str(STUDY_TIME, Vr::TM, "000000")
        .put_str(STUDY_INSTANCE_UID, Vr::UI, ctx.uids.study.as_str())
        .put_str(STUDY_ID, Vr::SH, truncate(&study_id, 16))
        .put_empty(ACCESSION_NUMBER, Vr::SH)
        .put_empty(REFERRING_PHYSICIAN_NAME, Vr::PN);
}

fn put_series(
    dataset: &mut Dataset,
    ctx: &BuildContext<'_>,
    kind: ObjectKind,
    series_uid: &str,
) {
    let header = &ctx.image_set.header;
    dataset
        .put_str(SERIES_INSTANCE_UID, Vr::UI, series_uid)
        .put_str(MODALITY, Vr::CS, kind.modality());
    match header
        .exam_id
        .as_deref()
        .and_then(|exam| exam.trim().parse::<i64>().ok())
    {
        Some(number) => dataset.put_is(SERIES_NUMBER, number),
        None => dataset.put_empty(SERIES_NUMBER, Vr::IS),
    };
    if kind == ObjectKind::Image {
        dataset.put_str(PATIENT_POSITION, Vr::CS, ctx.image_set.position().code());
    }
}

fn put_equipment(dataset: &mut Dataset, ctx: &BuildContext<'_>, kind: ObjectKind) {
    let settings = ctx.settings;
    if kind == ObjectKind::Image {
        let header = &ctx.image_set.header;
        dataset
            .put_str(MANUFACTURER, Vr::LO, header.manufacturer.as_deref().unwrap_or_default())
            .put_str(
                MANUFACTURER_MODEL_NAME,
                Vr::LO,
                header.model.as_deref().unwrap_or_default(),
            );
    } else {
        dataset.put_str(MANUFACTURER, Vr::LO, settings.manufacturer.as_str());
    }
    if !settings.institution_name.is_empty() {
        dataset.put_str(INSTITUTION_NAME, Vr::LO, settings.institution_name.as_str());
    }
    if !settings.institution_address.is_empty() {
        dataset.put_str(INSTITUTION_ADDRESS, Vr::ST, settings.institution_address.as_str());
    }
    dataset.put_str(STATION_NAME, Vr::SH, settings.station_name.as_str());
}

fn mrn_tail(mrn: &str, count: usize) -> String {
    let chars: Vec<char> = mrn.chars().collect();
    chars[chars.len().saturating_sub(count)..].iter().collect()
}

/// First `max` characters of `text`.
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
