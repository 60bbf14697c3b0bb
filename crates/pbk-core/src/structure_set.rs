//! RT structure set builder: plan points and regions of interest.
//!
//! Points come first as `POINT` contours with interpreted type `MARKER`,
//! followed by regions as `CLOSED_PLANAR` contours of type `ORGAN`. Both
//! share one continuous numbering from 1.

use pbk_model::tags::{
    APPROVAL_STATUS, CONTOUR_DATA, CONTOUR_GEOMETRIC_TYPE, CONTOUR_IMAGE_SEQUENCE,
    CONTOUR_SEQUENCE, FRAME_OF_REFERENCE_UID, NUMBER_OF_CONTOUR_POINTS, OBSERVATION_NUMBER,
    REFERENCED_FRAME_OF_REFERENCE_SEQUENCE, REFERENCED_FRAME_OF_REFERENCE_UID,
    REFERENCED_ROI_NUMBER, ROI_CONTOUR_SEQUENCE, ROI_DISPLAY_COLOR, ROI_GENERATION_ALGORITHM,
    ROI_INTERPRETER, ROI_NAME, ROI_NUMBER, ROI_OBSERVATION_LABEL, RT_REFERENCED_SERIES_SEQUENCE,
    RT_REFERENCED_STUDY_SEQUENCE, RT_ROI_INTERPRETED_TYPE, RT_ROI_OBSERVATIONS_SEQUENCE,
    SERIES_INSTANCE_UID, STRUCTURE_SET_DATE, STRUCTURE_SET_LABEL, STRUCTURE_SET_NAME,
    STRUCTURE_SET_ROI_SEQUENCE, STRUCTURE_SET_TIME,
};
use pbk_model::{CT_IMAGE_STORAGE, Dataset, ObjectKind, STUDY_COMPONENT_MANAGEMENT, Vr};
use pbk_transform::Unit;
use tracing::{debug, warn};

use crate::colors::display_color;
use crate::context::{BuildContext, PlanContext};
use crate::modules::{ObjectIds, Stamp, put_common_modules, reference_item, truncate};

/// Image reference written when no slice lies close enough to a contour.
pub const UNRESOLVED_IMAGE_UID: &str = "NO_CLOSEST_CT_IMAGE_LOCATED";

/// One structure entry before it is split across the three sequences.
struct Structure<'a> {
    name: &'a str,
    color: Option<&'a str>,
    interpreted_type: &'static str,
    contours: Vec<Dataset>,
}

pub fn build_structure_set(ctx: &PlanContext<'_>) -> Dataset {
    let base = &ctx.base;
    let created = Stamp::parse(ctx.plan.write_time_stamp());
    let mut dataset = Dataset::new();
    put_common_modules(
        &mut dataset,
        base,
        ObjectKind::StructureSet,
        ObjectIds {
            instance: &ctx.uids.structure_set,
            series: &ctx.uids.structure_set_series,
        },
        &created,
    );

    let mut locator = SliceLocator::new(base);
    let mut structures = Vec::with_capacity(ctx.plan.points.len() + ctx.plan.rois.len());
    for poi in &ctx.plan.points {
        let data = base.transform.to_output_coords(&poi.coordinates(), Unit::Millimeter);
        structures.push(Structure {
            name: &poi.name,
            color: poi.color.as_deref(),
            interpreted_type: "MARKER",
            contours: vec![contour("POINT", 1, data, locator.image_uid(poi.z))],
        });
    }
    for roi in &ctx.plan.rois {
        let contours = roi
            .curves
            .iter()
            .map(|curve| {
                let data = base.transform.to_output_coords(&curve.points, Unit::Millimeter);
                let image = curve
                    .plane_z()
                    .map_or(UNRESOLVED_IMAGE_UID.to_string(), |z| locator.image_uid(z));
                contour("CLOSED_PLANAR", curve.num_points, data, image)
            })
            .collect();
        structures.push(Structure {
            name: &roi.name,
            color: roi.color.as_deref(),
            interpreted_type: "ORGAN",
            contours,
        });
    }
    if locator.unresolved > 0 {
        warn!(
            plan_id = ctx.plan.plan_id,
            contours = locator.unresolved,
            "contours without a matching image slice"
        );
    }

    dataset
        .put_str(STRUCTURE_SET_LABEL, Vr::SH, truncate(&ctx.plan.plan_name, 16))
        .put_str(STRUCTURE_SET_NAME, Vr::LO, "POIandROI")
        .put_empty(STRUCTURE_SET_DATE, Vr::DA)
        .put_empty(STRUCTURE_SET_TIME, Vr::TM)
        .put_str(APPROVAL_STATUS, Vr::CS, "UNAPPROVED")
        .put_sequence(
            REFERENCED_FRAME_OF_REFERENCE_SEQUENCE,
            vec![referenced_frame(base)],
        );

    let mut roi_items = Vec::with_capacity(structures.len());
    let mut contour_items = Vec::with_capacity(structures.len());
    let mut observation_items = Vec::with_capacity(structures.len());
    for (number, structure) in (1i64..).zip(structures) {
        let mut roi = Dataset::new();
        roi.put_is(ROI_NUMBER, number)
            .put_str(
                REFERENCED_FRAME_OF_REFERENCE_UID,
                Vr::UI,
                base.uids.frame_of_reference.as_str(),
            )
            .put_str(ROI_NAME, Vr::LO, structure.name)
            .put_str(ROI_GENERATION_ALGORITHM, Vr::CS, "SEMIAUTOMATIC");
        roi_items.push(roi);

        let color = display_color(structure.color).map(i64::from);
        let mut roi_contour = Dataset::new();
        roi_contour
            .put_is_values(ROI_DISPLAY_COLOR, &color)
            .put_sequence(CONTOUR_SEQUENCE, structure.contours)
            .put_is(REFERENCED_ROI_NUMBER, number);
        contour_items.push(roi_contour);

        let mut observation = Dataset::new();
        observation
            .put_is(OBSERVATION_NUMBER, number)
            .put_is(REFERENCED_ROI_NUMBER, number)
            .put_str(ROI_OBSERVATION_LABEL, Vr::SH, truncate(structure.name, 16))
            .put_str(RT_ROI_INTERPRETED_TYPE, Vr::CS, structure.interpreted_type)
            .put_empty(ROI_INTERPRETER, Vr::PN);
        observation_items.push(observation);
    }
    debug!(structures = roi_items.len(), "built structure set");
    dataset
        .put_sequence(STRUCTURE_SET_ROI_SEQUENCE, roi_items)
        .put_sequence(ROI_CONTOUR_SEQUENCE, contour_items)
        .put_sequence(RT_ROI_OBSERVATIONS_SEQUENCE, observation_items);
    dataset
}

fn contour(geometric_type: &str, points: usize, data: Vec<String>, image_uid: String) -> Dataset {
    let mut item = Dataset::new();
    item.put_sequence(
        CONTOUR_IMAGE_SEQUENCE,
        vec![reference_item(CT_IMAGE_STORAGE, &image_uid)],
    )
    .put_str(CONTOUR_GEOMETRIC_TYPE, Vr::CS, geometric_type)
    .put_is(NUMBER_OF_CONTOUR_POINTS, points as i64)
    .put_strs(CONTOUR_DATA, Vr::DS, data);
    item
}

/// Frame of reference, study, series and every CT slice of the image set.
fn referenced_frame(ctx: &BuildContext<'_>) -> Dataset {
    let images = ctx
        .image_set
        .slices
        .in_file_order()
        .into_iter()
        .filter_map(|slice| ctx.uids.ct_uid(slice.index))
        .map(|uid| reference_item(CT_IMAGE_STORAGE, uid))
        .collect();
    let mut series = Dataset::new();
    series
        .put_str(SERIES_INSTANCE_UID, Vr::UI, ctx.uids.series.as_str())
        .put_sequence(CONTOUR_IMAGE_SEQUENCE, images);

    let mut study = reference_item(STUDY_COMPONENT_MANAGEMENT, &ctx.uids.study);
    study.put_sequence(RT_REFERENCED_SERIES_SEQUENCE, vec![series]);

    let mut frame = Dataset::new();
    frame
        .put_str(FRAME_OF_REFERENCE_UID, Vr::UI, ctx.uids.frame_of_reference.as_str())
        .put_sequence(RT_REFERENCED_STUDY_SEQUENCE, vec![study]);
    frame
}

/// Finds the CT slice a contour plane lies on.
struct SliceLocator<'a> {
    ctx: &'a BuildContext<'a>,
    tolerance: f64,
    unresolved: usize,
}

impl<'a> SliceLocator<'a> {
    fn new(ctx: &'a BuildContext<'a>) -> Self {
        let tolerance = ctx
            .settings
            .slice_match
            .resolve(ctx.image_set.header.z_pixdim);
        Self {
            ctx,
            tolerance,
            unresolved: 0,
        }
    }

    /// Identifier of the first slice within tolerance of table position `z` (cm).
    fn image_uid(&mut self, z: f64) -> String {
        let found = self
            .ctx
            .image_set
            .slices
            .nearest_within(z, self.tolerance)
            .and_then(|slice| self.ctx.uids.ct_uid(slice.index));
        match found {
            Some(uid) => uid.to_string(),
            None => {
                debug!(z, tolerance = self.tolerance, "no image slice near contour");
                self.unresolved += 1;
                UNRESOLVED_IMAGE_UID.to_string()
            }
        }
    }
}
