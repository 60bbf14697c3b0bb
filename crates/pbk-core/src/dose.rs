//! RT dose builder over a reconstructed trial dose grid.

use pbk_model::tags::{
    BITS_ALLOCATED, BITS_STORED, COLUMNS, CONTENT_DATE, CONTENT_TIME, DOSE_GRID_SCALING,
    DOSE_SUMMATION_TYPE, DOSE_TYPE, DOSE_UNITS, FRAME_INCREMENT_POINTER, GRID_FRAME_OFFSET_VECTOR,
    HIGH_BIT, IMAGE_ORIENTATION_PATIENT, IMAGE_POSITION_PATIENT, INSTANCE_NUMBER,
    NUMBER_OF_FRAMES, PHOTOMETRIC_INTERPRETATION, PIXEL_DATA, PIXEL_REPRESENTATION,
    PIXEL_SPACING, REFERENCED_RT_PLAN_SEQUENCE, RESCALE_INTERCEPT, RESCALE_SLOPE, ROWS,
    SAMPLES_PER_PIXEL,
};
use pbk_model::{Dataset, ObjectKind, RT_PLAN_STORAGE, Trial, Value, Vr};
use pbk_transform::DoseReconstruction;
use tracing::debug;

use crate::context::PlanContext;
use crate::ct::dimension;
use crate::error::{ConvertError, Result};
use crate::modules::{ObjectIds, Stamp, put_common_modules, reference_item};

/// Builds the dose object of `trial` from its reconstruction.
///
/// Fails with [`ConvertError::EmptyDose`] when the trial has beams but none
/// of them contributed.
pub fn build_dose(
    ctx: &PlanContext<'_>,
    trial: &Trial,
    reconstruction: &DoseReconstruction,
) -> Result<Dataset> {
    if !trial.beams.is_empty() && reconstruction.contributing_beams(trial.beams.len()) == 0 {
        return Err(ConvertError::EmptyDose {
            plan_id: ctx.plan.plan_id,
            trial: trial.name.clone(),
        });
    }
    let grid = &reconstruction.grid;
    let geometry = grid.geometry;
    let settings = ctx.base.settings;
    let created = Stamp::parse(ctx.plan.write_time_stamp());

    let mut dataset = Dataset::new();
    put_common_modules(
        &mut dataset,
        &ctx.base,
        ObjectKind::Dose,
        ObjectIds {
            instance: &ctx.uids.dose,
            series: &ctx.uids.dose_series,
        },
        &created,
    );

    // RT dose
    let content = Stamp::parse(trial.write_time_stamp());
    dataset
        .put_str(CONTENT_DATE, Vr::DA, content.date)
        .put_str(CONTENT_TIME, Vr::TM, content.time)
        .put_is(INSTANCE_NUMBER, trial.id as i64 + 1)
        .put_u16(SAMPLES_PER_PIXEL, 1)
        .put_str(PHOTOMETRIC_INTERPRETATION, Vr::CS, "MONOCHROME2")
        .put_u16(BITS_ALLOCATED, 32)
        .put_u16(BITS_STORED, 32)
        .put_u16(HIGH_BIT, 31)
        .put_u16(PIXEL_REPRESENTATION, 0)
        .put_str(DOSE_UNITS, Vr::CS, "GY")
        .put_str(DOSE_TYPE, Vr::CS, "PHYSICAL")
        .put_str(DOSE_SUMMATION_TYPE, Vr::CS, "PLAN")
        .put_sequence(
            REFERENCED_RT_PLAN_SEQUENCE,
            vec![reference_item(RT_PLAN_STORAGE, &ctx.uids.plan)],
        );

    // Image plane, multi-frame and pixels
    let [dx, dy, dz] = geometry.voxel_size;
    let [nx, ny, nz] = geometry.dimension;
    let [ox, oy, oz] = geometry.origin;
    // The grid origin sits on the last row; the output position is the first.
    let position = ctx
        .base
        .transform
        .apply_mm([ox, oy + dy * (ny as f64 - 1.0), oz]);
    let offsets: Vec<f64> = (0..nz).map(|frame| -10.0 * dz * frame as f64).collect();
    let orientation = ctx
        .base
        .image_set
        .position()
        .image_orientation(ObjectKind::Dose);
    let pixels = grid.quantize(settings.dose_grid_scaling);
    debug!(
        trial = %trial.name,
        frames = nz,
        max_gy = grid.max(),
        "built dose"
    );
    dataset
        .put_ds_values(PIXEL_SPACING, &[10.0 * dy, 10.0 * dx])
        .put_u16(ROWS, dimension(ny))
        .put_u16(COLUMNS, dimension(nx))
        .put_is(NUMBER_OF_FRAMES, nz as i64)
        .put_ds_values(GRID_FRAME_OFFSET_VECTOR, &offsets)
        .put(
            FRAME_INCREMENT_POINTER,
            Vr::AT,
            Value::Tags(vec![GRID_FRAME_OFFSET_VECTOR]),
        )
        .put_ds(RESCALE_INTERCEPT, 0.0)
        .put_ds(RESCALE_SLOPE, 1.0)
        .put_ds_values(IMAGE_POSITION_PATIENT, &position)
        .put_ds_values(IMAGE_ORIENTATION_PATIENT, &orientation)
        .put_ds(DOSE_GRID_SCALING, settings.dose_grid_scaling)
        .put(
            PIXEL_DATA,
            Vr::OW,
            Value::Bytes(pixels.iter().flat_map(|value| value.to_le_bytes()).collect()),
        );
    Ok(dataset)
}
