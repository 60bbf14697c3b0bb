//! CT image builder, one dataset per slice.

use pbk_model::tags::{
    ACQUISITION_DATE, ACQUISITION_NUMBER, BITS_ALLOCATED, BITS_STORED, COLUMNS, CONTENT_DATE,
    HIGH_BIT, IMAGE_ORIENTATION_PATIENT, IMAGE_POSITION_PATIENT, IMAGE_TYPE, INSTANCE_NUMBER, KVP,
    LARGEST_IMAGE_PIXEL_VALUE, PATIENT_ORIENTATION, PHOTOMETRIC_INTERPRETATION, PIXEL_DATA,
    PIXEL_REPRESENTATION, PIXEL_SPACING, RESCALE_INTERCEPT, RESCALE_SLOPE, ROWS,
    SAMPLES_PER_PIXEL, SLICE_LOCATION, SLICE_THICKNESS, SMALLEST_IMAGE_PIXEL_VALUE, TABLE_HEIGHT,
    WINDOW_CENTER, WINDOW_WIDTH,
};
use pbk_model::{Dataset, ImageSlice, ImageVolume, ObjectKind, Value, Vr};
use tracing::trace;

use crate::context::BuildContext;
use crate::error::{ConvertError, Result};
use crate::modules::{ObjectIds, Stamp, put_common_modules, scan_date};

/// Builds the CT object for `slice`, numbered `ordinal` within its series.
pub fn build_ct_slice(
    ctx: &BuildContext<'_>,
    volume: &ImageVolume,
    slice: &ImageSlice,
    ordinal: usize,
) -> Result<Dataset> {
    let pixels = volume
        .slice(slice.index)
        .ok_or(ConvertError::SliceOutOfRange {
            index: slice.index,
            slices: volume.dims[2],
        })?;
    let uid = ctx
        .uids
        .ct_uid(slice.index)
        .ok_or(ConvertError::SliceOutOfRange {
            index: slice.index,
            slices: ctx.uids.ct.len(),
        })?;
    let header = &ctx.image_set.header;
    let date = scan_date(ctx);
    let created = Stamp {
        date: date.clone(),
        time: String::new(),
    };

    let mut dataset = Dataset::new();
    let ids = ObjectIds {
        instance: uid,
        series: &ctx.uids.series,
    };
    put_common_modules(&mut dataset, ctx, ObjectKind::Image, ids, &created);

    // VOI LUT
    dataset
        .put_ds(WINDOW_CENTER, ctx.settings.window_center)
        .put_ds(WINDOW_WIDTH, ctx.settings.window_width);

    // General image and CT image
    let couch_height = header.couch_height.unwrap_or_default();
    dataset
        .put_strs(IMAGE_TYPE, Vr::CS, ["ORIGINAL", "PRIMARY", "AXIAL"])
        .put_str(ACQUISITION_DATE, Vr::DA, date.as_str())
        .put_str(CONTENT_DATE, Vr::DA, date)
        .put_empty(ACQUISITION_NUMBER, Vr::IS)
        .put_is(INSTANCE_NUMBER, ordinal as i64)
        .put_strs(PATIENT_ORIENTATION, Vr::CS, ["L", "P"])
        .put_empty(KVP, Vr::DS)
        .put_ds(TABLE_HEIGHT, 10.0 * couch_height)
        .put_u16(SAMPLES_PER_PIXEL, 1)
        .put_str(PHOTOMETRIC_INTERPRETATION, Vr::CS, "MONOCHROME2")
        .put_u16(BITS_ALLOCATED, 16)
        .put_u16(BITS_STORED, 16)
        .put_u16(HIGH_BIT, 15)
        .put_ds(RESCALE_INTERCEPT, 0.0)
        .put_ds(RESCALE_SLOPE, 1.0);

    // Image plane and pixels
    let table_position = slice.info.table_position;
    let position = [
        -10.0 * header.x_dim as f64 * header.x_pixdim / 2.0,
        -10.0 * (couch_height + header.y_dim as f64 * header.y_pixdim / 2.0),
        -10.0 * table_position,
    ];
    let orientation = ctx.image_set.position().image_orientation(ObjectKind::Image);
    dataset
        .put_ds(SLICE_THICKNESS, 10.0 * header.z_pixdim)
        .put_ds_values(IMAGE_POSITION_PATIENT, &position)
        .put_ds_values(IMAGE_ORIENTATION_PATIENT, &orientation)
        .put_ds(SLICE_LOCATION, -10.0 * table_position)
        .put_ds_values(
            PIXEL_SPACING,
            &[10.0 * header.y_pixdim, 10.0 * header.x_pixdim],
        )
        .put_u16(ROWS, dimension(header.y_dim))
        .put_u16(COLUMNS, dimension(header.x_dim))
        .put_u16(PIXEL_REPRESENTATION, 1)
        .put_i16(
            SMALLEST_IMAGE_PIXEL_VALUE,
            pixels.iter().copied().min().unwrap_or_default(),
        )
        .put_i16(
            LARGEST_IMAGE_PIXEL_VALUE,
            pixels.iter().copied().max().unwrap_or_default(),
        )
        .put(
            PIXEL_DATA,
            Vr::OW,
            Value::Bytes(pixels.iter().flat_map(|value| value.to_le_bytes()).collect()),
        );
    trace!(slice = slice.info.slice_number, uid, "built CT slice");
    Ok(dataset)
}

pub(crate) fn dimension(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
