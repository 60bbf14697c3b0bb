//! Scan geometry and per-slice metadata of one image set.

use serde::{Deserialize, Serialize};

use crate::position::PatientPosition;

/// Geometry header of an image set (`ImageSet_N.header`).
///
/// Lengths are in centimeters, as recorded by the planning system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSetHeader {
    pub x_dim: usize,
    pub y_dim: usize,
    pub z_dim: usize,
    pub datatype: Option<i64>,
    pub bitpix: Option<i64>,
    pub bytes_pix: Option<i64>,
    pub x_pixdim: f64,
    pub y_pixdim: f64,
    pub z_pixdim: f64,
    pub x_start: f64,
    pub y_start: f64,
    pub z_start: f64,
    pub date: Option<String>,
    pub patient_position: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub couch_pos: Option<f64>,
    pub couch_height: Option<f64>,
    pub study_id: Option<String>,
    pub exam_id: Option<String>,
    pub patient_id: Option<String>,
    pub modality: Option<String>,
}

impl ImageSetHeader {
    pub fn position(&self) -> PatientPosition {
        self.patient_position
            .as_deref()
            .map(PatientPosition::from_code)
            .unwrap_or_default()
    }

    pub fn voxel_count(&self) -> usize {
        self.x_dim * self.y_dim * self.z_dim
    }

    pub fn slice_len(&self) -> usize {
        self.x_dim * self.y_dim
    }

    /// Bits per stored sample, 16 when the header does not say.
    pub fn bits_per_sample(&self) -> u32 {
        match self.bitpix {
            Some(bits) if bits > 0 => bits as u32,
            _ => 16,
        }
    }
}

/// Per-slice metadata (`ImageSet_N.ImageInfo`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSliceInfo {
    pub slice_number: i64,
    pub table_position: f64,
    pub couch_pos: Option<f64>,
    pub series_uid: Option<String>,
    pub study_instance_uid: Option<String>,
    pub frame_uid: Option<String>,
    pub class_uid: Option<String>,
    pub instance_uid: Option<String>,
}

/// One slice together with its position in the voxel file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSlice {
    pub index: usize,
    pub info: ImageSliceInfo,
}

/// Slices of an image set, unique by slice number and ordered by ascending
/// table position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSlices {
    slices: Vec<ImageSlice>,
}

impl ImageSlices {
    /// Builds the slice list from entries in voxel-file order.
    ///
    /// The first entry for a slice number wins; later duplicates are dropped.
    pub fn new(entries: Vec<ImageSliceInfo>) -> Self {
        let mut slices: Vec<ImageSlice> = Vec::with_capacity(entries.len());
        for (index, info) in entries.into_iter().enumerate() {
            if slices
                .iter()
                .any(|slice| slice.info.slice_number == info.slice_number)
            {
                continue;
            }
            slices.push(ImageSlice { index, info });
        }
        slices.sort_by(|a, b| a.info.table_position.total_cmp(&b.info.table_position));
        Self { slices }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageSlice> {
        self.slices.iter()
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Slices in voxel-file order.
    pub fn in_file_order(&self) -> Vec<&ImageSlice> {
        let mut ordered: Vec<&ImageSlice> = self.slices.iter().collect();
        ordered.sort_by_key(|slice| slice.index);
        ordered
    }

    /// First slice whose table position lies strictly within `tolerance` of `z`.
    pub fn nearest_within(&self, z: f64, tolerance: f64) -> Option<&ImageSlice> {
        self.in_file_order()
            .into_iter()
            .find(|slice| (z - slice.info.table_position).abs() < tolerance)
    }
}

/// Scanner-side description of an image set (`ImageSet_N.ImageSet`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSetInfo {
    pub image_set_id: Option<i64>,
    pub patient_id: Option<String>,
    pub image_name: Option<String>,
    pub name_from_scanner: Option<String>,
    pub exam_id: Option<String>,
    pub study_id: Option<String>,
    pub modality: Option<String>,
    pub number_of_images: Option<i64>,
    pub scan_time_from_scanner: Option<String>,
    pub file_name: Option<String>,
}

/// Everything loaded for one image set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSetRecord {
    pub image_set_id: i64,
    pub header: ImageSetHeader,
    pub info: Option<ImageSetInfo>,
    pub slices: ImageSlices,
}

impl ImageSetRecord {
    pub fn position(&self) -> PatientPosition {
        self.header.position()
    }
}

/// Decoded voxel samples in file order, one `x_dim * y_dim` plane per slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageVolume {
    pub dims: [usize; 3],
    pub samples: Vec<i16>,
}

impl ImageVolume {
    pub fn slice_len(&self) -> usize {
        self.dims[0] * self.dims[1]
    }

    /// Samples of the plane at `index` in file order.
    pub fn slice(&self, index: usize) -> Option<&[i16]> {
        let len = self.slice_len();
        let start = index.checked_mul(len)?;
        self.samples.get(start..start + len)
    }
}
