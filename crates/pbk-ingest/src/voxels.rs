//! Raw voxel file reader (`ImageSet_N.img`).

use std::path::Path;

use pbk_model::{ImageSetHeader, ImageVolume};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Reads an image set's voxel file as stored values minus `hu_offset`.
///
/// Samples are little-endian signed integers of the header's `bitpix`
/// width. Bytes past the declared voxel count are ignored.
pub fn read_volume(path: &Path, header: &ImageSetHeader, hu_offset: i32) -> Result<ImageVolume> {
    if !path.is_file() {
        return Err(IngestError::DataFileMissing {
            path: path.to_path_buf(),
        });
    }
    let bits = header.bits_per_sample();
    let width = match bits {
        8 | 16 | 32 => (bits / 8) as usize,
        _ => {
            return Err(IngestError::SampleWidth {
                path: path.to_path_buf(),
                bits,
            });
        }
    };

    let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let expected = header.voxel_count();
    let actual = bytes.len() / width;
    if actual < expected {
        return Err(IngestError::VoxelCount {
            path: path.to_path_buf(),
            expected,
            actual,
        });
    }
    if actual > expected {
        debug!(path = %path.display(), expected, actual, "ignoring trailing voxel data");
    }

    let samples = bytes
        .chunks_exact(width)
        .take(expected)
        .map(|chunk| to_hounsfield(decode_sample(chunk), hu_offset))
        .collect();
    Ok(ImageVolume {
        dims: [header.x_dim, header.y_dim, header.z_dim],
        samples,
    })
}

fn decode_sample(chunk: &[u8]) -> i64 {
    match *chunk {
        [b0] => i64::from(b0 as i8),
        [b0, b1] => i64::from(i16::from_le_bytes([b0, b1])),
        [b0, b1, b2, b3] => i64::from(i32::from_le_bytes([b0, b1, b2, b3])),
        _ => 0,
    }
}

fn to_hounsfield(stored: i64, hu_offset: i32) -> i16 {
    let value = stored - i64::from(hu_offset);
    value.clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
}
