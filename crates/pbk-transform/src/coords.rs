//! Planning-to-patient coordinate transform.
//!
//! Planning coordinates are in centimeters with y measured from the couch.
//! Output coordinates reflect y about the image centre and negate z.

use pbk_model::ImageSetHeader;
use tracing::debug;

/// Output unit of transformed coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Centimeters, one decimal.
    Centimeter,
    /// Millimeters, two decimals.
    Millimeter,
}

/// Shifts derived once per image set from its header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    x_shift: f64,
    y_shift: f64,
    z_shift: f64,
}

impl CoordinateTransform {
    pub fn from_header(header: &ImageSetHeader) -> Self {
        let couch = header.couch_height.unwrap_or_default() + header.y_pixdim;
        let y_shift =
            header.y_start - couch + (header.y_dim as f64 - 1.0) * header.y_pixdim / 2.0;
        debug!(y_shift, "coordinate transform");
        Self {
            x_shift: 0.0,
            y_shift,
            z_shift: 0.0,
        }
    }

    pub fn y_shift(&self) -> f64 {
        self.y_shift
    }

    /// Transforms one point, staying in centimeters.
    pub fn apply(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        [x - self.x_shift, -(y - self.y_shift), -(z - self.z_shift)]
    }

    /// Transforms one point into millimeters.
    pub fn apply_mm(&self, point: [f64; 3]) -> [f64; 3] {
        self.apply(point).map(|value| value * 10.0)
    }

    /// Transforms interleaved `x, y, z` triples into formatted decimal strings.
    ///
    /// A trailing incomplete triple is ignored.
    pub fn to_output_coords(&self, points: &[f64], unit: Unit) -> Vec<String> {
        let triples = points.chunks_exact(3);
        if !triples.remainder().is_empty() {
            debug!(
                values = points.len(),
                "coordinate list is not a multiple of three, dropping the remainder"
            );
        }
        triples
            .flat_map(|triple| self.apply([triple[0], triple[1], triple[2]]))
            .map(|value| match unit {
                Unit::Centimeter => fixed(value, 1),
                Unit::Millimeter => fixed(value * 10.0, 2),
            })
            .collect()
    }
}

/// Fixed-point text without a sign on zero.
fn fixed(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let unsigned = text.trim_start_matches('-');
    if unsigned.chars().all(|c| c == '0' || c == '.') {
        unsigned.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> ImageSetHeader {
        ImageSetHeader {
            x_dim: 512,
            y_dim: 512,
            z_dim: 100,
            datatype: None,
            bitpix: Some(16),
            bytes_pix: None,
            x_pixdim: 0.1,
            y_pixdim: 0.1,
            z_pixdim: 0.3,
            x_start: -25.6,
            y_start: -20.0,
            z_start: 0.0,
            date: None,
            patient_position: None,
            manufacturer: None,
            model: None,
            couch_pos: None,
            couch_height: Some(5.0),
            study_id: None,
            exam_id: None,
            patient_id: None,
            modality: None,
        }
    }

    #[test]
    fn y_shift_follows_header() {
        let transform = CoordinateTransform::from_header(&header());
        // -20 - (5 + 0.1) + 511 * 0.1 / 2
        assert!((transform.y_shift() - 0.45).abs() < 1e-9);
    }

    #[test]
    fn formats_both_units() {
        let transform = CoordinateTransform::from_header(&header());
        let points = [1.0, 0.45, 2.5, -3.3, 1.45, 0.0];
        assert_eq!(
            transform.to_output_coords(&points, Unit::Centimeter),
            vec!["1.0", "0.0", "-2.5", "-3.3", "-1.0", "0.0"]
        );
        assert_eq!(
            transform.to_output_coords(&points, Unit::Millimeter),
            vec!["10.00", "0.00", "-25.00", "-33.00", "-10.00", "0.00"]
        );
    }

    #[test]
    fn incomplete_triple_is_dropped() {
        let transform = CoordinateTransform::from_header(&header());
        assert_eq!(transform.to_output_coords(&[1.0, 2.0], Unit::Millimeter).len(), 0);
    }
}
