use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::ObjectKind;

/// Patient position code recorded in the image-set header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatientPosition {
    #[default]
    HeadFirstSupine,
    HeadFirstProne,
    FeetFirstSupine,
    FeetFirstProne,
    Other(String),
}

impl PatientPosition {
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "" | "HFS" => Self::HeadFirstSupine,
            "HFP" => Self::HeadFirstProne,
            "FFS" => Self::FeetFirstSupine,
            "FFP" => Self::FeetFirstProne,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::HeadFirstSupine => "HFS",
            Self::HeadFirstProne => "HFP",
            Self::FeetFirstSupine => "FFS",
            Self::FeetFirstProne => "FFP",
            Self::Other(code) => code,
        }
    }

    pub fn is_prone(&self) -> bool {
        matches!(self, Self::HeadFirstProne | Self::FeetFirstProne)
    }

    /// Direction cosines of the first row and column for the given object kind.
    ///
    /// Prone images flip both in-plane axes; prone dose grids flip only the
    /// column axis. Every other position keeps the identity orientation.
    pub fn image_orientation(&self, kind: ObjectKind) -> [f64; 6] {
        match (self.is_prone(), kind) {
            (true, ObjectKind::Dose) => [1.0, 0.0, 0.0, 0.0, -1.0, 0.0],
            (true, _) => [-1.0, 0.0, 0.0, 0.0, -1.0, 0.0],
            (false, _) => [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        }
    }
}

impl fmt::Display for PatientPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prone_orientation_depends_on_kind() {
        let prone = PatientPosition::from_code("hfp");
        assert_eq!(
            prone.image_orientation(ObjectKind::Image),
            [-1.0, 0.0, 0.0, 0.0, -1.0, 0.0]
        );
        assert_eq!(
            prone.image_orientation(ObjectKind::Dose),
            [1.0, 0.0, 0.0, 0.0, -1.0, 0.0]
        );
        assert_eq!(
            PatientPosition::from_code("FFS").image_orientation(ObjectKind::Dose),
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn unknown_codes_are_kept() {
        let position = PatientPosition::from_code("hfdr");
        assert_eq!(position.code(), "HFDR");
        assert!(!position.is_prone());
    }
}
