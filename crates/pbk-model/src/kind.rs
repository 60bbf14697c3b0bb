use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// CT Image Storage.
pub const CT_IMAGE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.2";
/// RT Dose Storage.
pub const RT_DOSE_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.481.2";
/// RT Structure Set Storage.
pub const RT_STRUCTURE_SET_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.481.3";
/// RT Plan Storage.
pub const RT_PLAN_STORAGE: &str = "1.2.840.10008.5.1.4.1.1.481.5";
/// Detached Study Management, referenced from structure sets.
pub const STUDY_COMPONENT_MANAGEMENT: &str = "1.2.840.10008.3.1.2.3.1";
/// Explicit VR Little Endian transfer syntax.
pub const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";

/// The four kinds of output object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Image,
    StructureSet,
    Plan,
    Dose,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 4] = [
        ObjectKind::Image,
        ObjectKind::StructureSet,
        ObjectKind::Plan,
        ObjectKind::Dose,
    ];

    /// Short code used in file names and identifier role tags.
    pub fn code(self) -> &'static str {
        match self {
            Self::Image => "CT",
            Self::StructureSet => "RS",
            Self::Plan => "RP",
            Self::Dose => "RD",
        }
    }

    pub fn modality(self) -> &'static str {
        match self {
            Self::Image => "CT",
            Self::StructureSet => "RTSTRUCT",
            Self::Plan => "RTPLAN",
            Self::Dose => "RTDOSE",
        }
    }

    pub fn sop_class_uid(self) -> &'static str {
        match self {
            Self::Image => CT_IMAGE_STORAGE,
            Self::StructureSet => RT_STRUCTURE_SET_STORAGE,
            Self::Plan => RT_PLAN_STORAGE,
            Self::Dose => RT_DOSE_STORAGE,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Image => "CT image slice",
            Self::StructureSet => "RT structure set",
            Self::Plan => "RT plan",
            Self::Dose => "RT dose",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ObjectKind {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_uppercase().as_str() {
            "CT" | "IMAGE" => Ok(Self::Image),
            "RS" | "STRUCTURE" | "RTSTRUCT" => Ok(Self::StructureSet),
            "RP" | "PLAN" | "RTPLAN" => Ok(Self::Plan),
            "RD" | "DOSE" | "RTDOSE" => Ok(Self::Dose),
            _ => Err(ModelError::UnknownObjectKind(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_and_names() {
        assert_eq!("rs".parse::<ObjectKind>().unwrap(), ObjectKind::StructureSet);
        assert_eq!("Dose".parse::<ObjectKind>().unwrap(), ObjectKind::Dose);
        assert!("MR".parse::<ObjectKind>().is_err());
    }
}
