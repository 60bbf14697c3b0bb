use std::fmt;
use std::str::FromStr;

use crate::error::IngestError;

/// The record files of a patient backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Patient,
    ImageSetHeader,
    ImageInfo,
    ImageSet,
    PlanInfo,
    PatientSetup,
    Points,
    Roi,
    Trial,
    Machines,
    /// Any other record; parsed without repeating-block markers.
    Generic,
}

impl RecordKind {
    pub const ALL: [RecordKind; 11] = [
        RecordKind::Patient,
        RecordKind::ImageSetHeader,
        RecordKind::ImageInfo,
        RecordKind::ImageSet,
        RecordKind::PlanInfo,
        RecordKind::PatientSetup,
        RecordKind::Points,
        RecordKind::Roi,
        RecordKind::Trial,
        RecordKind::Machines,
        RecordKind::Generic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::ImageSetHeader => "header",
            Self::ImageInfo => "image-info",
            Self::ImageSet => "image-set",
            Self::PlanInfo => "plan-info",
            Self::PatientSetup => "patient-setup",
            Self::Points => "points",
            Self::Roi => "roi",
            Self::Trial => "trial",
            Self::Machines => "machines",
            Self::Generic => "generic",
        }
    }

    /// Block names that introduce one element of a repeated list.
    pub fn repeating_markers(self) -> &'static [&'static str] {
        match self {
            Self::Patient => &["ImageSet", "Plan"],
            Self::ImageInfo => &["ImageInfo"],
            Self::Points => &["Poi"],
            Self::Roi => &["roi", "curve"],
            Self::Trial => &[
                "Trial",
                "Prescription",
                "Beam",
                "CPManagerObject",
                "FilmImage",
                "BeamModifier",
                "CurvePainter",
            ],
            Self::Machines => &["MachineEnergy"],
            Self::ImageSetHeader
            | Self::ImageSet
            | Self::PlanInfo
            | Self::PatientSetup
            | Self::Generic => &[],
        }
    }

    pub fn is_marker(self, block: &str) -> bool {
        self.repeating_markers().contains(&block)
    }

    /// List name for numbered placeholder blocks (`#0`, `#1`, ...) found
    /// inside `container`; `container` is empty at file root.
    pub fn placeholder_list_name(self, container: &str) -> String {
        if container.is_empty() {
            return match self {
                Self::Machines => "Machine".to_string(),
                _ => "Item".to_string(),
            };
        }
        match container.strip_suffix("List") {
            Some(element) if !element.is_empty() => element.to_string(),
            _ => format!("{container}Item"),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordKind {
    type Err = IngestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| IngestError::UnknownRecordKind {
                name: value.to_string(),
            })
    }
}

/// Numbered placeholder block names such as `#0` or `#12`.
pub(crate) fn is_placeholder(block: &str) -> bool {
    block
        .strip_prefix('#')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}
