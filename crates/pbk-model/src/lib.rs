//! Typed planning records, the encoder-neutral output dataset and the
//! site settings shared by every crate of the converter.

pub mod dataset;
pub mod error;
pub mod image_set;
pub mod kind;
pub mod machine;
pub mod patient;
pub mod plan;
pub mod position;
pub mod settings;
pub mod tags;
pub mod trial;

pub use dataset::{Dataset, Element, Tag, Value, Vr, format_decimal};
pub use error::{ModelError, Result};
pub use image_set::{
    ImageSetHeader, ImageSetInfo, ImageSetRecord, ImageSlice, ImageSliceInfo, ImageSlices,
    ImageVolume,
};
pub use kind::{
    CT_IMAGE_STORAGE, EXPLICIT_VR_LITTLE_ENDIAN, ObjectKind, RT_DOSE_STORAGE, RT_PLAN_STORAGE,
    RT_STRUCTURE_SET_STORAGE, STUDY_COMPONENT_MANAGEMENT,
};
pub use machine::{Machine, MachineEnergy, select_machine};
pub use patient::{ImageSetSummary, ObjectVersion, PatientRecord, PlanSummary};
pub use plan::{Curve, PatientSetup, PlanInfo, PlanRecord, Poi, Roi};
pub use position::PatientPosition;
pub use settings::{ConversionSettings, SliceMatchTolerance, TreatmentMachineSettings};
pub use trial::{
    Beam, BeamDelivery, BeamModifier, ControlPoint, CpManager, DoseGridGeometry, MonitorUnitInfo,
    Prescription, Trial, WedgeContext,
};
