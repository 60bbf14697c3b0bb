//! Attribute tags used by the generated objects, named by their keyword.

use crate::dataset::Tag;

// SOP common
pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
pub const IMAGE_TYPE: Tag = Tag(0x0008, 0x0008);
pub const INSTANCE_CREATION_DATE: Tag = Tag(0x0008, 0x0012);
pub const INSTANCE_CREATION_TIME: Tag = Tag(0x0008, 0x0013);
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);

// Study, series and equipment
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
pub const ACQUISITION_DATE: Tag = Tag(0x0008, 0x0022);
pub const CONTENT_DATE: Tag = Tag(0x0008, 0x0023);
pub const STUDY_TIME: Tag = Tag(0x0008, 0x0030);
pub const CONTENT_TIME: Tag = Tag(0x0008, 0x0033);
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
pub const INSTITUTION_NAME: Tag = Tag(0x0008, 0x0080);
pub const INSTITUTION_ADDRESS: Tag = Tag(0x0008, 0x0081);
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x0090);
pub const STATION_NAME: Tag = Tag(0x0008, 0x1010);
pub const MANUFACTURER_MODEL_NAME: Tag = Tag(0x0008, 0x1090);
pub const REFERENCED_SOP_CLASS_UID: Tag = Tag(0x0008, 0x1150);
pub const REFERENCED_SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x1155);

// Patient
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);

// Acquisition
pub const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);
pub const KVP: Tag = Tag(0x0018, 0x0060);
pub const DEVICE_SERIAL_NUMBER: Tag = Tag(0x0018, 0x1000);
pub const TABLE_HEIGHT: Tag = Tag(0x0018, 0x1130);
pub const PATIENT_POSITION: Tag = Tag(0x0018, 0x5100);

// Relationship and image plane
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
pub const STUDY_ID: Tag = Tag(0x0020, 0x0010);
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
pub const ACQUISITION_NUMBER: Tag = Tag(0x0020, 0x0012);
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
pub const PATIENT_ORIENTATION: Tag = Tag(0x0020, 0x0020);
pub const IMAGE_POSITION_PATIENT: Tag = Tag(0x0020, 0x0032);
pub const IMAGE_ORIENTATION_PATIENT: Tag = Tag(0x0020, 0x0037);
pub const FRAME_OF_REFERENCE_UID: Tag = Tag(0x0020, 0x0052);
pub const POSITION_REFERENCE_INDICATOR: Tag = Tag(0x0020, 0x1040);
pub const SLICE_LOCATION: Tag = Tag(0x0020, 0x1041);

// Image pixel
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
pub const FRAME_INCREMENT_POINTER: Tag = Tag(0x0028, 0x0009);
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
pub const BITS_STORED: Tag = Tag(0x0028, 0x0101);
pub const HIGH_BIT: Tag = Tag(0x0028, 0x0102);
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
pub const SMALLEST_IMAGE_PIXEL_VALUE: Tag = Tag(0x0028, 0x0106);
pub const LARGEST_IMAGE_PIXEL_VALUE: Tag = Tag(0x0028, 0x0107);
pub const WINDOW_CENTER: Tag = Tag(0x0028, 0x1050);
pub const WINDOW_WIDTH: Tag = Tag(0x0028, 0x1051);
pub const RESCALE_INTERCEPT: Tag = Tag(0x0028, 0x1052);
pub const RESCALE_SLOPE: Tag = Tag(0x0028, 0x1053);

// RT fluence
pub const PRIMARY_FLUENCE_MODE_SEQUENCE: Tag = Tag(0x3002, 0x0050);
pub const FLUENCE_MODE: Tag = Tag(0x3002, 0x0051);

// RT dose
pub const DOSE_UNITS: Tag = Tag(0x3004, 0x0002);
pub const DOSE_TYPE: Tag = Tag(0x3004, 0x0004);
pub const DOSE_SUMMATION_TYPE: Tag = Tag(0x3004, 0x000A);
pub const GRID_FRAME_OFFSET_VECTOR: Tag = Tag(0x3004, 0x000C);
pub const DOSE_GRID_SCALING: Tag = Tag(0x3004, 0x000E);

// RT structure set
pub const STRUCTURE_SET_LABEL: Tag = Tag(0x3006, 0x0002);
pub const STRUCTURE_SET_NAME: Tag = Tag(0x3006, 0x0004);
pub const STRUCTURE_SET_DATE: Tag = Tag(0x3006, 0x0008);
pub const STRUCTURE_SET_TIME: Tag = Tag(0x3006, 0x0009);
pub const REFERENCED_FRAME_OF_REFERENCE_SEQUENCE: Tag = Tag(0x3006, 0x0010);
pub const RT_REFERENCED_STUDY_SEQUENCE: Tag = Tag(0x3006, 0x0012);
pub const RT_REFERENCED_SERIES_SEQUENCE: Tag = Tag(0x3006, 0x0014);
pub const CONTOUR_IMAGE_SEQUENCE: Tag = Tag(0x3006, 0x0016);
pub const STRUCTURE_SET_ROI_SEQUENCE: Tag = Tag(0x3006, 0x0020);
pub const ROI_NUMBER: Tag = Tag(0x3006, 0x0022);
pub const REFERENCED_FRAME_OF_REFERENCE_UID: Tag = Tag(0x3006, 0x0024);
pub const ROI_NAME: Tag = Tag(0x3006, 0x0026);
pub const ROI_DISPLAY_COLOR: Tag = Tag(0x3006, 0x002A);
pub const ROI_GENERATION_ALGORITHM: Tag = Tag(0x3006, 0x0036);
pub const ROI_CONTOUR_SEQUENCE: Tag = Tag(0x3006, 0x0039);
pub const CONTOUR_SEQUENCE: Tag = Tag(0x3006, 0x0040);
pub const CONTOUR_GEOMETRIC_TYPE: Tag = Tag(0x3006, 0x0042);
pub const NUMBER_OF_CONTOUR_POINTS: Tag = Tag(0x3006, 0x0046);
pub const CONTOUR_DATA: Tag = Tag(0x3006, 0x0050);
pub const RT_ROI_OBSERVATIONS_SEQUENCE: Tag = Tag(0x3006, 0x0080);
pub const OBSERVATION_NUMBER: Tag = Tag(0x3006, 0x0082);
pub const REFERENCED_ROI_NUMBER: Tag = Tag(0x3006, 0x0084);
pub const ROI_OBSERVATION_LABEL: Tag = Tag(0x3006, 0x0085);
pub const RT_ROI_INTERPRETED_TYPE: Tag = Tag(0x3006, 0x00A4);
pub const ROI_INTERPRETER: Tag = Tag(0x3006, 0x00A6);

// RT plan
pub const RT_PLAN_LABEL: Tag = Tag(0x300A, 0x0002);
pub const RT_PLAN_NAME: Tag = Tag(0x300A, 0x0003);
pub const RT_PLAN_DATE: Tag = Tag(0x300A, 0x0006);
pub const RT_PLAN_TIME: Tag = Tag(0x300A, 0x0007);
pub const PLAN_INTENT: Tag = Tag(0x300A, 0x000A);
pub const RT_PLAN_GEOMETRY: Tag = Tag(0x300A, 0x000C);
pub const DOSE_REFERENCE_SEQUENCE: Tag = Tag(0x300A, 0x0010);
pub const DOSE_REFERENCE_NUMBER: Tag = Tag(0x300A, 0x0012);
pub const DOSE_REFERENCE_STRUCTURE_TYPE: Tag = Tag(0x300A, 0x0014);
pub const DOSE_REFERENCE_DESCRIPTION: Tag = Tag(0x300A, 0x0016);
pub const DOSE_REFERENCE_POINT_COORDINATES: Tag = Tag(0x300A, 0x0018);
pub const DOSE_REFERENCE_TYPE: Tag = Tag(0x300A, 0x0020);
pub const TARGET_PRESCRIPTION_DOSE: Tag = Tag(0x300A, 0x0026);
pub const FRACTION_GROUP_SEQUENCE: Tag = Tag(0x300A, 0x0070);
pub const FRACTION_GROUP_NUMBER: Tag = Tag(0x300A, 0x0071);
pub const NUMBER_OF_FRACTIONS_PLANNED: Tag = Tag(0x300A, 0x0078);
pub const NUMBER_OF_BEAMS: Tag = Tag(0x300A, 0x0080);
pub const BEAM_DOSE: Tag = Tag(0x300A, 0x0084);
pub const BEAM_METERSET: Tag = Tag(0x300A, 0x0086);
pub const NUMBER_OF_BRACHY_APPLICATION_SETUPS: Tag = Tag(0x300A, 0x00A0);
pub const BEAM_SEQUENCE: Tag = Tag(0x300A, 0x00B0);
pub const TREATMENT_MACHINE_NAME: Tag = Tag(0x300A, 0x00B2);
pub const PRIMARY_DOSIMETER_UNIT: Tag = Tag(0x300A, 0x00B3);
pub const SOURCE_AXIS_DISTANCE: Tag = Tag(0x300A, 0x00B4);
pub const BEAM_LIMITING_DEVICE_SEQUENCE: Tag = Tag(0x300A, 0x00B6);
pub const RT_BEAM_LIMITING_DEVICE_TYPE: Tag = Tag(0x300A, 0x00B8);
pub const NUMBER_OF_LEAF_JAW_PAIRS: Tag = Tag(0x300A, 0x00BC);
pub const LEAF_POSITION_BOUNDARIES: Tag = Tag(0x300A, 0x00BE);
pub const BEAM_NUMBER: Tag = Tag(0x300A, 0x00C0);
pub const BEAM_NAME: Tag = Tag(0x300A, 0x00C2);
pub const BEAM_TYPE: Tag = Tag(0x300A, 0x00C4);
pub const RADIATION_TYPE: Tag = Tag(0x300A, 0x00C6);
pub const TREATMENT_DELIVERY_TYPE: Tag = Tag(0x300A, 0x00CE);
pub const NUMBER_OF_WEDGES: Tag = Tag(0x300A, 0x00D0);
pub const NUMBER_OF_COMPENSATORS: Tag = Tag(0x300A, 0x00E0);
pub const NUMBER_OF_BOLI: Tag = Tag(0x300A, 0x00ED);
pub const NUMBER_OF_BLOCKS: Tag = Tag(0x300A, 0x00F0);
pub const CUMULATIVE_DOSE_REFERENCE_COEFFICIENT: Tag = Tag(0x300A, 0x010C);
pub const FINAL_CUMULATIVE_METERSET_WEIGHT: Tag = Tag(0x300A, 0x010E);
pub const NUMBER_OF_CONTROL_POINTS: Tag = Tag(0x300A, 0x0110);
pub const CONTROL_POINT_SEQUENCE: Tag = Tag(0x300A, 0x0111);
pub const CONTROL_POINT_INDEX: Tag = Tag(0x300A, 0x0112);
pub const NOMINAL_BEAM_ENERGY: Tag = Tag(0x300A, 0x0114);
pub const DOSE_RATE_SET: Tag = Tag(0x300A, 0x0115);
pub const BEAM_LIMITING_DEVICE_POSITION_SEQUENCE: Tag = Tag(0x300A, 0x011A);
pub const LEAF_JAW_POSITIONS: Tag = Tag(0x300A, 0x011C);
pub const GANTRY_ANGLE: Tag = Tag(0x300A, 0x011E);
pub const GANTRY_ROTATION_DIRECTION: Tag = Tag(0x300A, 0x011F);
pub const BEAM_LIMITING_DEVICE_ANGLE: Tag = Tag(0x300A, 0x0120);
pub const BEAM_LIMITING_DEVICE_ROTATION_DIRECTION: Tag = Tag(0x300A, 0x0121);
pub const PATIENT_SUPPORT_ANGLE: Tag = Tag(0x300A, 0x0122);
pub const PATIENT_SUPPORT_ROTATION_DIRECTION: Tag = Tag(0x300A, 0x0123);
pub const TABLE_TOP_ECCENTRIC_ANGLE: Tag = Tag(0x300A, 0x0125);
pub const TABLE_TOP_ECCENTRIC_ROTATION_DIRECTION: Tag = Tag(0x300A, 0x0126);
pub const TABLE_TOP_VERTICAL_POSITION: Tag = Tag(0x300A, 0x0128);
pub const TABLE_TOP_LONGITUDINAL_POSITION: Tag = Tag(0x300A, 0x0129);
pub const TABLE_TOP_LATERAL_POSITION: Tag = Tag(0x300A, 0x012A);
pub const ISOCENTER_POSITION: Tag = Tag(0x300A, 0x012C);
pub const CUMULATIVE_METERSET_WEIGHT: Tag = Tag(0x300A, 0x0134);
pub const TABLE_TOP_PITCH_ANGLE: Tag = Tag(0x300A, 0x0140);
pub const TABLE_TOP_PITCH_ROTATION_DIRECTION: Tag = Tag(0x300A, 0x0142);
pub const TABLE_TOP_ROLL_ANGLE: Tag = Tag(0x300A, 0x0144);
pub const TABLE_TOP_ROLL_ROTATION_DIRECTION: Tag = Tag(0x300A, 0x0146);
pub const PATIENT_SETUP_SEQUENCE: Tag = Tag(0x300A, 0x0180);
pub const PATIENT_SETUP_NUMBER: Tag = Tag(0x300A, 0x0182);
pub const SETUP_TECHNIQUE: Tag = Tag(0x300A, 0x01B0);

// RT references
pub const REFERENCED_RT_PLAN_SEQUENCE: Tag = Tag(0x300C, 0x0002);
pub const REFERENCED_BEAM_SEQUENCE: Tag = Tag(0x300C, 0x0004);
pub const REFERENCED_BEAM_NUMBER: Tag = Tag(0x300C, 0x0006);
pub const REFERENCED_DOSE_REFERENCE_SEQUENCE: Tag = Tag(0x300C, 0x0050);
pub const REFERENCED_DOSE_REFERENCE_NUMBER: Tag = Tag(0x300C, 0x0051);
pub const REFERENCED_STRUCTURE_SET_SEQUENCE: Tag = Tag(0x300C, 0x0060);
pub const REFERENCED_PATIENT_SETUP_NUMBER: Tag = Tag(0x300C, 0x006A);
pub const REFERENCED_TOLERANCE_TABLE_NUMBER: Tag = Tag(0x300C, 0x00A0);
pub const APPROVAL_STATUS: Tag = Tag(0x300E, 0x0002);

pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);
