//! Field mappings from record trees to the typed planning records.

use pbk_model::{
    Beam, BeamModifier, ControlPoint, CpManager, Curve, DoseGridGeometry, ImageSetHeader,
    ImageSetInfo, ImageSetSummary, ImageSliceInfo, Machine, MachineEnergy, MonitorUnitInfo,
    ObjectVersion, PatientRecord, PatientSetup, PlanInfo, PlanSummary, Poi, Prescription, Roi,
    Trial, WedgeContext,
};

use crate::bind::{BindError, FieldReader, FromRecord};
use crate::tree::RecordTree;

impl FromRecord for ObjectVersion {
    const RECORD: &'static str = "ObjectVersion";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let version = ObjectVersion {
            write_version: f.optional_string("WriteVersion"),
            create_version: f.optional_string("CreateVersion"),
            create_time_stamp: f.optional_string("CreateTimeStamp"),
            write_time_stamp: f.optional_string("WriteTimeStamp"),
            last_modified_time_stamp: f.optional_string("LastModifiedTimeStamp"),
        };
        f.finish(version)
    }
}

// =============================================================================
// Patient
// =============================================================================

impl FromRecord for ImageSetSummary {
    const RECORD: &'static str = "ImageSet";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let summary = ImageSetSummary {
            image_set_id: f.required_i64("ImageSetID"),
            image_name: f.optional_string("ImageName"),
            exam_id: f.optional_string("ExamID"),
            study_id: f.optional_string("StudyID"),
            modality: f.optional_string("Modality"),
            number_of_images: f.optional_i64("NumberOfImages"),
            scan_time_from_scanner: f.optional_string("ScanTimeFromScanner"),
        };
        f.finish(summary)
    }
}

impl FromRecord for PlanSummary {
    const RECORD: &'static str = "Plan";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let summary = PlanSummary {
            plan_id: f.required_i64("PlanID"),
            plan_name: f.optional_string("PlanName"),
            // Negative ids mark a plan without a primary image set.
            primary_ct_image_set_id: f
                .optional_i64("PrimaryCTImageSetID")
                .filter(|id| *id >= 0),
            primary_image_type: f.optional_string("PrimaryImageType"),
            tool_type: f.optional_string("ToolType"),
            pinnacle_version_description: f.optional_string("PinnacleVersionDescription"),
            object_version: f.child("ObjectVersion"),
        };
        f.finish(summary)
    }
}

impl FromRecord for PatientRecord {
    const RECORD: &'static str = "Patient";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let patient = PatientRecord {
            last_name: f.optional_string("LastName"),
            first_name: f.optional_string("FirstName"),
            middle_name: f.optional_string("MiddleName"),
            medical_record_number: f.required_string("MedicalRecordNumber"),
            radiation_oncologist: f.optional_string("RadiationOncologist"),
            gender: f.optional_string("Gender"),
            date_of_birth: f.optional_string("DateOfBirth"),
            image_sets: f.list("ImageSetList.ImageSet"),
            plans: f.list("PlanList.Plan"),
            object_version: f.child("ObjectVersion"),
        };
        f.finish(patient)
    }
}

// =============================================================================
// Image sets
// =============================================================================

impl FromRecord for ImageSetHeader {
    const RECORD: &'static str = "ImageSet.header";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let header = ImageSetHeader {
            x_dim: f.required_usize("x_dim"),
            y_dim: f.required_usize("y_dim"),
            z_dim: f.required_usize("z_dim"),
            datatype: f.optional_i64("datatype"),
            bitpix: f.optional_i64("bitpix"),
            bytes_pix: f.optional_i64("bytes_pix"),
            x_pixdim: f.required_f64("x_pixdim"),
            y_pixdim: f.required_f64("y_pixdim"),
            z_pixdim: f.required_f64("z_pixdim"),
            x_start: f.required_f64("x_start"),
            y_start: f.required_f64("y_start"),
            z_start: f.required_f64("z_start"),
            date: f.optional_string("date"),
            patient_position: f.optional_string("patient_position"),
            manufacturer: f.optional_string("manufacturer"),
            model: f.optional_string("model"),
            couch_pos: f.optional_f64("couch_pos"),
            couch_height: f.optional_f64("couch_height"),
            study_id: f.optional_string("study_id"),
            exam_id: f.optional_string("exam_id"),
            patient_id: f.optional_string("patient_id"),
            modality: f.optional_string("modality"),
        };
        f.finish(header)
    }
}

impl FromRecord for ImageSliceInfo {
    const RECORD: &'static str = "ImageInfo";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let info = ImageSliceInfo {
            slice_number: f.required_i64("SliceNumber"),
            table_position: f.required_f64("TablePosition"),
            couch_pos: f.optional_f64("CouchPos"),
            series_uid: f.optional_string("SeriesUID"),
            study_instance_uid: f.optional_string("StudyInstanceUID"),
            frame_uid: f.optional_string("FrameUID"),
            class_uid: f.optional_string("ClassUID"),
            instance_uid: f.optional_string("InstanceUID"),
        };
        f.finish(info)
    }
}

impl FromRecord for ImageSetInfo {
    const RECORD: &'static str = "ImageSet.ImageSet";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let info = ImageSetInfo {
            image_set_id: f.optional_i64("ImageSetID"),
            patient_id: f.optional_string("PatientID"),
            image_name: f.optional_string("ImageName"),
            name_from_scanner: f.optional_string("NameFromScanner"),
            exam_id: f.optional_string("ExamID"),
            study_id: f.optional_string("StudyID"),
            modality: f.optional_string("Modality"),
            number_of_images: f.optional_i64("NumberOfImages"),
            scan_time_from_scanner: f.optional_string("ScanTimeFromScanner"),
            file_name: f.optional_string("FileName"),
        };
        f.finish(info)
    }
}

// =============================================================================
// Plan
// =============================================================================

impl FromRecord for PlanInfo {
    const RECORD: &'static str = "plan.PlanInfo";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let info = PlanInfo {
            plan_name: f.optional_string("PlanName"),
            patient_name: f.optional_string("PatientName"),
            institution: f.optional_string("Institution"),
            planner: f.optional_string("Planner"),
            physician: f.optional_string("Physician"),
            last_name: f.optional_string("LastName"),
            first_name: f.optional_string("FirstName"),
            middle_name: f.optional_string("MiddleName"),
            medical_record_number: f.optional_string("MedicalRecordNumber"),
            gender: f.optional_string("Gender"),
            date_of_birth: f.optional_string("DateOfBirth"),
        };
        f.finish(info)
    }
}

impl FromRecord for PatientSetup {
    const RECORD: &'static str = "plan.PatientSetup";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let setup = PatientSetup {
            position: f.optional_string("Position"),
            orientation: f.optional_string("Orientation"),
            table_motion: f.optional_string("TableMotion"),
            object_version: f.child("ObjectVersion"),
        };
        f.finish(setup)
    }
}

impl FromRecord for Poi {
    const RECORD: &'static str = "Poi";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let poi = Poi {
            name: f.required_string("Name"),
            x: f.required_f64("XCoord"),
            y: f.required_f64("YCoord"),
            z: f.required_f64("ZCoord"),
            radius: f.optional_f64("Radius"),
            color: f.optional_string("Color"),
            coord_sys: f.optional_string("CoordSys"),
        };
        f.finish(poi)
    }
}

impl FromRecord for Curve {
    const RECORD: &'static str = "curve";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let points = f.numbers("points").unwrap_or_default();
        let declared = f
            .optional_i64("num_points")
            .and_then(|count| usize::try_from(count).ok());
        let curve = Curve {
            num_points: declared.unwrap_or(points.len() / 3),
            points,
        };
        f.finish(curve)
    }
}

impl FromRecord for Roi {
    const RECORD: &'static str = "roi";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let roi = Roi {
            name: f.required_string("name"),
            color: f.optional_string("color"),
            density: f.optional_f64("density"),
            density_units: f.optional_string("density_units"),
            curves: f.list("curve"),
        };
        f.finish(roi)
    }
}

// =============================================================================
// Trial
// =============================================================================

impl FromRecord for Prescription {
    const RECORD: &'static str = "Prescription";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let prescription = Prescription {
            name: f.required_string("Name"),
            requested_monitor_units_per_fraction: f
                .optional_f64("RequestedMonitorUnitsPerFraction"),
            prescription_dose: f.required_f64("PrescriptionDose"),
            prescription_percent: f.optional_f64("PrescriptionPercent"),
            number_of_fractions: f.required_u32("NumberOfFractions"),
            prescription_point: f.optional_string("PrescriptionPoint"),
            method: f.optional_string("Method"),
            normalization_method: f.optional_string("NormalizationMethod"),
        };
        f.finish(prescription)
    }
}

impl FromRecord for MonitorUnitInfo {
    const RECORD: &'static str = "MonitorUnitInfo";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let info = MonitorUnitInfo {
            prescription_dose: f.optional_f64("PrescriptionDose"),
            normalized_dose: f.optional_f64("NormalizedDose"),
            collimator_output_factor: f.optional_f64("CollimatorOutputFactor"),
            total_transmission_fraction: f.optional_f64("TotalTransmissionFraction"),
            source_to_prescription_point_distance: f
                .optional_f64("SourceToPrescriptionPointDistance"),
        };
        f.finish(info)
    }
}

impl FromRecord for WedgeContext {
    const RECORD: &'static str = "WedgeContext";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        // The angle is free text such as "No Wedge" when no wedge is inserted.
        let angle = f
            .optional_string("Angle")
            .and_then(|angle| angle.parse::<f64>().ok());
        let wedge = WedgeContext {
            wedge_name: f.optional_string("WedgeName"),
            orientation: f.optional_string("Orientation"),
            angle,
        };
        f.finish(wedge)
    }
}

/// One painted contour of a beam modifier.
struct CurvePainter(Vec<f64>);

impl FromRecord for CurvePainter {
    const RECORD: &'static str = "CurvePainter";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let points = f.numbers("Curve.RawData.Points").unwrap_or_default();
        f.finish(CurvePainter(points))
    }
}

impl FromRecord for BeamModifier {
    const RECORD: &'static str = "BeamModifier";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let modifier = BeamModifier {
            name: f.optional_string("Name"),
            structure_to_block: f.optional_string("StructureToBlock"),
            margin: f.optional_f64("Margin"),
            contours: f
                .list::<CurvePainter>("ContourList.CurvePainter")
                .into_iter()
                .map(|painter| painter.0)
                .collect(),
        };
        f.finish(modifier)
    }
}

impl FromRecord for ControlPoint {
    const RECORD: &'static str = "ControlPoint";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let point = ControlPoint {
            gantry: f.required_f64("Gantry"),
            couch: f.required_f64("Couch"),
            collimator: f.required_f64("Collimator"),
            left_jaw_position: f.required_f64("LeftJawPosition"),
            right_jaw_position: f.required_f64("RightJawPosition"),
            top_jaw_position: f.required_f64("TopJawPosition"),
            bottom_jaw_position: f.required_f64("BottomJawPosition"),
            weight: f.required_f64("Weight"),
            weight_locked: f.optional_i64("WeightLocked"),
            percent_of_arc: f.optional_f64("PercentOfArc"),
            wedge: f.child("WedgeContext"),
            modifiers: f.list("ModifierList.BeamModifier"),
            mlc_leaf_positions: f.numbers("MLCLeafPositions.RawData.Points"),
        };
        f.finish(point)
    }
}

impl FromRecord for CpManager {
    const RECORD: &'static str = "CPManagerObject";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let manager = CpManager {
            number_of_control_points: f.optional_i64("NumberOfControlPoints"),
            gantry_is_ccw: f.optional_i64("GantryIsCCW"),
            mlc_push_method: f.optional_string("MLCPushMethod"),
            jaws_conformance: f.optional_string("JawsConformance"),
            control_points: f.list("ControlPointList.ControlPoint"),
        };
        f.finish(manager)
    }
}

impl FromRecord for Beam {
    const RECORD: &'static str = "Beam";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let beam = Beam {
            name: f.required_string("Name"),
            isocenter_name: f.optional_string("IsocenterName"),
            prescription_name: f.optional_string("PrescriptionName"),
            machine_name_and_version: f.optional_string("MachineNameAndVersion"),
            modality: f.optional_string("Modality"),
            machine_energy_name: f.optional_string("MachineEnergyName"),
            set_beam_type: f.optional_string("SetBeamType"),
            use_mlc: f.optional_i64("UseMLC"),
            ssd: f.optional_f64("SSD"),
            avg_ssd: f.optional_f64("AvgSSD"),
            cp_managers: f.list("CPManager.CPManagerObject"),
            monitor_unit_info: f.child("MonitorUnitInfo").unwrap_or_default(),
            dose_volume: f.optional_string("DoseVolume"),
            prescription: None,
        };
        f.finish(beam)
    }
}

impl FromRecord for Trial {
    const RECORD: &'static str = "Trial";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let dose_grid = DoseGridGeometry {
            voxel_size: [
                f.required_f64("DoseGridVoxelSizeX"),
                f.required_f64("DoseGridVoxelSizeY"),
                f.required_f64("DoseGridVoxelSizeZ"),
            ],
            dimension: [
                f.required_usize("DoseGridDimensionX"),
                f.required_usize("DoseGridDimensionY"),
                f.required_usize("DoseGridDimensionZ"),
            ],
            origin: [
                f.required_f64("DoseGridOriginX"),
                f.required_f64("DoseGridOriginY"),
                f.required_f64("DoseGridOriginZ"),
            ],
        };
        let trial = Trial {
            name: f.required_string("Name"),
            id: 0,
            dose_grid,
            dose_start_slice: f.optional_i64("DoseStartSlice"),
            dose_end_slice: f.optional_i64("DoseEndSlice"),
            prescriptions: f.list("PrescriptionList.Prescription"),
            beams: f.list("BeamList.Beam"),
            object_version: f.child("ObjectVersion"),
        };
        f.finish(trial)
    }
}

// =============================================================================
// Machines
// =============================================================================

impl FromRecord for MachineEnergy {
    const RECORD: &'static str = "MachineEnergy";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let energy = MachineEnergy {
            value: f.optional_f64("Value"),
            id: f.optional_i64("Id"),
            name: f.optional_string("Name"),
            dose_per_mu_at_calibration: f
                .optional_f64("PhysicsData.OutputFactor.DosePerMuAtCalibration"),
        };
        f.finish(energy)
    }
}

impl FromRecord for Machine {
    const RECORD: &'static str = "Machine";

    fn from_record(tree: &RecordTree) -> Result<Self, BindError> {
        let mut f = FieldReader::new(Self::RECORD, tree);
        let machine = Machine {
            name: f.required_string("Name"),
            machine_type: f.optional_string("MachineType"),
            sad: f.optional_f64("SAD"),
            photon_energies: f.list("PhotonEnergyList.MachineEnergy"),
            electron_energies: f.list("ElectronEnergyList.MachineEnergy"),
        };
        f.finish(machine)
    }
}
