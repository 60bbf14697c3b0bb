//! In-memory patient, image set, plan and trial shared by builder tests.

use pbk_model::{
    Beam, ConversionSettings, ControlPoint, CpManager, Curve, DoseGridGeometry, ImageSetHeader,
    ImageSetRecord, ImageSliceInfo, ImageSlices, ImageVolume, Machine, MachineEnergy,
    MonitorUnitInfo, ObjectVersion, PatientRecord, PatientSetup, PlanInfo, PlanRecord, Poi,
    Prescription, Roi, Trial,
};
use pbk_transform::{CoordinateTransform, IdentityAllocator};

use crate::context::{BuildContext, ImageSetUids, PlanContext, PlanUids};

pub(crate) struct Fixture {
    pub settings: ConversionSettings,
    pub patient: PatientRecord,
    pub image_set: ImageSetRecord,
    pub plan: PlanRecord,
    pub trial: Trial,
    pub machines: Vec<Machine>,
    pub transform: CoordinateTransform,
    pub uids: ImageSetUids,
}

impl Fixture {
    pub fn new() -> Self {
        let settings = ConversionSettings::default();
        let patient = patient();
        let image_set = image_set();
        let transform = CoordinateTransform::from_header(&image_set.header);
        let mut allocator = IdentityAllocator::new(&settings.uid_root);
        let uids = ImageSetUids::allocate(&mut allocator, &patient, &image_set);
        Self {
            settings,
            patient,
            image_set,
            plan: plan(),
            trial: trial(),
            machines: vec![machine()],
            transform,
            uids,
        }
    }

    pub fn context(&self) -> BuildContext<'_> {
        BuildContext {
            settings: &self.settings,
            patient: &self.patient,
            image_set: &self.image_set,
            transform: &self.transform,
            uids: &self.uids,
        }
    }

    pub fn plan_uids(&self, trial: Option<&Trial>) -> PlanUids {
        let mut allocator = IdentityAllocator::new(&self.settings.uid_root);
        PlanUids::allocate(
            &mut allocator,
            &self.patient,
            &self.image_set,
            self.plan.plan_id,
            trial,
        )
    }

    pub fn plan_context<'a>(&'a self, uids: &'a PlanUids) -> PlanContext<'a> {
        PlanContext {
            base: self.context(),
            plan: &self.plan,
            uids,
        }
    }

    /// Voxels already offset to Hounsfield units, `10 * v` for voxel `v`.
    pub fn volume(&self) -> ImageVolume {
        ImageVolume {
            dims: [2, 2, 2],
            samples: (0..8).map(|v| 10 * v).collect(),
        }
    }
}

fn stamped(write_time_stamp: &str) -> Option<ObjectVersion> {
    Some(ObjectVersion {
        write_time_stamp: Some(write_time_stamp.to_string()),
        ..ObjectVersion::default()
    })
}

fn patient() -> PatientRecord {
    PatientRecord {
        last_name: Some("Doe".to_string()),
        first_name: Some("Jane".to_string()),
        middle_name: None,
        medical_record_number: "00003030".to_string(),
        radiation_oncologist: None,
        gender: Some("Female".to_string()),
        date_of_birth: Some("1970-01-01".to_string()),
        image_sets: Vec::new(),
        plans: Vec::new(),
        object_version: None,
    }
}

fn slice_info(slice_number: i64, table_position: f64) -> ImageSliceInfo {
    ImageSliceInfo {
        slice_number,
        table_position,
        couch_pos: None,
        series_uid: None,
        study_instance_uid: None,
        frame_uid: None,
        class_uid: None,
        instance_uid: None,
    }
}

fn image_set() -> ImageSetRecord {
    let header = ImageSetHeader {
        x_dim: 2,
        y_dim: 2,
        z_dim: 2,
        datatype: Some(1),
        bitpix: Some(16),
        bytes_pix: Some(2),
        x_pixdim: 1.0,
        y_pixdim: 1.0,
        z_pixdim: 1.0,
        x_start: -1.0,
        // y shift of zero: 10.5 - (10 + 1) + 1 / 2
        y_start: 10.5,
        z_start: 0.0,
        date: Some("2019-03-05 10:11:12".to_string()),
        patient_position: Some("HFS".to_string()),
        manufacturer: Some("GE MEDICAL SYSTEMS".to_string()),
        model: Some("LightSpeed".to_string()),
        couch_pos: None,
        couch_height: Some(10.0),
        study_id: None,
        exam_id: None,
        patient_id: None,
        modality: Some("CT".to_string()),
    };
    ImageSetRecord {
        image_set_id: 0,
        header,
        info: None,
        slices: ImageSlices::new(vec![slice_info(1, 0.0), slice_info(2, 1.0)]),
    }
}

fn plan() -> PlanRecord {
    PlanRecord {
        plan_id: 0,
        plan_name: "Breast".to_string(),
        primary_image_set_id: Some(0),
        info: PlanInfo::default(),
        setup: PatientSetup {
            position: Some("HFS".to_string()),
            object_version: stamped("2020-01-02 03:04:05"),
            ..PatientSetup::default()
        },
        points: vec![Poi {
            name: "iso".to_string(),
            x: 0.5,
            y: 0.5,
            z: 1.0,
            radius: None,
            color: Some("blue".to_string()),
            coord_sys: None,
        }],
        rois: vec![Roi {
            name: "PTV".to_string(),
            color: Some("red".to_string()),
            density: None,
            density_units: None,
            curves: vec![Curve {
                num_points: 3,
                points: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0],
            }],
        }],
    }
}

fn prescription() -> Prescription {
    Prescription {
        name: "Rx1".to_string(),
        requested_monitor_units_per_fraction: None,
        prescription_dose: 200.0,
        prescription_percent: Some(100.0),
        number_of_fractions: 10,
        prescription_point: Some("iso".to_string()),
        method: None,
        normalization_method: None,
    }
}

fn control_point() -> ControlPoint {
    ControlPoint {
        gantry: 180.0,
        couch: 10.0,
        collimator: 0.0,
        left_jaw_position: 5.0,
        right_jaw_position: 5.0,
        top_jaw_position: 4.0,
        bottom_jaw_position: 4.0,
        weight: 1.0,
        weight_locked: None,
        percent_of_arc: None,
        wedge: None,
        modifiers: Vec::new(),
        mlc_leaf_positions: Some(vec![1.0, 2.0, 3.0, 4.0]),
    }
}

fn beam() -> Beam {
    Beam {
        name: "AP".to_string(),
        isocenter_name: Some("iso".to_string()),
        prescription_name: Some("Rx1".to_string()),
        machine_name_and_version: Some("EX_7p4: 2006-03-06 11:59:38".to_string()),
        modality: Some("Photons".to_string()),
        machine_energy_name: Some("6X".to_string()),
        set_beam_type: Some("Static".to_string()),
        use_mlc: Some(1),
        ssd: None,
        avg_ssd: None,
        cp_managers: vec![CpManager {
            number_of_control_points: Some(1),
            gantry_is_ccw: None,
            mlc_push_method: None,
            jaws_conformance: None,
            control_points: vec![control_point()],
        }],
        monitor_unit_info: MonitorUnitInfo {
            prescription_dose: Some(200.0),
            normalized_dose: Some(1.0),
            collimator_output_factor: Some(1.0),
            total_transmission_fraction: Some(1.0),
            source_to_prescription_point_distance: None,
        },
        dose_volume: Some("XDR:0".to_string()),
        prescription: Some(prescription()),
    }
}

fn trial() -> Trial {
    Trial {
        name: "Trial_1".to_string(),
        id: 0,
        dose_grid: DoseGridGeometry {
            voxel_size: [1.0, 1.0, 1.0],
            dimension: [2, 2, 2],
            origin: [0.0, 0.0, 0.0],
        },
        dose_start_slice: None,
        dose_end_slice: None,
        prescriptions: vec![prescription()],
        beams: vec![beam()],
        object_version: stamped("2020-01-03 04:05:06"),
    }
}

fn machine() -> Machine {
    Machine {
        name: "EX_7p4".to_string(),
        machine_type: None,
        sad: Some(100.0),
        photon_energies: vec![MachineEnergy {
            value: Some(6.0),
            id: Some(0),
            name: Some("6X".to_string()),
            dose_per_mu_at_calibration: Some(1.0),
        }],
        electron_energies: Vec::new(),
    }
}
