//! End-to-end conversion of a small on-disk backup.

use std::fs;
use std::path::Path;

use pbk_core::{
    CollectingSink, ConversionRequest, ConvertError, ObjectSink, OutputObject, SinkError,
    UNRESOLVED_IMAGE_UID, run_conversion,
};
use pbk_ingest::PatientBackup;
use pbk_model::tags::{
    BEAM_NAME, BEAM_SEQUENCE, CONTOUR_IMAGE_SEQUENCE, CONTOUR_SEQUENCE, MODALITY, PIXEL_DATA,
    REFERENCED_FRAME_OF_REFERENCE_SEQUENCE, REFERENCED_SOP_INSTANCE_UID, ROI_CONTOUR_SEQUENCE,
    RT_PLAN_NAME, RT_REFERENCED_SERIES_SEQUENCE, RT_REFERENCED_STUDY_SEQUENCE,
    SERIES_INSTANCE_UID,
};
use pbk_model::{ConversionSettings, ObjectKind, Value};
use tempfile::TempDir;

const PATIENT: &str = r#"LastName = "DOE";
FirstName = "JANE";
MedicalRecordNumber = "00003030";
Gender = "Female";
DateOfBirth = "1960-01-01";
ImageSetList ={
  ImageSet ={
    ImageSetID = 0;
    ImageName = "ImageSet_0";
    Modality = "CT";
    NumberOfImages = 2;
  };
};
PlanList ={
  Plan ={
    PlanID = 0;
    PlanName = "LT BREAST";
    PrimaryCTImageSetID = 0;
  };
};
"#;

const HEADER: &str = "x_dim = 2;
y_dim = 2;
z_dim = 2;
datatype = 1;
bitpix = 16;
bytes_pix = 2;
x_pixdim = 1.0;
y_pixdim = 1.0;
z_pixdim = 1.0;
x_start = -1.0;
y_start = -1.0;
z_start = 0.0;
patient_position : HFS
couch_height = 10.0;
date : 2019-03-05
";

const IMAGE_INFO: &str = r#"ImageInfo ={
  SliceNumber = 1;
  TablePosition = 1.0;
};
ImageInfo ={
  SliceNumber = 2;
  TablePosition = 0.0;
};
"#;

const POINTS: &str = r#"Poi ={
  Name = "iso";
  XCoord = 0.5;
  YCoord = -0.5;
  ZCoord = 1.0;
};
"#;

const ROI: &str = r#"roi={
  name: PTV
  color: red
  curve={
    num_points = 2;
    points={
      0.0 0.0 0.0
      1.0 0.0 0.0
    };
  };
};
"#;

const FAR_ROI: &str = r#"roi={
  name: Far
  color: green
  curve={
    num_points = 1;
    points={
      0.0 0.0 25.0
    };
  };
};
"#;

const MACHINES: &str = r#"#0 ={
  Name = "EX_7p4";
  SAD = 100;
  PhotonEnergyList ={
    MachineEnergy ={
      Value = 6;
      Name = "6X";
      PhysicsData ={
        OutputFactor ={
          DosePerMuAtCalibration = 1.0;
        };
      };
    };
  };
};
"#;

fn prescription(name: &str) -> String {
    format!(
        r#"    Prescription ={{
      Name = "{name}";
      PrescriptionDose = 200;
      NumberOfFractions = 25;
      PrescriptionPoint = "iso";
    }};
"#
    )
}

fn beam(name: &str, prescription: &str) -> String {
    format!(
        r#"    Beam ={{
      Name = "{name}";
      IsocenterName = "iso";
      PrescriptionName = "{prescription}";
      MachineNameAndVersion = "EX_7p4: 2006-03-06 11:59:38";
      Modality = "Photons";
      MachineEnergyName = "6X";
      SetBeamType = "Static";
      CPManager ={{
        CPManagerObject ={{
          NumberOfControlPoints = 1;
          ControlPointList ={{
            #0 ={{
              Gantry = 0;
              Couch = 0;
              Collimator = 0;
              LeftJawPosition = 5;
              RightJawPosition = 5;
              TopJawPosition = 5;
              BottomJawPosition = 5;
              Weight = 1;
            }};
          }};
        }};
      }};
      MonitorUnitInfo ={{
        PrescriptionDose = 200;
        NormalizedDose = 1.0;
        CollimatorOutputFactor = 1.0;
        TotalTransmissionFraction = 1.0;
      }};
      DoseVolume = \XDR:0\;
    }};
"#
    )
}

/// A trial record with one prescription per distinct name in `beams`.
fn trial(beams: &[(&str, &str)]) -> String {
    let mut names: Vec<&str> = beams.iter().map(|(_, rx)| *rx).collect();
    names.dedup();
    let prescriptions: String = names.iter().map(|name| prescription(name)).collect();
    let beams: String = beams.iter().map(|(name, rx)| beam(name, rx)).collect();
    format!(
        r#"Trial ={{
  Name = "Trial_1";
  DoseGridVoxelSizeX = 1.0;
  DoseGridVoxelSizeY = 1.0;
  DoseGridVoxelSizeZ = 1.0;
  DoseGridDimensionX = 2;
  DoseGridDimensionY = 2;
  DoseGridDimensionZ = 2;
  DoseGridOriginX = -1.0;
  DoseGridOriginY = -1.0;
  DoseGridOriginZ = 0.0;
  PrescriptionList ={{
{prescriptions}  }};
  BeamList ={{
{beams}  }};
}};
"#
    )
}

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write fixture");
}

fn backup_dir(trial_text: &str) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let root = dir.path();
    write(&root.join("Patient"), PATIENT);
    write(&root.join("ImageSet_0.header"), HEADER);
    write(&root.join("ImageSet_0.ImageInfo"), IMAGE_INFO);
    let voxels: Vec<u8> = (0..8i16)
        .flat_map(|v| (1000 + v * 10).to_le_bytes())
        .collect();
    fs::write(root.join("ImageSet_0.img"), voxels).expect("write voxels");

    let plan = root.join("Plan_0");
    fs::create_dir(&plan).expect("create plan dir");
    write(&plan.join("plan.Points"), POINTS);
    write(&plan.join("plan.roi"), ROI);
    write(&plan.join("plan.Trial"), trial_text);
    write(&plan.join("plan.Pinnacle.Machines"), MACHINES);
    // 0.01 per MU and fraction at every voxel
    let dose: Vec<u8> = (0..8).flat_map(|_| 0.01f32.to_be_bytes()).collect();
    fs::write(plan.join("plan.Trial.binary.000"), dose).expect("write dose");
    dir
}

fn convert(dir: &TempDir, request: &ConversionRequest) -> (CollectingSink, pbk_core::ConversionReport) {
    let backup = PatientBackup::open(dir.path()).expect("open backup");
    let mut sink = CollectingSink::default();
    let report = run_conversion(
        &backup,
        request,
        &ConversionSettings::default(),
        &mut sink,
    );
    (sink, report)
}

#[test]
fn converts_every_object_kind() {
    let dir = backup_dir(&trial(&[("AP", "Breast")]));
    let (sink, report) = convert(&dir, &ConversionRequest::default());
    assert!(!report.has_failures(), "failures: {:?}", report.failures);

    assert_eq!(report.count(ObjectKind::Image), 2);
    assert_eq!(report.count(ObjectKind::StructureSet), 1);
    assert_eq!(report.count(ObjectKind::Plan), 1);
    assert_eq!(report.count(ObjectKind::Dose), 1);

    let names: Vec<&str> = sink
        .of_kind(ObjectKind::Image)
        .map(|object| object.file_name.as_str())
        .collect();
    assert!(names[0].starts_with("CT_001."));
    assert!(names[1].starts_with("CT_002."));

    let plan = sink.of_kind(ObjectKind::Plan).next().expect("plan object");
    assert!(plan.file_name.starts_with("RP_000_000."));
    assert!(plan.file_name.ends_with(&format!("{}.dcm", plan.sop_instance_uid)));
    let beams = plan.dataset.items(BEAM_SEQUENCE).expect("beam sequence");
    assert_eq!(beams.len(), 1);

    let dose = sink.of_kind(ObjectKind::Dose).next().expect("dose object");
    let Some(Value::Bytes(bytes)) = dose.dataset.get(PIXEL_DATA).map(|e| &e.value) else {
        panic!("dose pixel data missing");
    };
    // 2 x 2 x 2 voxels of 32 bits
    assert_eq!(bytes.len(), 8 * 4);
}

#[test]
fn two_prescriptions_split_into_two_plans() {
    let dir = backup_dir(&trial(&[("AP", "A"), ("PA", "B")]));
    let request = ConversionRequest::default().with_kinds([ObjectKind::Plan]);
    let (sink, report) = convert(&dir, &request);
    assert!(!report.has_failures(), "failures: {:?}", report.failures);

    let plans: Vec<&OutputObject> = sink.of_kind(ObjectKind::Plan).collect();
    assert_eq!(plans.len(), 2);
    let beams: Vec<&str> = plans
        .iter()
        .map(|plan| {
            let beams = plan.dataset.items(BEAM_SEQUENCE).expect("beam sequence");
            assert_eq!(beams.len(), 1);
            beams[0].text(BEAM_NAME).unwrap_or_default()
        })
        .collect();
    assert_eq!(beams, vec!["AP", "PA"]);
    assert_eq!(plans[0].dataset.text(RT_PLAN_NAME), Some("LT BREAST A"));
    assert_eq!(plans[1].trial_id, Some(1));
    assert_ne!(plans[0].sop_instance_uid, plans[1].sop_instance_uid);
}

#[test]
fn every_modality_gets_its_own_series() {
    let dir = backup_dir(&trial(&[("AP", "A"), ("PA", "B")]));
    let (sink, report) = convert(&dir, &ConversionRequest::default());
    assert!(!report.has_failures(), "failures: {:?}", report.failures);

    let series_of = |kind: ObjectKind| -> Vec<String> {
        sink.of_kind(kind)
            .map(|object| {
                object
                    .dataset
                    .text(SERIES_INSTANCE_UID)
                    .expect("series uid")
                    .to_string()
            })
            .collect()
    };
    let ct = series_of(ObjectKind::Image);
    let rs = series_of(ObjectKind::StructureSet);
    let rp = series_of(ObjectKind::Plan);
    let rd = series_of(ObjectKind::Dose);
    assert_eq!((ct.len(), rs.len(), rp.len(), rd.len()), (2, 1, 2, 2));
    assert_eq!(ct[0], ct[1]);
    assert_ne!(rp[0], rp[1]);
    assert_ne!(rd[0], rd[1]);
    for series in rs.iter().chain(&rp).chain(&rd) {
        assert_ne!(series, &ct[0]);
    }
    for (plan, dose) in rp.iter().zip(&rd) {
        assert_ne!(plan, dose);
    }

    let modalities: Vec<&str> = sink
        .objects
        .iter()
        .filter(|object| object.dataset.text(SERIES_INSTANCE_UID) == Some(rp[0].as_str()))
        .filter_map(|object| object.dataset.text(MODALITY))
        .collect();
    assert_eq!(modalities, vec!["RTPLAN"]);

    let structure_set = sink
        .of_kind(ObjectKind::StructureSet)
        .next()
        .expect("structure set");
    let frame = &structure_set
        .dataset
        .items(REFERENCED_FRAME_OF_REFERENCE_SEQUENCE)
        .expect("frame of reference")[0];
    let study = &frame.items(RT_REFERENCED_STUDY_SEQUENCE).expect("study")[0];
    let referenced = &study.items(RT_REFERENCED_SERIES_SEQUENCE).expect("series")[0];
    assert_eq!(referenced.text(SERIES_INSTANCE_UID), Some(ct[0].as_str()));
}

#[test]
fn contour_off_every_slice_is_unresolved() {
    let dir = backup_dir(&trial(&[("AP", "Breast")]));
    write(
        &dir.path().join("Plan_0/plan.roi"),
        &format!("{ROI}{FAR_ROI}"),
    );
    let request = ConversionRequest::default().with_kinds([ObjectKind::StructureSet]);
    let (sink, report) = convert(&dir, &request);
    assert!(!report.has_failures(), "failures: {:?}", report.failures);

    let structure_set = sink
        .of_kind(ObjectKind::StructureSet)
        .next()
        .expect("structure set");
    let contours = structure_set
        .dataset
        .items(ROI_CONTOUR_SEQUENCE)
        .expect("roi contours");
    // iso, PTV, Far
    assert_eq!(contours.len(), 3);
    let far = &contours[2].items(CONTOUR_SEQUENCE).expect("contours")[0];
    let image = &far.items(CONTOUR_IMAGE_SEQUENCE).expect("image reference")[0];
    assert_eq!(image.text(REFERENCED_SOP_INSTANCE_UID), Some(UNRESOLVED_IMAGE_UID));
}

#[test]
fn missing_dose_file_fails_only_the_dose() {
    let dir = backup_dir(&trial(&[("AP", "Breast")]));
    fs::remove_file(dir.path().join("Plan_0/plan.Trial.binary.000")).expect("remove dose");
    let (_, report) = convert(&dir, &ConversionRequest::default());

    assert_eq!(report.count(ObjectKind::Image), 2);
    assert_eq!(report.count(ObjectKind::Plan), 1);
    assert_eq!(report.count(ObjectKind::Dose), 0);
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        ConvertError::EmptyDose { plan_id: 0, .. }
    ));
}

#[test]
fn unknown_plan_is_reported() {
    let dir = backup_dir(&trial(&[("AP", "Breast")]));
    let request = ConversionRequest::default()
        .with_kinds([ObjectKind::StructureSet])
        .with_plans([4]);
    let (sink, report) = convert(&dir, &request);
    assert!(sink.objects.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].scope, "plan 4");
}

struct RejectingSink;

impl ObjectSink for RejectingSink {
    fn accept(&mut self, object: OutputObject) -> Result<(), SinkError> {
        Err(format!("disk full writing {}", object.file_name).into())
    }
}

#[test]
fn sink_errors_are_recorded_per_object() {
    let dir = backup_dir(&trial(&[("AP", "Breast")]));
    let backup = PatientBackup::open(dir.path()).expect("open backup");
    let request = ConversionRequest::default().with_kinds([ObjectKind::Image]);
    let report = run_conversion(
        &backup,
        &request,
        &ConversionSettings::default(),
        &mut RejectingSink,
    );
    assert!(report.produced.is_empty());
    assert_eq!(report.failures.len(), 2);
    assert!(
        report
            .failures
            .iter()
            .all(|failure| matches!(failure.error, ConvertError::Sink { kind: ObjectKind::Image, .. }))
    );
}
