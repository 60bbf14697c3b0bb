//! Loading a small on-disk patient backup.

use std::fs;
use std::path::Path;

use pbk_ingest::{IngestError, PatientBackup, RecordKind, parse_record_file};
use tempfile::TempDir;

const PATIENT: &str = r#"// Patient file
LastName = "DOE";
FirstName = "JANE";
MiddleName = "";
MedicalRecordNumber = "00003030";
RadiationOncologist = "SMITH";
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
    ObjectVersion ={
      WriteTimeStamp = "2019-03-05 10:11:12";
    };
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
modality : CT
";

const IMAGE_INFO: &str = r#"ImageInfo ={
  SliceNumber = 1;
  TablePosition = 1.0;
  InstanceUID = "1.2.3.1";
};
ImageInfo ={
  SliceNumber = 2;
  TablePosition = 0.0;
  InstanceUID = "1.2.3.2";
};
"#;

const POINTS: &str = r#"Poi ={
  Name = "iso";
  XCoord = 0.5;
  YCoord = -0.5;
  ZCoord = 1.0;
  CoordSys = "CT";
};
"#;

const ROI: &str = r#"// Region of interest file
roi={
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

const TRIAL: &str = r#"Trial ={
  Name = "sMLC";
  DoseGridVoxelSizeX = 1.0;
  DoseGridVoxelSizeY = 1.0;
  DoseGridVoxelSizeZ = 1.0;
  DoseGridDimensionX = 2;
  DoseGridDimensionY = 2;
  DoseGridDimensionZ = 2;
  DoseGridOriginX = -1.0;
  DoseGridOriginY = -1.0;
  DoseGridOriginZ = 0.0;
  PrescriptionList ={
    Prescription ={
      Name = "Breast";
      PrescriptionDose = 200;
      NumberOfFractions = 25;
      PrescriptionPoint = "iso";
    };
  };
  BeamList ={
    Beam ={
      Name = "Med Lt Brst";
      IsocenterName = "iso";
      PrescriptionName = "Breast";
      MachineNameAndVersion = "EX_7p4: 2006-03-06 11:59:38";
      Modality = "Photons";
      MachineEnergyName = "6X";
      SetBeamType = "Step & Shoot MLC";
      SSD = "N/A";
      CPManager ={
        CPManagerObject ={
          NumberOfControlPoints = 1;
          ControlPointList ={
            #0 ={
              Gantry = 300;
              Couch = 0;
              Collimator = 0;
              LeftJawPosition = 5;
              RightJawPosition = 5;
              TopJawPosition = 10;
              BottomJawPosition = 10;
              Weight = 1;
              WedgeContext ={
                WedgeName = "No Wedge";
                Angle = "No Wedge";
              };
              MLCLeafPositions ={
                RawData ={
                  NumberOfPoints = 2;
                  Points[] ={
                    1.5, 2.5,
                    3.0, 4.0
                  };
                };
              };
            };
          };
        };
      };
      MonitorUnitInfo ={
        PrescriptionDose = 200;
        NormalizedDose = 1.0;
        CollimatorOutputFactor = 1.0;
        TotalTransmissionFraction = 1.0;
      };
      DoseVolume = \XDR:0\;
    };
  };
};
"#;

const MACHINES: &str = r#"#0 ={
  Name = "EX_7p4";
  MachineType = "Varian";
  SAD = 100;
  PhotonEnergyList ={
    MachineEnergy ={
      Value = 6;
      Id = 0;
      Name = "6X";
      PhysicsData ={
        OutputFactor ={
          DosePerMuAtCalibration = 0.667;
        };
      };
    };
  };
};
"#;

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write fixture");
}

fn fixture() -> TempDir {
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
    write(&plan.join("plan.PlanInfo"), "PlanName = \"LT BREAST\";\n");
    write(&plan.join("plan.PatientSetup"), "Position = \"On back (supine)\";\n");
    write(&plan.join("plan.Points"), POINTS);
    write(&plan.join("plan.roi"), ROI);
    write(&plan.join("plan.Trial"), TRIAL);
    write(&plan.join("plan.Pinnacle.Machines"), MACHINES);
    dir
}

#[test]
fn opens_backup_and_loads_image_set() {
    let dir = fixture();
    let backup = PatientBackup::open(dir.path()).expect("open backup");
    assert_eq!(backup.patient().medical_record_number, "00003030");
    assert_eq!(backup.patient().person_name(), "DOE^JANE^");
    assert_eq!(backup.image_set_ids(), vec![0]);
    assert_eq!(backup.plan_ids(), vec![0]);

    let image_set = backup.load_image_set(0).expect("image set");
    assert_eq!(image_set.header.x_dim, 2);
    assert_eq!(image_set.header.couch_height, Some(10.0));
    let order: Vec<i64> = image_set
        .slices
        .iter()
        .map(|slice| slice.info.slice_number)
        .collect();
    assert_eq!(order, vec![2, 1]);
    assert!(image_set.info.is_none());

    let volume = backup.load_volume(&image_set, 1000).expect("volume");
    assert_eq!(volume.samples.len(), 8);
    assert_eq!(volume.slice(1), Some(&[40, 50, 60, 70][..]));
}

#[test]
fn loads_plan_trials_and_machines() {
    let dir = fixture();
    let backup = PatientBackup::open(dir.path()).expect("open backup");

    let plan = backup.load_plan(0).expect("plan");
    assert_eq!(plan.plan_name, "LT BREAST");
    assert_eq!(plan.primary_image_set_id, Some(0));
    assert_eq!(plan.poi("iso").map(|poi| poi.coordinates()), Some([0.5, -0.5, 1.0]));
    assert_eq!(plan.rois.len(), 1);
    assert_eq!(plan.rois[0].curves[0].points.len(), 6);

    let trials = backup.load_trials(0).expect("trials");
    assert_eq!(trials.len(), 1);
    let trial = &trials[0];
    assert_eq!(trial.dose_grid.voxel_count(), 8);
    assert_eq!(trial.prescriptions[0].number_of_fractions, 25);
    let beam = &trial.beams[0];
    assert_eq!(beam.name, "Med Lt Brst");
    assert_eq!(beam.ssd, Some(0.0));
    assert_eq!(beam.dose_volume_index(), Some(0));
    let point = &beam.control_points()[0];
    assert_eq!(point.gantry, 300.0);
    assert_eq!(point.leaf_pairs(), vec![(1.5, 2.5), (3.0, 4.0)]);
    assert!(point.modifiers.is_empty());
    assert_eq!(point.wedge.as_ref().and_then(|wedge| wedge.angle), None);

    let machines = backup.load_machines(0).expect("machines");
    assert_eq!(machines[0].name, "EX_7p4");
    assert_eq!(machines[0].dose_per_mu(6.0, false), Some(0.667));
}

#[test]
fn unknown_ids_and_missing_files_are_errors() {
    let dir = fixture();
    let backup = PatientBackup::open(dir.path()).expect("open backup");
    assert!(matches!(
        backup.load_plan(7),
        Err(IngestError::PlanNotFound { id: 7 })
    ));
    assert!(matches!(
        backup.load_image_set(3),
        Err(IngestError::ImageSetNotFound { id: 3 })
    ));

    fs::remove_file(dir.path().join("Plan_0/plan.Trial")).expect("remove trial");
    assert!(matches!(
        backup.load_trials(0),
        Err(IngestError::DataFileMissing { .. })
    ));

    fs::remove_file(dir.path().join("Plan_0/plan.Pinnacle.Machines")).expect("remove machines");
    assert!(backup.load_machines(0).expect("machines").is_empty());
}

#[test]
fn malformed_record_names_the_file() {
    let dir = fixture();
    let path = dir.path().join("Plan_0/plan.Trial");
    write(&path, "Trial ={\n  Name = \"x\";\n};\n};\n");
    let error = parse_record_file(&path, RecordKind::Trial).unwrap_err();
    match error {
        IngestError::MalformedRecord { path: reported, source } => {
            assert_eq!(reported, path);
            assert_eq!(source.line_number, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn binding_failure_lists_fields() {
    let dir = fixture();
    write(
        &dir.path().join("ImageSet_0.header"),
        "x_dim = 2;\ny_dim = two;\n",
    );
    let backup = PatientBackup::open(dir.path()).expect("open backup");
    let error = backup.load_image_set(0).unwrap_err();
    let IngestError::Bind { source, .. } = error else {
        panic!("expected a bind error");
    };
    assert_eq!(source.record, "ImageSet.header");
    let paths: Vec<&str> = source.problems.iter().map(|p| p.path.as_str()).collect();
    assert!(paths.contains(&"y_dim"));
    assert!(paths.contains(&"z_dim"));
    assert!(paths.contains(&"x_pixdim"));
}
