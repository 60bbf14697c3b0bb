//! Serialization and settings behavior of the model types.

use pbk_model::{
    ConversionSettings, ImageSetSummary, PatientRecord, PlanSummary, SliceMatchTolerance,
};

fn patient() -> PatientRecord {
    PatientRecord {
        last_name: Some("LAST".to_string()),
        first_name: Some("FRSTNAM".to_string()),
        middle_name: None,
        medical_record_number: "00003030".to_string(),
        radiation_oncologist: None,
        gender: Some("Female".to_string()),
        date_of_birth: Some("1950-01-01".to_string()),
        image_sets: vec![ImageSetSummary {
            image_set_id: 0,
            image_name: Some("ImageSet_0".to_string()),
            exam_id: Some("12636".to_string()),
            study_id: None,
            modality: Some("CT".to_string()),
            number_of_images: Some(98),
            scan_time_from_scanner: None,
        }],
        plans: vec![PlanSummary {
            plan_id: 0,
            plan_name: Some("LT BREAST".to_string()),
            primary_ct_image_set_id: Some(0),
            primary_image_type: Some("Images".to_string()),
            tool_type: None,
            pinnacle_version_description: None,
            object_version: None,
        }],
        object_version: None,
    }
}

#[test]
fn patient_identity_helpers() {
    let patient = patient();
    assert_eq!(patient.person_name(), "LAST^FRSTNAM^");
    assert_eq!(patient.sex_code().as_deref(), Some("F"));
    assert!(patient.image_set(0).is_some());
    assert!(patient.plan(1).is_none());
}

#[test]
fn patient_serializes() {
    let json = serde_json::to_string(&patient()).expect("serialize patient");
    let round: PatientRecord = serde_json::from_str(&json).expect("deserialize patient");
    assert_eq!(round, patient());
}

#[test]
fn settings_load_partial_toml() {
    let text = r#"
        institution_name = "Radiation Oncology"
        window_width = 350.0

        [treatment_machine]
        serial_number = "1234"

        [slice_match]
        mode = "absolute"
        cm = 0.1
    "#;
    let settings: ConversionSettings = toml::from_str(text).expect("parse settings");
    assert_eq!(settings.institution_name, "Radiation Oncology");
    assert_eq!(settings.window_width, 350.0);
    assert_eq!(settings.window_center, 20.0);
    assert_eq!(settings.treatment_machine.serial_number, "1234");
    assert_eq!(settings.treatment_machine.name, "TB1");
    assert_eq!(settings.slice_match, SliceMatchTolerance::Absolute { cm: 0.1 });
    assert!(settings.validate().is_ok());
}
