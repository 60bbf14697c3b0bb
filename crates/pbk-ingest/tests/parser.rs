//! Record parsing and binding over whole record texts.

use pbk_ingest::{FieldReader, RecordKind, RecordNode, parse_record};
use proptest::prelude::*;

#[test]
fn trial_tree_shape() {
    let text = r#"
Trial ={
  Name = "LT BREAST";   // trial name
  PrescriptionList ={
    Prescription ={
      Name = "PTV";
      NumberOfFractions = 25;
    };
  };
  /* beams follow */
  BeamList ={
  };
};
"#;
    let tree = parse_record(text, RecordKind::Trial).expect("parse trial");
    insta::assert_json_snapshot!(tree, @r#"
    {
      "Trial": [
        {
          "Name": "LT BREAST",
          "PrescriptionList": {
            "Prescription": [
              {
                "Name": "PTV",
                "NumberOfFractions": "25"
              }
            ]
          },
          "BeamList": {}
        }
      ]
    }
    "#);
}

#[test]
fn placeholder_blocks_become_lists() {
    let text = "VendorDataList ={\n  #0 ={ Value = 1; };\n  #1 ={ Value = 2; };\n};\n";
    let tree = parse_record(text, RecordKind::Generic).expect("parse");
    let vendor = tree.tree("VendorDataList").expect("container");
    let values: Vec<&str> = vendor
        .list("VendorData")
        .iter()
        .filter_map(|item| item.scalar("Value"))
        .collect();
    assert_eq!(values, vec!["1", "2"]);
}

#[test]
fn generic_records_keep_last_duplicate() {
    let tree = parse_record("Beam ={ Name = a; };\nBeam ={ Name = b; };\n", RecordKind::Generic)
        .expect("parse");
    assert_eq!(tree.len(), 1);
    assert_eq!(
        tree.lookup("Beam.Name").and_then(RecordNode::as_scalar),
        Some("b")
    );
}

proptest! {
    #[test]
    fn scalars_survive_parsing(
        fields in proptest::collection::btree_map("[A-Z][A-Za-z]{0,8}", "[A-Za-z0-9][A-Za-z0-9 ]{0,10}[A-Za-z0-9]", 1..8)
    ) {
        let text: String = fields
            .iter()
            .map(|(key, value)| format!("{key} = \"{value}\";\n"))
            .collect();
        let tree = parse_record(&text, RecordKind::Generic).expect("parse");
        prop_assert_eq!(tree.len(), fields.len());
        for (key, value) in &fields {
            prop_assert_eq!(tree.scalar(key), Some(value.as_str()));
        }
    }

    #[test]
    fn numbers_bind_without_loss(value in -1.0e6f64..1.0e6, count in 0i64..10_000) {
        let text = format!("Dose = {value};\nCount : {count}\n");
        let tree = parse_record(&text, RecordKind::Generic).expect("parse");
        let mut fields = FieldReader::new("Test", &tree);
        prop_assert_eq!(fields.optional_f64("Dose"), Some(value));
        prop_assert_eq!(fields.optional_i64("Count"), Some(count));
        prop_assert!(fields.finish(()).is_ok());
    }

    #[test]
    fn list_lengths_match_source(count in 0usize..12) {
        let text: String = (0..count)
            .map(|i| format!("Poi ={{ Name = \"p{i}\"; }};\n"))
            .collect();
        let tree = parse_record(&text, RecordKind::Points).expect("parse");
        prop_assert_eq!(tree.list("Poi").len(), count);
    }
}
