//! Kind-specific cleanup applied to a freshly parsed record tree.
//!
//! Raw numeric blocks become number lists, and a few shapes the planning
//! system writes inconsistently are brought into one form before binding.

use tracing::{debug, warn};

use crate::kind::RecordKind;
use crate::tree::{RecordNode, RecordTree};

pub(crate) fn normalize(kind: RecordKind, root: &mut RecordTree) {
    match kind {
        RecordKind::Trial => {
            for trial in root.items_mut("Trial") {
                normalize_trial(trial);
            }
        }
        RecordKind::Roi => normalize_rois(root),
        _ => {}
    }
}

fn normalize_trial(trial: &mut RecordTree) {
    let Some(beam_list) = trial.tree_mut("BeamList") else {
        return;
    };
    for beam in beam_list.items_mut("Beam") {
        coerce_numeric(beam, "SSD");
        coerce_numeric(beam, "AvgSSD");
        if let Some(manager) = beam.tree_mut("CPManager") {
            wrap_single_manager(manager);
            for object in manager.items_mut("CPManagerObject") {
                normalize_control_points(object);
            }
        }
    }
}

/// Non-numeric distances (`"N/A"` and the like) read as zero.
fn coerce_numeric(tree: &mut RecordTree, key: &str) {
    let invalid = tree
        .scalar(key)
        .is_some_and(|value| value.trim().parse::<f64>().is_err());
    if invalid {
        debug!(field = key, "non-numeric distance replaced with 0");
        tree.insert(key, RecordNode::Scalar("0".to_string()));
    }
}

/// Older trials write the control-point manager's fields directly instead of
/// inside a `CPManagerObject` block.
fn wrap_single_manager(manager: &mut RecordTree) {
    if manager.get("CPManagerObject").is_some() || manager.is_empty() {
        return;
    }
    let object = manager.take();
    manager.push_item("CPManagerObject", object);
}

fn normalize_control_points(manager: &mut RecordTree) {
    let Some(list) = manager.tree_mut("ControlPointList") else {
        return;
    };
    for point in list.items_mut("ControlPoint") {
        if let Some(raw) = point
            .tree_mut("MLCLeafPositions")
            .and_then(|leaves| leaves.tree_mut("RawData"))
        {
            numbers_in_place(raw, "Points");
        }
        normalize_modifiers(point);
    }
}

fn normalize_modifiers(point: &mut RecordTree) {
    let has_modifiers = point
        .tree("ModifierList")
        .is_some_and(|list| !list.is_empty());
    if !has_modifiers {
        let mut empty = RecordTree::new();
        empty.insert("BeamModifier", RecordNode::List(Vec::new()));
        point.insert("ModifierList", RecordNode::Tree(empty));
        return;
    }
    let Some(list) = point.tree_mut("ModifierList") else {
        return;
    };
    for modifier in list.items_mut("BeamModifier") {
        let Some(contours) = modifier.tree_mut("ContourList") else {
            continue;
        };
        for painter in contours.items_mut("CurvePainter") {
            if let Some(raw) = painter
                .tree_mut("Curve")
                .and_then(|curve| curve.tree_mut("RawData"))
            {
                numbers_in_place(raw, "Points");
            }
        }
    }
}

fn normalize_rois(root: &mut RecordTree) {
    for roi in root.items_mut("roi") {
        for curve in roi.items_mut("curve") {
            numbers_in_place(curve, "points");
        }
    }
    if let Some(rois) = root.list_mut("roi") {
        rois.retain(|roi| {
            let keep = !roi.list("curve").is_empty();
            if !keep {
                debug!(roi = roi.scalar("name").unwrap_or_default(), "dropping roi without curves");
            }
            keep
        });
    }
}

/// Replaces a raw text field with the numbers it holds.
fn numbers_in_place(tree: &mut RecordTree, key: &str) {
    let Some(text) = tree.scalar(key) else {
        return;
    };
    let numbers = parse_numbers(key, text);
    tree.insert(key, RecordNode::Numbers(numbers));
}

/// Splits on commas and whitespace; unreadable tokens are skipped.
pub(crate) fn parse_numbers(field: &str, text: &str) -> Vec<f64> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(field, token, "skipping non-numeric token");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_record;

    const TRIAL: &str = r#"
Trial ={
  Name = "sMLC";
  BeamList ={
    Beam ={
      Name = "Med Lt Brst";
      SSD = "N/A";
      CPManager ={
        NumberOfControlPoints = 1;
        ControlPointList ={
          #0 ={
            Gantry = 300;
            MLCLeafPositions ={
              RawData ={
                NumberOfPoints = 2;
                Points[] ={
                  -1.5, 2.0,
                  0.5,1
                };
              };
            };
          };
        };
      };
    };
  };
};
"#;

    #[test]
    fn trial_beams_are_cleaned() {
        let root = parse_record(TRIAL, RecordKind::Trial).unwrap();
        let trial = &root.list("Trial")[0];
        let beam = &trial.tree("BeamList").unwrap().list("Beam")[0];
        assert_eq!(beam.scalar("SSD"), Some("0"));

        let managers = beam.tree("CPManager").unwrap().list("CPManagerObject");
        assert_eq!(managers.len(), 1);
        let points = managers[0].tree("ControlPointList").unwrap().list("ControlPoint");
        assert_eq!(points.len(), 1);
        assert_eq!(
            points[0].lookup("MLCLeafPositions.RawData.Points"),
            Some(&RecordNode::Numbers(vec![-1.5, 2.0, 0.5, 1.0]))
        );
        let modifiers = points[0].tree("ModifierList").unwrap();
        assert_eq!(modifiers.list("BeamModifier").len(), 0);
        assert!(modifiers.get("BeamModifier").is_some());
    }

    #[test]
    fn empty_rois_are_dropped() {
        let text = r#"
roi={ name: PTV;
  curve={ num_points = 1; points={ 1.0 2.0 3.0 }; };
};
roi={ name: Empty; };
"#;
        let root = parse_record(text, RecordKind::Roi).unwrap();
        let rois = root.list("roi");
        assert_eq!(rois.len(), 1);
        assert_eq!(rois[0].scalar("name"), Some("PTV"));
        assert_eq!(
            rois[0].list("curve")[0].get("points"),
            Some(&RecordNode::Numbers(vec![1.0, 2.0, 3.0]))
        );
    }

    #[test]
    fn bad_tokens_are_skipped() {
        assert_eq!(parse_numbers("Points", "1, x, 2\n3"), vec![1.0, 2.0, 3.0]);
    }
}
