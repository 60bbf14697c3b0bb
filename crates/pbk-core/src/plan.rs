//! RT plan builder: prescription, fraction scheme, beams and control points.

use pbk_model::tags::{
    APPROVAL_STATUS, BEAM_DOSE, BEAM_LIMITING_DEVICE_ANGLE,
    BEAM_LIMITING_DEVICE_POSITION_SEQUENCE, BEAM_LIMITING_DEVICE_ROTATION_DIRECTION,
    BEAM_LIMITING_DEVICE_SEQUENCE, BEAM_METERSET, BEAM_NAME, BEAM_NUMBER, BEAM_SEQUENCE,
    BEAM_TYPE, CONTROL_POINT_INDEX, CONTROL_POINT_SEQUENCE, CUMULATIVE_DOSE_REFERENCE_COEFFICIENT,
    CUMULATIVE_METERSET_WEIGHT, DEVICE_SERIAL_NUMBER, DOSE_RATE_SET,
    DOSE_REFERENCE_DESCRIPTION, DOSE_REFERENCE_NUMBER, DOSE_REFERENCE_POINT_COORDINATES,
    DOSE_REFERENCE_SEQUENCE, DOSE_REFERENCE_STRUCTURE_TYPE, DOSE_REFERENCE_TYPE,
    FINAL_CUMULATIVE_METERSET_WEIGHT, FLUENCE_MODE, FRACTION_GROUP_NUMBER,
    FRACTION_GROUP_SEQUENCE, GANTRY_ANGLE, GANTRY_ROTATION_DIRECTION, INSTANCE_NUMBER,
    INSTITUTION_NAME, ISOCENTER_POSITION, LEAF_JAW_POSITIONS, LEAF_POSITION_BOUNDARIES,
    MANUFACTURER, MANUFACTURER_MODEL_NAME, NOMINAL_BEAM_ENERGY, NUMBER_OF_BEAMS,
    NUMBER_OF_BLOCKS, NUMBER_OF_BOLI, NUMBER_OF_BRACHY_APPLICATION_SETUPS,
    NUMBER_OF_COMPENSATORS, NUMBER_OF_CONTROL_POINTS, NUMBER_OF_FRACTIONS_PLANNED,
    NUMBER_OF_LEAF_JAW_PAIRS, NUMBER_OF_WEDGES, PATIENT_POSITION, PATIENT_SETUP_NUMBER,
    PATIENT_SETUP_SEQUENCE, PATIENT_SUPPORT_ANGLE, PATIENT_SUPPORT_ROTATION_DIRECTION,
    PLAN_INTENT, PRIMARY_DOSIMETER_UNIT, PRIMARY_FLUENCE_MODE_SEQUENCE, RADIATION_TYPE,
    REFERENCED_BEAM_NUMBER, REFERENCED_BEAM_SEQUENCE, REFERENCED_DOSE_REFERENCE_NUMBER,
    REFERENCED_DOSE_REFERENCE_SEQUENCE, REFERENCED_PATIENT_SETUP_NUMBER,
    REFERENCED_STRUCTURE_SET_SEQUENCE, REFERENCED_TOLERANCE_TABLE_NUMBER, RT_BEAM_LIMITING_DEVICE_TYPE,
    RT_PLAN_DATE, RT_PLAN_GEOMETRY, RT_PLAN_LABEL, RT_PLAN_NAME, RT_PLAN_TIME, SETUP_TECHNIQUE,
    SOURCE_AXIS_DISTANCE, TABLE_TOP_ECCENTRIC_ANGLE, TABLE_TOP_ECCENTRIC_ROTATION_DIRECTION,
    TABLE_TOP_LATERAL_POSITION, TABLE_TOP_LONGITUDINAL_POSITION, TABLE_TOP_PITCH_ANGLE,
    TABLE_TOP_PITCH_ROTATION_DIRECTION, TABLE_TOP_ROLL_ANGLE, TABLE_TOP_ROLL_ROTATION_DIRECTION,
    TABLE_TOP_VERTICAL_POSITION, TARGET_PRESCRIPTION_DOSE, TREATMENT_DELIVERY_TYPE,
    TREATMENT_MACHINE_NAME,
};
use pbk_model::{
    Beam, BeamDelivery, ControlPoint, Dataset, Machine, ObjectKind, Prescription,
    RT_STRUCTURE_SET_STORAGE, Trial, Vr,
};
use pbk_transform::monitor_units;
use tracing::{debug, warn};

use crate::context::PlanContext;
use crate::modules::{ObjectIds, Stamp, put_common_modules, reference_item, truncate};

/// Leaf pair count of the standard 120-leaf collimator.
const STANDARD_LEAF_PAIRS: usize = 60;

pub fn build_plan(ctx: &PlanContext<'_>, trial: &Trial, machines: &[Machine]) -> Dataset {
    let created = Stamp::parse(ctx.plan.write_time_stamp());
    let mut dataset = Dataset::new();
    put_common_modules(
        &mut dataset,
        &ctx.base,
        ObjectKind::Plan,
        ObjectIds {
            instance: &ctx.uids.plan,
            series: &ctx.uids.plan_series,
        },
        &created,
    );

    // RT general plan
    let planned = Stamp::parse(trial.write_time_stamp());
    let name = format!("{} {}", ctx.plan.plan_name, trial.label_suffix());
    dataset
        .put_is(INSTANCE_NUMBER, 1)
        .put_str(RT_PLAN_LABEL, Vr::SH, truncate(&name, 13).trim())
        .put_str(RT_PLAN_NAME, Vr::LO, name.as_str())
        .put_str(RT_PLAN_DATE, Vr::DA, planned.date)
        .put_str(RT_PLAN_TIME, Vr::TM, planned.time)
        .put_str(PLAN_INTENT, Vr::CS, "CURATIVE")
        .put_str(RT_PLAN_GEOMETRY, Vr::CS, "PATIENT")
        .put_sequence(
            REFERENCED_STRUCTURE_SET_SEQUENCE,
            vec![reference_item(
                RT_STRUCTURE_SET_STORAGE,
                &ctx.uids.structure_set,
            )],
        )
        .put_str(APPROVAL_STATUS, Vr::CS, "UNAPPROVED");

    let prescription = trial.beams.first().and_then(|beam| beam.prescription.as_ref());
    if prescription.is_none() {
        warn!(trial = %trial.name, "first beam has no prescription");
    }
    dataset
        .put_sequence(DOSE_REFERENCE_SEQUENCE, dose_references(ctx, prescription))
        .put_sequence(PATIENT_SETUP_SEQUENCE, vec![patient_setup(ctx)])
        .put_sequence(
            FRACTION_GROUP_SEQUENCE,
            vec![fraction_group(trial, prescription, machines)],
        );

    let beams = (1i64..)
        .zip(&trial.beams)
        .map(|(number, beam)| beam_item(ctx, number, beam))
        .collect::<Vec<_>>();
    debug!(trial = %trial.name, beams = beams.len(), "built plan");
    dataset.put_sequence(BEAM_SEQUENCE, beams);
    dataset
}

/// Target site plus the prescription point when the prescription names one.
fn dose_references(ctx: &PlanContext<'_>, prescription: Option<&Prescription>) -> Vec<Dataset> {
    let target_gy = prescription.map_or(0.0, |rx| rx.prescription_dose / 100.0);
    let mut site = Dataset::new();
    site.put_is(DOSE_REFERENCE_NUMBER, 1)
        .put_str(DOSE_REFERENCE_STRUCTURE_TYPE, Vr::CS, "SITE")
        .put_str(
            DOSE_REFERENCE_DESCRIPTION,
            Vr::LO,
            prescription.map(|rx| rx.name.as_str()).unwrap_or_default(),
        )
        .put_str(DOSE_REFERENCE_TYPE, Vr::CS, "TARGET")
        .put_ds(TARGET_PRESCRIPTION_DOSE, target_gy);

    let point_name = prescription
        .and_then(|rx| rx.prescription_point.as_deref())
        .unwrap_or_default();
    let mut point = Dataset::new();
    point
        .put_is(DOSE_REFERENCE_NUMBER, 2)
        .put_str(DOSE_REFERENCE_STRUCTURE_TYPE, Vr::CS, "COORDINATES")
        .put_str(DOSE_REFERENCE_DESCRIPTION, Vr::LO, point_name)
        .put_str(DOSE_REFERENCE_TYPE, Vr::CS, "TARGET")
        .put_ds(TARGET_PRESCRIPTION_DOSE, target_gy);
    match ctx.plan.poi(point_name) {
        Some(poi) => {
            let coordinates = ctx.base.transform.apply_mm(poi.coordinates());
            point.put_ds_values(DOSE_REFERENCE_POINT_COORDINATES, &coordinates);
        }
        None if !point_name.is_empty() => {
            warn!(point = point_name, "prescription point is not a plan point");
        }
        None => {}
    }
    vec![site, point]
}

fn patient_setup(ctx: &PlanContext<'_>) -> Dataset {
    let mut setup = Dataset::new();
    setup
        .put_str(
            PATIENT_POSITION,
            Vr::CS,
            ctx.base.image_set.position().code(),
        )
        .put_is(PATIENT_SETUP_NUMBER, 1)
        .put_str(SETUP_TECHNIQUE, Vr::CS, "ISOCENTRIC");
    setup
}

fn fraction_group(
    trial: &Trial,
    prescription: Option<&Prescription>,
    machines: &[Machine],
) -> Dataset {
    let references = (1i64..)
        .zip(&trial.beams)
        .map(|(number, beam)| {
            let info = &beam.monitor_unit_info;
            let beam_dose = info.prescription_dose.unwrap_or_default() / 100.0
                * info.total_transmission_fraction.unwrap_or_default();
            let mut item = Dataset::new();
            item.put_ds(BEAM_DOSE, round_to(beam_dose, 6))
                .put_ds(BEAM_METERSET, round_to(monitor_units(beam, machines), 3))
                .put_is(REFERENCED_BEAM_NUMBER, number);
            item
        })
        .collect();
    let mut group = Dataset::new();
    group
        .put_is(FRACTION_GROUP_NUMBER, 1)
        .put_is(
            NUMBER_OF_FRACTIONS_PLANNED,
            prescription.map_or(0, |rx| i64::from(rx.number_of_fractions)),
        )
        .put_is(NUMBER_OF_BEAMS, trial.beams.len() as i64)
        .put_is(NUMBER_OF_BRACHY_APPLICATION_SETUPS, 0)
        .put_sequence(REFERENCED_BEAM_SEQUENCE, references);
    group
}

fn beam_item(ctx: &PlanContext<'_>, number: i64, beam: &Beam) -> Dataset {
    let settings = ctx.base.settings;
    let machine = &settings.treatment_machine;
    let delivery = beam.delivery();
    let control_points = beam.control_points();
    let leaf_pairs = control_points
        .first()
        .map_or(0, |cp| cp.leaf_pairs().len());

    let mut fluence = Dataset::new();
    fluence.put_str(FLUENCE_MODE, Vr::CS, "STANDARD");

    let mut devices = vec![device("ASYMX", 1), device("ASYMY", 1)];
    if leaf_pairs > 0 {
        let mut mlc = device("MLCX", leaf_pairs);
        mlc.put_ds_values(LEAF_POSITION_BOUNDARIES, &leaf_boundaries(leaf_pairs));
        devices.push(mlc);
    }

    let mut item = Dataset::new();
    item.put_str(MANUFACTURER, Vr::LO, machine.manufacturer.as_str())
        .put_str(MANUFACTURER_MODEL_NAME, Vr::LO, machine.model_name.as_str())
        .put_str(TREATMENT_MACHINE_NAME, Vr::SH, machine.name.as_str())
        .put_str(DEVICE_SERIAL_NUMBER, Vr::LO, machine.serial_number.as_str())
        .put_str(INSTITUTION_NAME, Vr::LO, settings.institution_name.as_str())
        .put_sequence(PRIMARY_FLUENCE_MODE_SEQUENCE, vec![fluence])
        .put_str(PRIMARY_DOSIMETER_UNIT, Vr::CS, "MU")
        .put_ds(SOURCE_AXIS_DISTANCE, settings.source_axis_distance)
        .put_sequence(BEAM_LIMITING_DEVICE_SEQUENCE, devices)
        .put_is(BEAM_NUMBER, number)
        .put_str(BEAM_NAME, Vr::LO, beam.name.as_str())
        .put_str(
            BEAM_TYPE,
            Vr::CS,
            match delivery {
                BeamDelivery::Static | BeamDelivery::StepAndShoot => "STATIC",
                BeamDelivery::Dynamic => "DYNAMIC",
            },
        )
        .put_str(RADIATION_TYPE, Vr::CS, beam.radiation_type())
        .put_str(TREATMENT_DELIVERY_TYPE, Vr::CS, "TREATMENT")
        .put_is(NUMBER_OF_WEDGES, 0)
        .put_is(NUMBER_OF_COMPENSATORS, 0)
        .put_is(NUMBER_OF_BOLI, 0)
        .put_is(NUMBER_OF_BLOCKS, 0)
        .put_ds(FINAL_CUMULATIVE_METERSET_WEIGHT, 1.0);

    let sequence = control_point_sequence(ctx, beam, delivery);
    item.put_is(NUMBER_OF_CONTROL_POINTS, sequence.len() as i64)
        .put_sequence(CONTROL_POINT_SEQUENCE, sequence)
        .put_is(REFERENCED_PATIENT_SETUP_NUMBER, 1)
        .put_is(REFERENCED_TOLERANCE_TABLE_NUMBER, 0);
    item
}

fn device(kind: &str, pairs: usize) -> Dataset {
    let mut item = Dataset::new();
    item.put_str(RT_BEAM_LIMITING_DEVICE_TYPE, Vr::CS, kind)
        .put_is(NUMBER_OF_LEAF_JAW_PAIRS, pairs as i64);
    item
}

/// Leaf boundaries in mm, `pairs + 1` values.
///
/// The standard collimator has 10 mm outer leaves and 5 mm leaves over the
/// central 20 cm; any other leaf count is spread evenly over 40 cm.
pub fn leaf_boundaries(pairs: usize) -> Vec<f64> {
    if pairs == STANDARD_LEAF_PAIRS {
        let outer_low = (0..10).map(|i| -200.0 + 10.0 * f64::from(i));
        let inner = (0..40).map(|i| -100.0 + 5.0 * f64::from(i));
        let outer_high = (0..=10).map(|i| 100.0 + 10.0 * f64::from(i));
        return outer_low.chain(inner).chain(outer_high).collect();
    }
    let width = 400.0 / pairs as f64;
    (0..=pairs).map(|i| -200.0 + width * i as f64).collect()
}

fn control_point_sequence(ctx: &PlanContext<'_>, beam: &Beam, delivery: BeamDelivery) -> Vec<Dataset> {
    let control_points = beam.control_points();
    let total: f64 = control_points.iter().map(|cp| cp.weight).sum();
    let isocenter = beam
        .isocenter_name
        .as_deref()
        .and_then(|name| ctx.plan.poi(name))
        .map(|poi| ctx.base.transform.apply_mm(poi.coordinates()));
    if isocenter.is_none() {
        warn!(
            beam = %beam.name,
            isocenter = beam.isocenter_name.as_deref().unwrap_or_default(),
            "isocenter is not a plan point"
        );
    }
    let settings = ctx.base.settings;
    let energy = beam.nominal_energy().unwrap_or_default();

    let mut sequence = Vec::new();
    let mut cumulative = 0.0;
    for cp in control_points {
        let mut item = control_point(cp, isocenter.as_ref());
        item.put_ds(NOMINAL_BEAM_ENERGY, energy)
            .put_ds(DOSE_RATE_SET, settings.dose_rate);
        put_weight(&mut item, sequence.len(), normalized(cumulative, total));
        cumulative += cp.weight;
        if delivery == BeamDelivery::StepAndShoot {
            let mut closing = item.clone();
            put_weight(&mut closing, sequence.len() + 1, normalized(cumulative, total));
            sequence.push(item);
            sequence.push(closing);
        } else {
            sequence.push(item);
        }
    }
    if delivery != BeamDelivery::StepAndShoot
        && let Some(last) = sequence.last()
    {
        let mut closing = last.clone();
        put_weight(&mut closing, sequence.len(), 1.0);
        sequence.push(closing);
    }
    sequence
}

/// Cumulative weight as a fraction of the beam total; zero when the total is.
fn normalized(cumulative: f64, total: f64) -> f64 {
    if total > 0.0 {
        round_to(cumulative / total, 4)
    } else {
        0.0
    }
}

fn put_weight(item: &mut Dataset, index: usize, weight: f64) {
    let mut reference = Dataset::new();
    reference
        .put_ds(CUMULATIVE_DOSE_REFERENCE_COEFFICIENT, weight)
        .put_is(REFERENCED_DOSE_REFERENCE_NUMBER, 1);
    item.put_is(CONTROL_POINT_INDEX, index as i64)
        .put_ds(CUMULATIVE_METERSET_WEIGHT, weight)
        .put_sequence(REFERENCED_DOSE_REFERENCE_SEQUENCE, vec![reference]);
}

fn control_point(cp: &ControlPoint, isocenter: Option<&[f64; 3]>) -> Dataset {
    let mut positions = vec![
        jaw("ASYMX", [-10.0 * cp.left_jaw_position, 10.0 * cp.right_jaw_position]),
        jaw("ASYMY", [-10.0 * cp.bottom_jaw_position, 10.0 * cp.top_jaw_position]),
    ];
    let pairs = cp.leaf_pairs();
    if !pairs.is_empty() {
        let bank_a = pairs.iter().rev().map(|(a, _)| round_to(-10.0 * a, 1));
        let bank_b = pairs.iter().rev().map(|(_, b)| round_to(10.0 * b, 1));
        let leaves: Vec<f64> = bank_a.chain(bank_b).collect();
        let mut mlc = Dataset::new();
        mlc.put_str(RT_BEAM_LIMITING_DEVICE_TYPE, Vr::CS, "MLCX")
            .put_ds_values(LEAF_JAW_POSITIONS, &leaves);
        positions.push(mlc);
    }

    let mut item = Dataset::new();
    item.put_sequence(BEAM_LIMITING_DEVICE_POSITION_SEQUENCE, positions)
        .put_ds(GANTRY_ANGLE, cp.gantry)
        .put_str(GANTRY_ROTATION_DIRECTION, Vr::CS, "NONE")
        .put_ds(BEAM_LIMITING_DEVICE_ANGLE, cp.collimator)
        .put_str(BEAM_LIMITING_DEVICE_ROTATION_DIRECTION, Vr::CS, "NONE")
        .put_ds(PATIENT_SUPPORT_ANGLE, support_angle(cp.couch))
        .put_str(PATIENT_SUPPORT_ROTATION_DIRECTION, Vr::CS, "NONE")
        .put_ds(TABLE_TOP_ECCENTRIC_ANGLE, 0.0)
        .put_str(TABLE_TOP_ECCENTRIC_ROTATION_DIRECTION, Vr::CS, "NONE")
        .put_empty(TABLE_TOP_VERTICAL_POSITION, Vr::DS)
        .put_empty(TABLE_TOP_LONGITUDINAL_POSITION, Vr::DS)
        .put_empty(TABLE_TOP_LATERAL_POSITION, Vr::DS)
        .put_f32(TABLE_TOP_PITCH_ANGLE, 0.0)
        .put_str(TABLE_TOP_PITCH_ROTATION_DIRECTION, Vr::CS, "NONE")
        .put_f32(TABLE_TOP_ROLL_ANGLE, 0.0)
        .put_str(TABLE_TOP_ROLL_ROTATION_DIRECTION, Vr::CS, "NONE");
    match isocenter {
        Some(position) => item.put_ds_values(ISOCENTER_POSITION, position),
        None => item.put_empty(ISOCENTER_POSITION, Vr::DS),
    };
    item
}

fn jaw(kind: &str, positions: [f64; 2]) -> Dataset {
    let mut item = Dataset::new();
    item.put_str(RT_BEAM_LIMITING_DEVICE_TYPE, Vr::CS, kind)
        .put_ds_values(LEAF_JAW_POSITIONS, &positions);
    item
}

/// Couch angle in the output convention: planning angles are mirrored.
pub fn support_angle(couch: f64) -> f64 {
    if couch > 0.0 {
        360.0 - couch
    } else if couch < 0.0 {
        360.0 + couch
    } else {
        0.0
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixture;

    fn plan_for(fixture: &Fixture) -> Dataset {
        let plan_uids = fixture.plan_uids(Some(&fixture.trial));
        let ctx = fixture.plan_context(&plan_uids);
        build_plan(&ctx, &fixture.trial, &fixture.machines)
    }

    fn texts(item: &Dataset, tag: pbk_model::Tag) -> Vec<String> {
        item.texts(tag).map(<[String]>::to_vec).unwrap_or_default()
    }

    #[test]
    fn general_plan_and_prescription() {
        let fixture = Fixture::new();
        let dataset = plan_for(&fixture);
        assert_eq!(dataset.text(RT_PLAN_LABEL), Some("Breast 1"));
        assert_eq!(dataset.text(RT_PLAN_DATE), Some("20200103"));
        assert_eq!(dataset.text(RT_PLAN_TIME), Some("040506"));

        let references = dataset.items(DOSE_REFERENCE_SEQUENCE).expect("dose references");
        assert_eq!(references.len(), 2);
        assert_eq!(references[0].text(DOSE_REFERENCE_DESCRIPTION), Some("Rx1"));
        assert_eq!(
            references[0].text(TARGET_PRESCRIPTION_DOSE),
            Some("2")
        );
        assert_eq!(
            texts(&references[1], DOSE_REFERENCE_POINT_COORDINATES),
            vec!["5", "-5", "-10"]
        );

        let group = &dataset.items(FRACTION_GROUP_SEQUENCE).expect("fraction group")[0];
        assert_eq!(group.text(NUMBER_OF_FRACTIONS_PLANNED), Some("10"));
        let beam = &group.items(REFERENCED_BEAM_SEQUENCE).expect("beams")[0];
        assert_eq!(beam.text(BEAM_DOSE), Some("2"));
        assert_eq!(beam.text(BEAM_METERSET), Some("200"));
    }

    #[test]
    fn static_beam_gets_closing_control_point() {
        let fixture = Fixture::new();
        let dataset = plan_for(&fixture);
        let beam = &dataset.items(BEAM_SEQUENCE).expect("beam sequence")[0];
        assert_eq!(beam.text(BEAM_TYPE), Some("STATIC"));
        assert_eq!(beam.text(NUMBER_OF_CONTROL_POINTS), Some("2"));

        let devices = beam.items(BEAM_LIMITING_DEVICE_SEQUENCE).expect("devices");
        assert_eq!(devices.len(), 3);
        assert_eq!(texts(&devices[2], LEAF_POSITION_BOUNDARIES), vec!["-200", "0", "200"]);

        let points = beam.items(CONTROL_POINT_SEQUENCE).expect("control points");
        let weights: Vec<&str> = points
            .iter()
            .filter_map(|cp| cp.text(CUMULATIVE_METERSET_WEIGHT))
            .collect();
        assert_eq!(weights, vec!["0", "1"]);
        assert_eq!(points[0].text(PATIENT_SUPPORT_ANGLE), Some("350"));
        assert_eq!(texts(&points[0], ISOCENTER_POSITION), vec!["5", "-5", "-10"]);

        let positions = points[0]
            .items(BEAM_LIMITING_DEVICE_POSITION_SEQUENCE)
            .expect("positions");
        assert_eq!(texts(&positions[0], LEAF_JAW_POSITIONS), vec!["-50", "50"]);
        assert_eq!(texts(&positions[1], LEAF_JAW_POSITIONS), vec!["-40", "40"]);
        // pairs (1, 2) and (3, 4), banks reversed
        assert_eq!(
            texts(&positions[2], LEAF_JAW_POSITIONS),
            vec!["-30", "-10", "40", "20"]
        );
    }

    #[test]
    fn step_and_shoot_doubles_control_points() {
        let mut fixture = Fixture::new();
        let beam = &mut fixture.trial.beams[0];
        beam.set_beam_type = Some("Step & Shoot MLC".to_string());
        let manager = &mut beam.cp_managers[0];
        let mut second = manager.control_points[0].clone();
        second.weight = 3.0;
        manager.control_points.push(second);

        let dataset = plan_for(&fixture);
        let beam = &dataset.items(BEAM_SEQUENCE).expect("beam sequence")[0];
        assert_eq!(beam.text(NUMBER_OF_CONTROL_POINTS), Some("4"));
        let points = beam.items(CONTROL_POINT_SEQUENCE).expect("control points");
        let weights: Vec<&str> = points
            .iter()
            .filter_map(|cp| cp.text(CUMULATIVE_METERSET_WEIGHT))
            .collect();
        assert_eq!(weights, vec!["0", "0.25", "0.25", "1"]);
        let indices: Vec<&str> = points
            .iter()
            .filter_map(|cp| cp.text(CONTROL_POINT_INDEX))
            .collect();
        assert_eq!(indices, vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn unresolved_prescription_still_builds() {
        let mut fixture = Fixture::new();
        fixture.trial.beams[0].prescription = None;
        let dataset = plan_for(&fixture);
        let group = &dataset.items(FRACTION_GROUP_SEQUENCE).expect("fraction group")[0];
        assert_eq!(group.text(NUMBER_OF_FRACTIONS_PLANNED), Some("0"));
        let beam = &group.items(REFERENCED_BEAM_SEQUENCE).expect("beams")[0];
        assert_eq!(beam.text(BEAM_METERSET), Some("0"));
    }

    #[test]
    fn standard_collimator_boundaries() {
        let boundaries = leaf_boundaries(60);
        assert_eq!(boundaries.len(), 61);
        assert_eq!(boundaries[0], -200.0);
        assert_eq!(boundaries[10], -100.0);
        assert_eq!(boundaries[11], -95.0);
        assert_eq!(boundaries[50], 100.0);
        assert_eq!(boundaries[60], 200.0);
    }

    #[test]
    fn couch_angles_mirror() {
        assert_eq!(support_angle(10.0), 350.0);
        assert_eq!(support_angle(-10.0), 350.0);
        assert_eq!(support_angle(0.0), 0.0);
    }
}
