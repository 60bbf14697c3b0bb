//! Prescription linking and trial splitting.
//!
//! A trial may hold beams delivering several prescriptions; each output
//! plan needs exactly one. Trials are linked, filtered and split into new
//! values, the input is never modified.

use pbk_model::{Beam, Trial};
use tracing::{debug, info, warn};

/// Copies of the trial's beams with their declared prescription attached.
pub fn link_prescriptions(trial: &Trial) -> Trial {
    let beams = trial
        .beams
        .iter()
        .map(|beam| {
            let mut linked = beam.clone();
            linked.prescription = beam
                .prescription_name
                .as_deref()
                .and_then(|name| trial.prescription(name))
                .cloned();
            if linked.prescription.is_none() {
                warn!(
                    trial = %trial.name,
                    beam = %beam.name,
                    prescription = beam.prescription_name.as_deref().unwrap_or_default(),
                    "beam prescription does not resolve"
                );
            }
            linked
        })
        .collect();
    Trial {
        beams,
        ..trial.clone()
    }
}

/// Splits one linked trial into one trial per distinct prescription.
///
/// A trial whose beams share one prescription comes back unchanged. Otherwise
/// each copy is named `{trial}_{prescription}` and keeps only that
/// prescription's beams, in their original order.
pub fn split_trial(trial: &Trial) -> Vec<Trial> {
    let groups = prescription_groups(&trial.beams);
    if groups.len() <= 1 {
        return vec![trial.clone()];
    }
    let names: Vec<&str> = groups.iter().map(|(name, _)| name.as_str()).collect();
    debug!(trial = %trial.name, prescriptions = ?names, "splitting trial");
    groups
        .into_iter()
        .map(|(name, beams)| Trial {
            name: format!("{}_{name}", trial.name),
            beams,
            ..trial.clone()
        })
        .collect()
}

/// Links, filters and splits a plan's trials, then numbers them from 0.
///
/// Imaging trials and imaging beams are dropped, as are trials left
/// without beams.
pub fn prepare_trials(trials: &[Trial]) -> Vec<Trial> {
    let mut prepared = Vec::new();
    for trial in trials {
        if trial.is_imaging() {
            debug!(trial = %trial.name, "skipping imaging trial");
            continue;
        }
        let linked = link_prescriptions(trial);
        let beams: Vec<Beam> = linked
            .beams
            .iter()
            .filter(|beam| !beam.is_imaging())
            .cloned()
            .collect();
        if beams.is_empty() {
            warn!(trial = %trial.name, "trial has no treatment beams");
            continue;
        }
        let filtered = Trial { beams, ..linked };
        prepared.extend(split_trial(&filtered));
    }
    for (id, trial) in prepared.iter_mut().enumerate() {
        trial.id = id;
    }
    info!(input = trials.len(), output = prepared.len(), "prepared trials");
    prepared
}

/// Beams grouped by prescription name in order of first appearance.
fn prescription_groups(beams: &[Beam]) -> Vec<(String, Vec<Beam>)> {
    let mut groups: Vec<(String, Vec<Beam>)> = Vec::new();
    for beam in beams {
        let name = prescription_key(beam);
        match groups.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, members)) => members.push(beam.clone()),
            None => groups.push((name, vec![beam.clone()])),
        }
    }
    groups
}

fn prescription_key(beam: &Beam) -> String {
    beam.prescription
        .as_ref()
        .map(|prescription| prescription.name.clone())
        .or_else(|| beam.prescription_name.clone())
        .unwrap_or_default()
}
