//! Treatment machine model (`plan.Pinnacle.Machines`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineEnergy {
    pub value: Option<f64>,
    pub id: Option<i64>,
    pub name: Option<String>,
    /// Calibrated dose per monitor unit (cGy/MU).
    pub dose_per_mu_at_calibration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub name: String,
    pub machine_type: Option<String>,
    pub sad: Option<f64>,
    pub photon_energies: Vec<MachineEnergy>,
    pub electron_energies: Vec<MachineEnergy>,
}

impl Machine {
    /// Calibration dose per MU for the given nominal energy.
    pub fn dose_per_mu(&self, energy: f64, electrons: bool) -> Option<f64> {
        let energies = if electrons {
            &self.electron_energies
        } else {
            &self.photon_energies
        };
        energies
            .iter()
            .find(|candidate| {
                candidate
                    .value
                    .is_some_and(|value| (value - energy).abs() < 1e-6)
            })
            .and_then(|candidate| candidate.dose_per_mu_at_calibration)
    }
}

/// Picks the machine named `name`, or the first machine when it is unknown.
pub fn select_machine<'a>(machines: &'a [Machine], name: Option<&str>) -> Option<&'a Machine> {
    name.and_then(|name| machines.iter().find(|machine| machine.name == name))
        .or_else(|| machines.first())
}
