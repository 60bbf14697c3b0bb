//! Total dose reconstruction from per-beam binary dose files.
//!
//! Each beam's file holds big-endian `f32` values, one per voxel in X, then
//! Y, then Z order, scaled per monitor unit. Beam contributions are summed
//! in Gy over the trial's dose grid.

use std::path::{Path, PathBuf};

use pbk_model::{Beam, DoseGridGeometry, Machine, select_machine};
use tracing::{debug, info, warn};

use crate::error::{DoseError, Result};

/// Supplies the raw per-beam dose arrays.
pub trait DoseSource {
    fn read_beam_dose(&self, beam: &Beam) -> Result<Vec<f32>>;
}

/// Reads `plan.Trial.binary.NNN` files from one plan directory.
#[derive(Debug, Clone)]
pub struct BinaryDoseFiles {
    plan_dir: PathBuf,
}

impl BinaryDoseFiles {
    pub fn new(plan_dir: impl Into<PathBuf>) -> Self {
        Self {
            plan_dir: plan_dir.into(),
        }
    }

    pub fn plan_dir(&self) -> &Path {
        &self.plan_dir
    }

    /// Path of the file named by `index`.
    pub fn file_for(&self, index: u32) -> PathBuf {
        self.plan_dir.join(format!("plan.Trial.binary.{index:03}"))
    }
}

impl DoseSource for BinaryDoseFiles {
    fn read_beam_dose(&self, beam: &Beam) -> Result<Vec<f32>> {
        let index = beam
            .dose_volume_index()
            .ok_or_else(|| DoseError::MissingDoseVolume {
                beam: beam.name.clone(),
            })?;
        let path = self.file_for(index);
        if !path.is_file() {
            return Err(DoseError::DataFileMissing {
                beam: beam.name.clone(),
                path,
            });
        }
        let bytes = std::fs::read(&path).map_err(|source| DoseError::Io {
            path: path.clone(),
            source,
        })?;
        decode_big_endian(&beam.name, &bytes)
    }
}

/// Decodes a big-endian `f32` stream.
pub fn decode_big_endian(beam: &str, bytes: &[u8]) -> Result<Vec<f32>> {
    let samples = bytes.chunks_exact(4);
    if !samples.remainder().is_empty() {
        return Err(DoseError::TruncatedStream {
            beam: beam.to_string(),
            bytes: bytes.len(),
        });
    }
    Ok(samples
        .map(|chunk| f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Monitor units for one fraction of `beam`.
///
/// `PrescriptionDose / (NormalizedDose × CollimatorOutputFactor ×
/// DosePerMuAtCalibration)`. Zero when any term is zero or absent, when the
/// energy has no calibration, or when the beam's prescription did not
/// resolve.
pub fn monitor_units(beam: &Beam, machines: &[Machine]) -> f64 {
    if beam.prescription.is_none() {
        warn!(beam = %beam.name, "no resolved prescription, using zero monitor units");
        return 0.0;
    }
    let calibration = select_machine(machines, beam.machine_name()).and_then(|machine| {
        beam.nominal_energy()
            .and_then(|energy| machine.dose_per_mu(energy, beam.is_electron()))
    });
    let Some(calibration) = calibration else {
        warn!(
            beam = %beam.name,
            energy = beam.machine_energy_name.as_deref().unwrap_or_default(),
            "energy has no calibration in the machine model, using zero monitor units"
        );
        return 0.0;
    };
    let info = &beam.monitor_unit_info;
    let prescribed = info.prescription_dose.unwrap_or_default();
    let normalized = info.normalized_dose.unwrap_or_default();
    let output_factor = info.collimator_output_factor.unwrap_or_default();
    let denominator = normalized * output_factor * calibration;
    if denominator == 0.0 {
        warn!(
            beam = %beam.name,
            normalized,
            output_factor,
            calibration,
            "zero term in monitor unit calculation"
        );
        return 0.0;
    }
    prescribed / denominator
}

/// Reconstructed total dose over a trial's grid.
#[derive(Debug, Clone, PartialEq)]
pub struct DoseGrid {
    pub geometry: DoseGridGeometry,
    /// Total dose in Gy, X fastest.
    pub values: Vec<f64>,
}

impl DoseGrid {
    pub fn zeros(geometry: DoseGridGeometry) -> Self {
        let values = vec![0.0; geometry.voxel_count()];
        Self { geometry, values }
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Integer voxel values with `value = stored × scaling`.
    ///
    /// Negative values become zero and values past `u32::MAX` saturate.
    pub fn quantize(&self, scaling: f64) -> Vec<u32> {
        self.values
            .iter()
            .map(|value| {
                let stored = (value / scaling).round();
                if stored.is_nan() || stored <= 0.0 {
                    0
                } else if stored >= f64::from(u32::MAX) {
                    u32::MAX
                } else {
                    stored as u32
                }
            })
            .collect()
    }
}

/// Result of one reconstruction: the summed grid plus every skipped beam.
#[derive(Debug)]
pub struct DoseReconstruction {
    pub grid: DoseGrid,
    pub skipped: Vec<DoseError>,
}

impl DoseReconstruction {
    pub fn contributing_beams(&self, total: usize) -> usize {
        total.saturating_sub(self.skipped.len())
    }
}

/// Sums the dose of `beams` over `geometry`.
///
/// Beams whose dose cannot be read or whose length differs from the grid are
/// skipped and recorded; they never abort the reconstruction.
pub fn reconstruct(
    geometry: &DoseGridGeometry,
    beams: &[Beam],
    machines: &[Machine],
    source: &dyn DoseSource,
) -> DoseReconstruction {
    let mut grid = DoseGrid::zeros(*geometry);
    let mut skipped = Vec::new();
    for beam in beams {
        match beam_contribution(beam, grid.values.len(), machines, source) {
            Ok(contribution) => {
                for (total, value) in grid.values.iter_mut().zip(contribution) {
                    *total += value;
                }
            }
            Err(error) => {
                warn!(beam = %beam.name, %error, "skipping beam dose");
                skipped.push(error);
            }
        }
    }
    info!(
        beams = beams.len(),
        skipped = skipped.len(),
        max_gy = grid.max(),
        "reconstructed dose"
    );
    DoseReconstruction { grid, skipped }
}

fn beam_contribution(
    beam: &Beam,
    expected: usize,
    machines: &[Machine],
    source: &dyn DoseSource,
) -> Result<Vec<f64>> {
    let raw = source.read_beam_dose(beam)?;
    if raw.len() != expected {
        return Err(DoseError::DimensionMismatch {
            beam: beam.name.clone(),
            expected,
            actual: raw.len(),
        });
    }
    let mu = monitor_units(beam, machines);
    let fractions = beam
        .prescription
        .as_ref()
        .map_or(0.0, |prescription| f64::from(prescription.number_of_fractions));
    let factor = mu / 100.0 * fractions;
    debug!(beam = %beam.name, mu, fractions, "beam dose factor");
    Ok(raw.iter().map(|value| f64::from(*value) * factor).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbk_model::{MachineEnergy, MonitorUnitInfo, Prescription};
    use tempfile::TempDir;

    fn machine() -> Machine {
        Machine {
            name: "EX_7p4".to_string(),
            machine_type: None,
            sad: Some(100.0),
            photon_energies: vec![MachineEnergy {
                value: Some(6.0),
                id: Some(0),
                name: Some("6X".to_string()),
                dose_per_mu_at_calibration: Some(0.5),
            }],
            electron_energies: Vec::new(),
        }
    }

    fn beam(dose_volume: &str) -> Beam {
        Beam {
            name: "AP".to_string(),
            isocenter_name: None,
            prescription_name: Some("PTV".to_string()),
            machine_name_and_version: Some("EX_7p4: 2006-03-06".to_string()),
            modality: Some("Photons".to_string()),
            machine_energy_name: Some("6X".to_string()),
            set_beam_type: Some("Static".to_string()),
            use_mlc: None,
            ssd: None,
            avg_ssd: None,
            cp_managers: Vec::new(),
            monitor_unit_info: MonitorUnitInfo {
                prescription_dose: Some(200.0),
                normalized_dose: Some(2.0),
                collimator_output_factor: Some(1.0),
                total_transmission_fraction: Some(1.0),
                source_to_prescription_point_distance: None,
            },
            dose_volume: Some(dose_volume.to_string()),
            prescription: Some(Prescription {
                name: "PTV".to_string(),
                requested_monitor_units_per_fraction: None,
                prescription_dose: 200.0,
                prescription_percent: None,
                number_of_fractions: 10,
                prescription_point: None,
                method: None,
                normalization_method: None,
            }),
        }
    }

    fn geometry() -> DoseGridGeometry {
        DoseGridGeometry {
            voxel_size: [1.0; 3],
            dimension: [2, 1, 1],
            origin: [0.0; 3],
        }
    }

    #[test]
    fn monitor_units_follow_calibration() {
        // 200 / (2 * 1 * 0.5)
        assert_eq!(monitor_units(&beam("XDR:0"), &[machine()]), 200.0);

        let mut unlinked = beam("XDR:0");
        unlinked.prescription = None;
        assert_eq!(monitor_units(&unlinked, &[machine()]), 0.0);

        let mut unknown_energy = beam("XDR:0");
        unknown_energy.machine_energy_name = Some("18X".to_string());
        assert_eq!(monitor_units(&unknown_energy, &[machine()]), 0.0);

        let mut zero_factor = beam("XDR:0");
        zero_factor.monitor_unit_info.collimator_output_factor = Some(0.0);
        assert_eq!(monitor_units(&zero_factor, &[machine()]), 0.0);
    }

    #[test]
    fn dose_files_are_numbered_per_beam() {
        let files = BinaryDoseFiles::new("/data/Patient_6204/Plan_0");
        assert_eq!(
            files.file_for(3),
            PathBuf::from("/data/Patient_6204/Plan_0/plan.Trial.binary.003")
        );
    }

    #[test]
    fn reads_binary_files_and_scales() {
        let dir = TempDir::new().expect("temp dir");
        let files = BinaryDoseFiles::new(dir.path());
        let bytes: Vec<u8> = [0.5f32, 1.0].iter().flat_map(|v| v.to_be_bytes()).collect();
        std::fs::write(files.file_for(3), bytes).expect("write dose");

        let result = reconstruct(&geometry(), &[beam("XDR:3")], &[machine()], &files);
        assert!(result.skipped.is_empty());
        // raw * 200 MU / 100 * 10 fractions
        assert_eq!(result.grid.values, vec![10.0, 20.0]);
        assert_eq!(result.grid.quantize(1e-6), vec![10_000_000, 20_000_000]);
    }

    #[test]
    fn bad_beams_are_skipped() {
        let dir = TempDir::new().expect("temp dir");
        let files = BinaryDoseFiles::new(dir.path());
        std::fs::write(files.file_for(0), 1.0f32.to_be_bytes()).expect("write dose");
        std::fs::write(files.file_for(1), [0u8; 7]).expect("write dose");
        let beams = [beam("XDR:0"), beam("XDR:1"), beam("XDR:2"), beam("none")];

        let result = reconstruct(&geometry(), &beams, &[machine()], &files);
        assert_eq!(result.grid.values, vec![0.0, 0.0]);
        assert_eq!(result.contributing_beams(beams.len()), 0);
        assert!(matches!(
            result.skipped[0],
            DoseError::DimensionMismatch { expected: 2, actual: 1, .. }
        ));
        assert!(matches!(result.skipped[1], DoseError::TruncatedStream { bytes: 7, .. }));
        assert!(matches!(result.skipped[2], DoseError::DataFileMissing { .. }));
        assert!(matches!(result.skipped[3], DoseError::MissingDoseVolume { .. }));
    }

    #[test]
    fn quantize_clamps() {
        let grid = DoseGrid {
            geometry: geometry(),
            values: vec![-1.0, 1.0e9],
        };
        assert_eq!(grid.quantize(1e-6), vec![0, u32::MAX]);
    }
}
