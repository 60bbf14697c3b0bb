use std::path::PathBuf;

use pbk_core::ConversionReport;

#[derive(Debug)]
pub struct ConvertOutcome {
    pub patient: String,
    pub medical_record_number: String,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub report: ConversionReport,
}

impl ConvertOutcome {
    pub fn has_errors(&self) -> bool {
        self.report.has_failures()
    }
}
