//! CLI argument definitions for the backup converter.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use pbk_ingest::RecordKind;
use pbk_model::ObjectKind;

#[derive(Parser)]
#[command(
    name = "pbk2dicom",
    version,
    about = "Convert Pinnacle patient backups to DICOM objects",
    long_about = "Convert Pinnacle treatment planning backups to DICOM objects.\n\n\
                  Produces CT image series, RT structure sets, RT plans and RT doses\n\
                  from the backup's image sets, plans and trials."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a patient backup directory to DICOM files.
    Convert(ConvertArgs),

    /// Parse one record file and print its tree as JSON.
    Parse(ParseArgs),
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Patient backup directory containing the `Patient` file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory (default: ./<MedicalRecordNumber>).
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Object kinds to produce; repeat for several.
    #[arg(short = 'k', long = "kind", value_enum, default_value = "all")]
    pub kinds: Vec<KindArg>,

    /// Plan ids to convert (default: every plan in the backup).
    #[arg(long = "plan", value_name = "ID")]
    pub plans: Vec<i64>,

    /// Image set ids to convert (default: every image set in the backup).
    #[arg(long = "image-set", value_name = "ID")]
    pub image_sets: Vec<i64>,

    /// TOML file with site settings.
    #[arg(long = "settings", value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Build and encode every object without writing files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct ParseArgs {
    /// Record file to parse.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Record kind deciding which repeating blocks become lists.
    #[arg(long = "kind", value_enum, default_value = "generic")]
    pub kind: RecordKindArg,
}

/// Output object filter.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    All,
    Ct,
    Rs,
    Rp,
    Rd,
}

impl KindArg {
    pub fn object_kinds(self) -> &'static [ObjectKind] {
        match self {
            Self::All => &ObjectKind::ALL,
            Self::Ct => &[ObjectKind::Image],
            Self::Rs => &[ObjectKind::StructureSet],
            Self::Rp => &[ObjectKind::Plan],
            Self::Rd => &[ObjectKind::Dose],
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RecordKindArg {
    Patient,
    Header,
    ImageInfo,
    ImageSet,
    PlanInfo,
    PatientSetup,
    Points,
    Roi,
    Trial,
    Machines,
    Generic,
}

impl From<RecordKindArg> for RecordKind {
    fn from(kind: RecordKindArg) -> Self {
        match kind {
            RecordKindArg::Patient => RecordKind::Patient,
            RecordKindArg::Header => RecordKind::ImageSetHeader,
            RecordKindArg::ImageInfo => RecordKind::ImageInfo,
            RecordKindArg::ImageSet => RecordKind::ImageSet,
            RecordKindArg::PlanInfo => RecordKind::PlanInfo,
            RecordKindArg::PatientSetup => RecordKind::PatientSetup,
            RecordKindArg::Points => RecordKind::Points,
            RecordKindArg::Roi => RecordKind::Roi,
            RecordKindArg::Trial => RecordKind::Trial,
            RecordKindArg::Machines => RecordKind::Machines,
            RecordKindArg::Generic => RecordKind::Generic,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_arguments_parse() {
        let cli = Cli::try_parse_from([
            "pbk2dicom", "convert", "Patient_1", "-k", "rp", "-k", "rd", "--plan", "2",
            "--dry-run",
        ])
        .expect("valid arguments");
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.kinds.len(), 2);
        assert_eq!(args.plans, vec![2]);
        assert!(args.dry_run);
        assert!(args.output_dir.is_none());
    }

    #[test]
    fn kind_defaults_to_all() {
        let cli = Cli::try_parse_from(["pbk2dicom", "convert", "Patient_1"]).expect("valid");
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert!(args.kinds == vec![KindArg::All]);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["pbk2dicom", "convert", "Patient_1", "-k", "mr"]).is_err());
    }
}
