use std::collections::BTreeSet;
use std::time::Instant;

use anyhow::{Context, Result};
use pbk_cli::sinks::{DryRunSink, FileSink};
use pbk_core::{ConversionRequest, run_conversion};
use pbk_ingest::{PatientBackup, load_settings, parse_record_file};
use pbk_model::ObjectKind;
use tracing::{info, info_span};

use crate::cli::{ConvertArgs, ParseArgs};
use crate::types::ConvertOutcome;

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertOutcome> {
    let settings = load_settings(args.settings.as_deref()).context("load settings")?;
    let backup = info_span!("ingest", input = %args.input.display())
        .in_scope(|| PatientBackup::open(&args.input))
        .with_context(|| format!("open patient backup {}", args.input.display()))?;
    let patient = backup.patient();
    let request = build_request(args);
    let output_dir = request.resolve_output_dir(&patient.medical_record_number);
    info!(
        mrn = %patient.medical_record_number,
        image_sets = backup.image_set_ids().len(),
        plans = backup.plan_ids().len(),
        output = %output_dir.display(),
        dry_run = args.dry_run,
        "converting backup"
    );

    let start = Instant::now();
    let report = if args.dry_run {
        let mut sink = DryRunSink::default();
        let report = run_conversion(&backup, &request, &settings, &mut sink);
        info!(encoded = sink.encoded(), "dry run complete");
        report
    } else {
        let mut sink = FileSink::create(&output_dir)
            .with_context(|| format!("create output directory {}", output_dir.display()))?;
        let report = run_conversion(&backup, &request, &settings, &mut sink);
        info!(
            written = sink.written().len(),
            dir = %sink.dir().display(),
            "files written"
        );
        report
    };
    info!(duration_ms = start.elapsed().as_millis(), "conversion complete");

    Ok(ConvertOutcome {
        patient: patient.person_name(),
        medical_record_number: patient.medical_record_number.clone(),
        output_dir,
        dry_run: args.dry_run,
        report,
    })
}

pub fn run_parse(args: &ParseArgs) -> Result<()> {
    let tree = parse_record_file(&args.file, args.kind.into())
        .with_context(|| format!("parse {}", args.file.display()))?;
    let json = serde_json::to_string_pretty(&tree).context("serialize record tree")?;
    println!("{json}");
    Ok(())
}

fn build_request(args: &ConvertArgs) -> ConversionRequest {
    let kinds: BTreeSet<ObjectKind> = args
        .kinds
        .iter()
        .flat_map(|kind| kind.object_kinds().iter().copied())
        .collect();
    let mut request = ConversionRequest::default()
        .with_kinds(kinds)
        .with_plans(args.plans.iter().copied())
        .with_image_sets(args.image_sets.iter().copied());
    if let Some(dir) = &args.output_dir {
        request = request.with_output_dir(dir.clone());
    }
    request
}
