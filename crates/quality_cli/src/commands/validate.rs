use anyhow::Result;
use quality_report::{Reporter, persist_reports};
use quality_validator::{BatchValidator, RecordValidator};
use std::path::Path;
use tracing::info;

use crate::output;
use crate::records;
use crate::sink::JsonDirSink;

#[allow(clippy::too_many_arguments)]
pub fn execute(
    records_path: &str,
    config_path: Option<&str>,
    boundaries_path: Option<&str>,
    group_by: &str,
    format: &str,
    out_dir: Option<&str>,
    min_score: Option<f64>,
) -> Result<()> {
    info!("Validating records: {}", records_path);
    if let Some(path) = config_path {
        info!("Rule configuration: {}", path);
    }

    let config = quality_config::load_or_degraded(config_path.map(Path::new));
    let batch = records::load_records(Path::new(records_path))?;
    output::print_info(&format!("Loaded {} record(s)", batch.len()));

    let mut validator = RecordValidator::new(config);
    if let Some(path) = boundaries_path {
        let boundaries = records::load_boundaries(Path::new(path))?;
        output::print_info("Administrative boundary layers loaded");
        validator = validator.with_boundaries(boundaries);
    }

    let result = BatchValidator::new(validator).validate_all(&batch);

    let reporter = Reporter::for_result(&result);
    let record_reports = reporter.record_level_report(&result);
    let group_reports = reporter.group_level_report(&result, group_by);
    let summary = reporter.summary_report(&result, group_by);

    output::print_report(&summary, &record_reports, &group_reports, format);

    if let Some(dir) = out_dir {
        let mut sink = JsonDirSink::new(dir)?;
        let failures = persist_reports(&mut sink, &record_reports, &group_reports, &summary);
        if failures == 0 {
            output::print_success(&format!("Reports persisted to {dir}"));
        } else {
            // Best effort: the in-memory result above is complete regardless
            output::print_error(&format!("{failures} report write(s) failed"));
        }
    }

    if let Some(min) = min_score {
        if summary.quality_score < min {
            output::print_error(&format!(
                "Quality score {:.1} is below the required {min:.1}",
                summary.quality_score
            ));
            std::process::exit(1);
        }
    }

    Ok(())
}
