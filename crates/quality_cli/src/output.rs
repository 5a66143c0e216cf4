use colored::*;
use quality_core::Severity;
use quality_report::{GroupReport, RecordReport, SummaryReport};
use serde_json::json;

pub fn print_report(
    summary: &SummaryReport,
    records: &[RecordReport],
    groups: &[GroupReport],
    format: &str,
) {
    match format {
        "json" => print_json_report(summary, records, groups),
        _ => print_text_report(summary, records, groups),
    }
}

fn severity_colored(severity: Severity, text: &str) -> ColoredString {
    match severity {
        Severity::Critical => text.red().bold(),
        Severity::High => text.red(),
        Severity::Medium => text.yellow(),
        Severity::Low => text.cyan(),
        Severity::Info => text.normal(),
    }
}

fn print_text_report(summary: &SummaryReport, records: &[RecordReport], groups: &[GroupReport]) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  QUALITY REPORT".bold());
    println!("{}", "═".repeat(60));

    println!(
        "\n  Score: {} ({})",
        format!("{:.1}", summary.quality_score).bold(),
        summary.rating.to_string().bold()
    );
    println!("  Records:            {}", summary.total_records);
    println!("  Records with issues: {}", summary.records_with_issues);
    println!("  Total issues:        {}", summary.total_issues);
    println!("  Duplicate groups:    {}", summary.duplicate_group_count);

    if !summary.severity_histogram.is_empty() {
        println!("\n{}", "By severity:".bold());
        for (severity, count) in summary.severity_histogram.iter().rev() {
            println!(
                "  {:<10} {}",
                severity_colored(*severity, &severity.to_string()),
                count
            );
        }
    }

    if !records.is_empty() {
        println!("\n{}", "Most urgent records:".bold());
        for report in records.iter().take(10) {
            println!(
                "  [{}] {} — {} issue(s), worst {}",
                report.priority,
                report.record_key,
                report.issue_count,
                severity_colored(report.worst_severity, &report.worst_severity.to_string()),
            );
        }
    }

    if !groups.is_empty() {
        println!("\n{}", "Organizational units:".bold());
        for report in groups {
            println!(
                "  {:<40} score {:>5.1}  error rate {:>5.1}%  {}",
                report.group,
                report.quality_score,
                report.error_rate * 100.0,
                report.status
            );
        }
    }

    if !summary.recommendations.is_empty() {
        println!("\n{}", "Recommendations:".bold());
        for (i, recommendation) in summary.recommendations.iter().enumerate() {
            println!("  {}. {}", i + 1, recommendation);
        }
    }

    println!("\n  Run: {}", summary.run_id);
    println!("{}", "═".repeat(60));
}

fn print_json_report(summary: &SummaryReport, records: &[RecordReport], groups: &[GroupReport]) {
    let output = json!({
        "summary": summary,
        "records": records,
        "groups": groups,
    });

    match serde_json::to_string_pretty(&output) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => eprintln!("Failed to render JSON report: {err}"),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
