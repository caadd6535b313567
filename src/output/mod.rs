use anyhow::Result;
use std::path::Path;

use crate::cli::ReportFormat;
use crate::pipeline::PipelineReport;

/// Render a report in the requested format
pub fn format_report(report: &PipelineReport, format: &ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(format_as_text(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

fn format_as_text(report: &PipelineReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("Status: {}\n", report.message));

    if let Some(summary) = &report.summary {
        out.push_str("\n");
        out.push_str(summary);
        out.push_str("\n");
    }

    if let Some(doc_url) = &report.doc_url {
        out.push_str(&format!("\nDocument: {}\n", doc_url));
    }

    out
}

/// Save a report to a file
pub fn save_to_file(report: &PipelineReport, path: &Path, format: &ReportFormat) -> Result<()> {
    let content = format_report(report, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print a report to the console
pub fn print_to_console(report: &PipelineReport, format: &ReportFormat) -> Result<()> {
    println!("{}", format_report(report, format)?);
    Ok(())
}
