use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

use crate::classifier::Finding;
use crate::cli::OutputFormat;
use crate::collector::{Diagnostic, Discovered, ScanReport, ScanStats};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonOutput<'a, F> {
    pub root: &'a Path,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_remediation: Option<usize>,
    pub stats: ScanStats,
    pub findings: &'a [Discovered<F>],
    #[serde(skip_serializing_if = "no_diagnostics")]
    pub diagnostics: &'a [Diagnostic],
}

fn no_diagnostics(diagnostics: &&[Diagnostic]) -> bool {
    diagnostics.is_empty()
}

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format<F>(report: &ScanReport<F>, format: OutputFormat) -> Result<String>
    where
        F: Finding + Serialize,
    {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&Self::build_output(report))?),
            OutputFormat::Text => Ok(Self::render_text(report)),
        }
    }

    pub fn build_output<F: Finding>(report: &ScanReport<F>) -> JsonOutput<'_, F> {
        JsonOutput {
            root: report.root(),
            total: report.total(),
            pending_remediation: F::TRACKS_REMEDIATION.then(|| report.pending_remediation()),
            stats: report.stats,
            findings: report.records(),
            diagnostics: &report.diagnostics,
        }
    }

    pub fn render_text<F: Finding>(report: &ScanReport<F>) -> String {
        let mut out = String::new();
        for record in report.records() {
            let _ = writeln!(out, "{:>4}  {}", record.index + 1, record.finding.summary());
        }
        if !report.is_empty() {
            out.push('\n');
        }

        let _ = write!(
            out,
            "{} finding(s) under {} ({} file(s) inspected",
            report.total(),
            report.root().display(),
            report.stats.candidates_inspected
        );
        if report.stats.paths_skipped > 0 {
            let _ = write!(out, ", {} skipped", report.stats.paths_skipped);
        }
        out.push(')');
        if F::TRACKS_REMEDIATION {
            let _ = write!(out, "\n{} pending remediation", report.pending_remediation());
        }
        out.push('\n');

        for diagnostic in &report.diagnostics {
            let _ = writeln!(out, "skipped {}: {}", diagnostic.path.display(), diagnostic.message);
        }
        out
    }
}
