//! Adds the concurrency-guard annotation to Job classes.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::classifier::{read_text, Finding, JobClass, JobClassifier};
use crate::collector::{Diagnostic, ScanReport};
use crate::config::ScannerSettings;
use crate::error::{ConfigError, IoError, RemediationError};
use crate::remediation::action_log::{ActionLog, ActionLogEntry};

pub const ADD_ANNOTATION_ACTION: &str = "add-annotation";

const BOM: char = '\u{feff}';

/// What to add and where: the annotation goes on the class implementing
/// the interface, which is located the same way the scanner finds it.
#[derive(Debug, Clone)]
pub struct AnnotationSpec {
    locator: JobClassifier,
    import: String,
}

impl AnnotationSpec {
    pub fn new(
        interface: &str,
        annotation: &str,
        import: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        if annotation.trim().is_empty() {
            return Err(ConfigError::invalid_pattern(annotation, "annotation is empty"));
        }
        Ok(Self {
            locator: JobClassifier::new(interface, annotation)?,
            import: import.into().trim().to_string(),
        })
    }

    pub fn from_settings(settings: &ScannerSettings) -> Result<Self, ConfigError> {
        Self::new(
            &settings.job_interface,
            &settings.job_annotation,
            &settings.job_annotation_import,
        )
    }

    /// Annotation line, e.g. `@DisallowConcurrentExecution`.
    pub fn annotation(&self) -> &str {
        self.locator.annotation()
    }

    /// Fully qualified type to import.
    pub fn import(&self) -> &str {
        &self.import
    }

    pub fn interface(&self) -> &str {
        self.locator.interface()
    }

    fn import_line(&self) -> String {
        format!("import {};", self.import)
    }

    fn is_imported(&self, source: &str) -> bool {
        let wildcard = self
            .import
            .rsplit_once('.')
            .map(|(package, _)| format!("import {package}.*;"));
        source.lines().any(|line| {
            let line = line.trim();
            line == self.import_line() || wildcard.as_deref() == Some(line)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnotateOutcome {
    Added,
    AlreadyAnnotated,
}

/// Returns `source` with the import and the annotation inserted, or `None`
/// when no class implements the interface. The annotation goes directly
/// above the implementing class line, below any annotations already there,
/// with the same indentation. The import goes after the last import, else
/// after the package line, else at the top. A leading BOM stays first.
pub fn insert_annotation(source: &str, spec: &AnnotationSpec) -> Option<String> {
    let (bom, body) = match source.strip_prefix(BOM) {
        Some(rest) => (Some(BOM), rest),
        None => (None, source),
    };

    let class_idx = spec.locator.declaration_line(body)?;
    let eol = if body.contains("\r\n") { "\r\n" } else { "\n" };
    let mut lines: Vec<String> = body.lines().map(str::to_string).collect();

    let indent: String = lines[class_idx]
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect();
    lines.insert(class_idx, format!("{indent}{}", spec.annotation()));

    if !spec.import.is_empty() && !spec.is_imported(body) {
        let head = &lines[..class_idx];
        let last_import = head
            .iter()
            .rposition(|line| line.trim_start().starts_with("import "));
        let package = head
            .iter()
            .position(|line| line.trim_start().starts_with("package "));

        match (last_import, package) {
            (Some(idx), _) => lines.insert(idx + 1, spec.import_line()),
            (None, Some(idx)) => {
                lines.insert(idx + 1, String::new());
                lines.insert(idx + 2, spec.import_line());
            }
            (None, None) => {
                lines.insert(0, spec.import_line());
                lines.insert(1, String::new());
            }
        }
    }

    let mut out = String::with_capacity(source.len() + 128);
    out.extend(bom);
    out.push_str(&lines.join(eol));
    if body.ends_with('\n') {
        out.push_str(eol);
    }
    Some(out)
}

/// Rewrites `path` in place. A file whose implementing class already
/// carries the annotation is left untouched and nothing is logged.
pub fn add_annotation(
    path: &Path,
    spec: &AnnotationSpec,
    log: &dyn ActionLog,
) -> Result<AnnotateOutcome, RemediationError> {
    let source = read_text(path)?;
    if spec.locator.is_annotated(&source) {
        debug!(path = %path.display(), "already annotated");
        return Ok(AnnotateOutcome::AlreadyAnnotated);
    }

    let updated = insert_annotation(&source, spec)
        .ok_or_else(|| RemediationError::no_job_class(path, spec.interface()))?;
    fs::write(path, updated).map_err(|e| IoError::write_error(path, e))?;
    info!(path = %path.display(), annotation = %spec.annotation(), "annotation added");

    if let Err(err) = log.append(ActionLogEntry::now(path, ADD_ANNOTATION_ACTION)) {
        warn!(path = %path.display(), error = %err, "failed to record action");
    }
    Ok(AnnotateOutcome::Added)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub failures: Vec<Diagnostic>,
}

impl fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "succeeded: {}, failed: {}", self.succeeded, self.failed)
    }
}

/// Annotates every path, continuing past failures.
pub fn annotate_all<I, P>(paths: I, spec: &AnnotationSpec, log: &dyn ActionLog) -> BatchOutcome
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut outcome = BatchOutcome::default();
    for path in paths {
        let path = path.as_ref();
        match add_annotation(path, spec, log) {
            Ok(AnnotateOutcome::Added) => outcome.succeeded += 1,
            Ok(AnnotateOutcome::AlreadyAnnotated) => outcome.skipped += 1,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "annotation failed");
                outcome.failed += 1;
                outcome.failures.push(Diagnostic::new(path, err.to_string()));
            }
        }
    }
    info!(
        succeeded = outcome.succeeded,
        skipped = outcome.skipped,
        failed = outcome.failed,
        "batch annotation finished"
    );
    outcome
}

/// Annotates the classes in `report` that still lack the annotation.
pub fn annotate_pending(
    report: &ScanReport<JobClass>,
    spec: &AnnotationSpec,
    log: &dyn ActionLog,
) -> BatchOutcome {
    let pending: Vec<PathBuf> = report
        .findings()
        .filter(|class| class.needs_remediation())
        .map(|class| class.file_path().to_path_buf())
        .collect();
    annotate_all(pending, spec, log)
}
