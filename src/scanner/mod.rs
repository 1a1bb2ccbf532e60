//! The scan-and-classify engine.
//!
//! [`TreeScanner`] wires the three stages together: the walker produces
//! candidates, the classifier inspects those passing the cheap name check,
//! and the collector keeps the findings in discovery order. Each tool is a
//! [`ScanConfig`] plus a classifier; see [`presets`].

pub mod presets;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use crate::classifier::Classifier;
use crate::collector::{Collector, Diagnostic, ScanReport, ScanStats};
pub use crate::discovery::CancelToken;
use crate::discovery::{FileFilter, StopDescent, WalkEvent, WalkOptions, Walker};
use crate::error::ScanError;

/// What an empty outcome means for the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyOutcome {
    /// An empty report is a valid result.
    #[default]
    Allow,
    /// No candidates raises `NoCandidates`; candidates without findings
    /// raise `NoMatches`.
    Reject,
}

/// Input for one scan. Built fresh per invocation.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    root: PathBuf,
    excluded_dirs: BTreeSet<String>,
    file_filter: FileFilter,
    stop_descent: Option<StopDescent>,
    empty_outcome: EmptyOutcome,
    cancel: Option<CancelToken>,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded_dirs: BTreeSet::new(),
            file_filter: FileFilter::Any,
            stop_descent: None,
            empty_outcome: EmptyOutcome::Allow,
            cancel: None,
        }
    }

    pub fn exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn file_filter(mut self, filter: FileFilter) -> Self {
        self.file_filter = filter;
        self
    }

    /// Halts recursion at directories named `marker` and harvests their
    /// immediate children passing `harvest`. The marker is dropped from the
    /// exclusion set, which would otherwise hide it.
    pub fn stop_descent(mut self, marker: impl Into<String>, harvest: FileFilter) -> Self {
        let marker = marker.into();
        self.excluded_dirs.remove(&marker);
        self.stop_descent = Some(StopDescent::new(marker, harvest));
        self
    }

    pub fn empty_outcome(mut self, outcome: EmptyOutcome) -> Self {
        self.empty_outcome = outcome;
        self
    }

    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn excluded_dirs(&self) -> &BTreeSet<String> {
        &self.excluded_dirs
    }

    fn walk_options(&self) -> WalkOptions {
        let mut excluded_dirs = self.excluded_dirs.clone();
        if let Some(stop) = &self.stop_descent {
            excluded_dirs.remove(&stop.marker);
        }
        WalkOptions {
            excluded_dirs,
            stop_descent: self.stop_descent.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

pub struct TreeScanner<C> {
    classifier: C,
}

impl<C: Classifier> TreeScanner<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Walks `config.root()` sequentially and classifies every candidate.
    ///
    /// Unreadable subtrees and files are recorded in the report's
    /// diagnostics and skipped. Only an invalid root, cancellation, or an
    /// empty outcome under [`EmptyOutcome::Reject`] fail the scan.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanReport<C::Finding>, ScanError> {
        let walker = Walker::new(config.root(), config.walk_options())?;
        let root = walker.root().to_path_buf();
        debug!(root = %root.display(), "starting scan");

        let mut collector = Collector::new();
        let mut inspected = 0;
        let mut walk = walker.walk();

        for event in walk.by_ref() {
            let candidate = match event {
                WalkEvent::Candidate(candidate) => candidate,
                WalkEvent::Skipped(diagnostic) => {
                    collector.skip(diagnostic);
                    continue;
                }
                WalkEvent::Cancelled => {
                    info!(root = %root.display(), "scan cancelled");
                    return Err(ScanError::cancelled(root));
                }
            };

            if !candidate.is_harvested() && !config.file_filter.matches(&candidate.path) {
                continue;
            }
            if !self.classifier.accepts(&candidate) {
                trace!(path = %candidate.path.display(), "not accepted by classifier");
                continue;
            }

            inspected += 1;
            match self.classifier.classify(&candidate) {
                Ok(findings) => {
                    if !findings.is_empty() {
                        debug!(
                            path = %candidate.path.display(),
                            count = findings.len(),
                            "classified"
                        );
                    }
                    collector.extend(findings);
                }
                Err(err) => {
                    warn!(path = %candidate.path.display(), error = %err, "skipping file");
                    collector.skip(Diagnostic::from(&err));
                }
            }
        }

        let walked = walk.stats();
        let stats = ScanStats {
            directories_visited: walked.directories_visited,
            files_seen: walked.files_seen,
            candidates_inspected: inspected,
            paths_skipped: 0,
        };

        if config.empty_outcome == EmptyOutcome::Reject {
            if inspected == 0 {
                return Err(ScanError::no_candidates(
                    root,
                    self.classifier.file_filter().describe(),
                ));
            }
            if collector.is_empty() {
                return Err(ScanError::no_matches(
                    root,
                    inspected,
                    self.classifier.match_description(),
                ));
            }
        }

        let report = collector.finish(root, stats);
        debug!(
            root = %report.root().display(),
            findings = report.total(),
            inspected,
            skipped = report.stats.paths_skipped,
            "scan finished"
        );
        Ok(report)
    }
}

/// One-shot form of [`TreeScanner::scan`].
pub fn scan<C: Classifier>(
    config: &ScanConfig,
    classifier: C,
) -> Result<ScanReport<C::Finding>, ScanError> {
    TreeScanner::new(classifier).scan(config)
}
