//! Ordered accumulation of findings and the report handed back to callers.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::classifier::{Finding, JarFile};
pub use crate::discovery::Diagnostic;

/// A finding tagged with its position in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovered<F> {
    pub index: usize,
    #[serde(flatten)]
    pub finding: F,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub directories_visited: usize,
    pub files_seen: usize,
    pub candidates_inspected: usize,
    /// Files and directories recorded in diagnostics.
    pub paths_skipped: usize,
}

/// Appends findings in the order they arrive. No deduplication happens
/// here; see [`merge_by_identity`] for combining runs.
#[derive(Debug)]
pub struct Collector<F> {
    records: Vec<Discovered<F>>,
    diagnostics: Vec<Diagnostic>,
}

impl<F: Finding> Collector<F> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn push(&mut self, finding: F) -> usize {
        let index = self.records.len();
        self.records.push(Discovered { index, finding });
        index
    }

    pub fn extend<I: IntoIterator<Item = F>>(&mut self, findings: I) {
        for finding in findings {
            self.push(finding);
        }
    }

    pub fn skip(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn finish(self, root: impl Into<PathBuf>, mut stats: ScanStats) -> ScanReport<F> {
        stats.paths_skipped = self.diagnostics.len();
        ScanReport {
            root: root.into(),
            records: self.records,
            stats,
            diagnostics: self.diagnostics,
        }
    }
}

impl<F: Finding> Default for Collector<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one scan. The engine never touches it after returning.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport<F> {
    pub root: PathBuf,
    pub records: Vec<Discovered<F>>,
    pub stats: ScanStats,
    pub diagnostics: Vec<Diagnostic>,
}

impl<F: Finding> ScanReport<F> {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn records(&self) -> &[Discovered<F>] {
        &self.records
    }

    pub fn findings(&self) -> impl Iterator<Item = &F> {
        self.records.iter().map(|r| &r.finding)
    }

    pub fn into_findings(self) -> Vec<F> {
        self.records.into_iter().map(|r| r.finding).collect()
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Findings still needing a fix, e.g. Job classes without the guard
    /// annotation. Always zero for finding types without remediation.
    pub fn pending_remediation(&self) -> usize {
        self.findings().filter(|f| f.needs_remediation()).count()
    }

    /// Stable re-sort. Discovery indexes travel with their findings.
    pub fn sorted_by<C>(mut self, mut compare: C) -> Self
    where
        C: FnMut(&F, &F) -> Ordering,
    {
        self.records.sort_by(|a, b| compare(&a.finding, &b.finding));
        self
    }
}

impl ScanReport<JarFile> {
    /// Newest archives first.
    pub fn sort_by_modified_desc(self) -> Self {
        self.sorted_by(|a, b| b.last_modified.cmp(&a.last_modified))
    }
}

/// Combines a re-run with prior results. Prior order is kept, entries whose
/// identity reappears are replaced by the fresh finding, and fresh-only
/// entries are appended. Indexes are renumbered.
pub fn merge_by_identity<F>(prior: Vec<Discovered<F>>, fresh: Vec<Discovered<F>>) -> Vec<Discovered<F>>
where
    F: Finding,
{
    let mut fresh_by_key: HashMap<String, F> = HashMap::with_capacity(fresh.len());
    let mut fresh_order = Vec::with_capacity(fresh.len());
    for record in fresh {
        let key = record.finding.identity();
        if fresh_by_key.insert(key.clone(), record.finding).is_none() {
            fresh_order.push(key);
        }
    }

    let mut merged = Vec::with_capacity(prior.len() + fresh_order.len());
    let mut seen = HashSet::new();
    for record in prior {
        let key = record.finding.identity();
        if !seen.insert(key.clone()) {
            continue;
        }
        let finding = fresh_by_key.remove(&key).unwrap_or(record.finding);
        merged.push(finding);
    }
    for key in fresh_order {
        if let Some(finding) = fresh_by_key.remove(&key) {
            merged.push(finding);
        }
    }

    merged
        .into_iter()
        .enumerate()
        .map(|(index, finding)| Discovered { index, finding })
        .collect()
}
