use serde::Serialize;
use std::collections::{BTreeSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};
use walkdir::WalkDir;

use crate::discovery::cancel::CancelToken;
use crate::discovery::filter::FileFilter;
use crate::error::{IoError, ScanError};

/// Directory basename at which recursion halts. Immediate file children
/// that pass `harvest` are emitted; subdirectories are never entered.
#[derive(Debug, Clone)]
pub struct StopDescent {
    pub marker: String,
    pub harvest: FileFilter,
}

impl StopDescent {
    pub fn new(marker: impl Into<String>, harvest: FileFilter) -> Self {
        Self {
            marker: marker.into(),
            harvest,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Matched case-sensitively against directory basenames at every depth.
    pub excluded_dirs: BTreeSet<String>,
    pub stop_descent: Option<StopDescent>,
    pub cancel: Option<CancelToken>,
}

impl WalkOptions {
    fn is_excluded(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CandidateOrigin {
    /// Reached by normal recursion.
    Walked,
    /// Immediate child of a stop-descent directory.
    Harvested { marker_dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub origin: CandidateOrigin,
}

impl Candidate {
    pub fn walked(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            origin: CandidateOrigin::Walked,
        }
    }

    pub fn harvested(path: impl Into<PathBuf>, marker_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            origin: CandidateOrigin::Harvested {
                marker_dir: marker_dir.into(),
            },
        }
    }

    pub fn is_harvested(&self) -> bool {
        matches!(self.origin, CandidateOrigin::Harvested { .. })
    }
}

/// A path the scan had to skip, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub path: PathBuf,
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<&IoError> for Diagnostic {
    fn from(err: &IoError) -> Self {
        Self::new(err.path(), err.to_string())
    }
}

#[derive(Debug, Clone)]
pub enum WalkEvent {
    Candidate(Candidate),
    Skipped(Diagnostic),
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkStats {
    pub directories_visited: usize,
    pub files_seen: usize,
}

/// Checks that `path` is an existing, listable directory and returns it in
/// absolute form.
pub fn validate_root(path: &Path) -> Result<PathBuf, ScanError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::invalid_root(path, "path does not exist"),
        _ => ScanError::invalid_root(path, e.to_string()),
    })?;

    if !metadata.is_dir() {
        return Err(ScanError::invalid_root(path, "not a directory"));
    }

    fs::read_dir(path)
        .map_err(|e| ScanError::invalid_root(path, format!("directory is not readable: {e}")))?;

    std::path::absolute(path).map_err(|e| ScanError::invalid_root(path, e.to_string()))
}

pub struct Walker {
    root: PathBuf,
    options: WalkOptions,
}

impl Walker {
    pub fn new(root: impl AsRef<Path>, options: WalkOptions) -> Result<Self, ScanError> {
        let root = validate_root(root.as_ref())?;
        Ok(Self { root, options })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Starts a fresh traversal. Each call re-reads the filesystem.
    pub fn walk(&self) -> Walk<'_> {
        let inner = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Walk {
            options: &self.options,
            inner,
            pending: VecDeque::new(),
            stats: WalkStats::default(),
            done: false,
        }
    }
}

/// Lazy depth-first pre-order traversal. Children are visited in lexical
/// order of their file names.
pub struct Walk<'a> {
    options: &'a WalkOptions,
    inner: walkdir::IntoIter,
    pending: VecDeque<WalkEvent>,
    stats: WalkStats,
    done: bool,
}

impl Walk<'_> {
    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    fn skipped(&self, err: walkdir::Error) -> Option<Diagnostic> {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();

        // walkdir opens a directory before yielding it, so an unreadable
        // excluded directory surfaces here first.
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| self.options.is_excluded(n))
        {
            return None;
        }

        let err = IoError::read_error(&path, err.into());
        warn!(path = %path.display(), error = %err, "skipping unreadable path");
        Some(Diagnostic::from(&err))
    }

    fn harvest(&mut self, marker_dir: &Path, harvest: &FileFilter) {
        self.stats.directories_visited += 1;

        let entries = match fs::read_dir(marker_dir) {
            Ok(entries) => entries,
            Err(e) => {
                let err = IoError::read_error(marker_dir, e);
                warn!(path = %marker_dir.display(), error = %err, "skipping unreadable directory");
                self.pending.push_back(WalkEvent::Skipped(Diagnostic::from(&err)));
                return;
            }
        };

        let mut children = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => children.push(entry),
                Err(e) => {
                    let err = IoError::read_error(marker_dir, e);
                    warn!(path = %marker_dir.display(), error = %err, "skipping unreadable entry");
                    self.pending.push_back(WalkEvent::Skipped(Diagnostic::from(&err)));
                }
            }
        }
        children.sort_by_key(|entry| entry.file_name());

        for child in children {
            let path = child.path();
            let is_file = match child.file_type() {
                Ok(file_type) => file_type.is_file(),
                Err(e) => {
                    let err = IoError::read_error(&path, e);
                    self.pending.push_back(WalkEvent::Skipped(Diagnostic::from(&err)));
                    continue;
                }
            };
            if !is_file {
                trace!(path = %path.display(), "not descending below stop marker");
                continue;
            }

            self.stats.files_seen += 1;
            if harvest.matches(&path) {
                trace!(path = %path.display(), "harvested");
                self.pending
                    .push_back(WalkEvent::Candidate(Candidate::harvested(path, marker_dir)));
            }
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<WalkEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            if self.done {
                return None;
            }

            let entry = match self.inner.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Ok(entry)) => entry,
                Some(Err(err)) => match self.skipped(err) {
                    Some(diagnostic) => return Some(WalkEvent::Skipped(diagnostic)),
                    None => continue,
                },
            };

            let file_type = entry.file_type();

            if file_type.is_symlink() {
                trace!(path = %entry.path().display(), "not following symlink");
                continue;
            }

            if file_type.is_file() {
                self.stats.files_seen += 1;
                trace!(path = %entry.path().display(), "candidate");
                return Some(WalkEvent::Candidate(Candidate::walked(entry.into_path())));
            }

            if !file_type.is_dir() {
                continue;
            }

            let options = self.options;
            if entry.depth() > 0 {
                let name = entry.file_name().to_string_lossy();
                if options.is_excluded(&name) {
                    trace!(path = %entry.path().display(), "excluded directory");
                    self.inner.skip_current_dir();
                    continue;
                }

                if let Some(stop) = options
                    .stop_descent
                    .as_ref()
                    .filter(|stop| stop.marker == name)
                {
                    self.inner.skip_current_dir();
                    if options.is_cancelled() {
                        self.done = true;
                        return Some(WalkEvent::Cancelled);
                    }
                    self.harvest(entry.path(), &stop.harvest);
                    continue;
                }
            }

            if options.is_cancelled() {
                self.done = true;
                return Some(WalkEvent::Cancelled);
            }
            self.stats.directories_visited += 1;
        }
    }
}
