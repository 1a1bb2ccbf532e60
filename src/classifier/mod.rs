//! Per-file classification.
//!
//! A [`Classifier`] first decides from the candidate's name alone whether
//! it is worth opening, then extracts zero or more findings from it. Read
//! failures are returned to the engine, which records and skips them.

pub mod jar;
pub mod job;
pub mod patterns;
pub mod sensitive;

pub use jar::{JarClassifier, JarFile};
pub use job::{JobClass, JobClassifier};
pub use patterns::LogPatternTable;
pub use sensitive::{SensitiveHit, SensitiveLogClassifier};

use std::fs;
use std::path::Path;

use crate::discovery::{Candidate, FileFilter};
use crate::error::IoError;

/// Shape shared by every finding type the collector accumulates.
pub trait Finding {
    /// Whether findings of this type carry a remediation state.
    const TRACKS_REMEDIATION: bool = false;

    fn file_path(&self) -> &Path;

    /// Key used to merge a re-run scan into prior results.
    fn identity(&self) -> String;

    fn needs_remediation(&self) -> bool {
        false
    }

    /// One-line rendering for plain-text output.
    fn summary(&self) -> String;
}

pub trait Classifier: Send + Sync {
    type Finding: Finding;

    /// Name-only check. Must not touch file content.
    fn accepts(&self, candidate: &Candidate) -> bool;

    fn classify(&self, candidate: &Candidate) -> Result<Vec<Self::Finding>, IoError>;

    /// Filter this classifier expects the walker to apply.
    fn file_filter(&self) -> FileFilter;

    /// Completes "none ..." in a no-matches error, e.g. "implement Job".
    fn match_description(&self) -> String;
}

/// Reads a file as text. Invalid UTF-8 is replaced, not rejected.
pub fn read_text(path: &Path) -> Result<String, IoError> {
    let bytes = fs::read(path).map_err(|e| IoError::read_error(path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
