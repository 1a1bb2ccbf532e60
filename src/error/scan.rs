use std::path::PathBuf;
use thiserror::Error;

/// Whole-scan failures surfaced to the caller.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid scan root '{path}': {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    #[error("no {filter} files found under '{root}'")]
    NoCandidates { root: PathBuf, filter: String },

    #[error("inspected {inspected} file(s) under '{root}' but none {what}")]
    NoMatches {
        root: PathBuf,
        inspected: usize,
        what: String,
    },

    #[error("scan of '{root}' was cancelled")]
    Cancelled { root: PathBuf },
}

impl ScanError {
    pub fn invalid_root(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidRoot {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn no_candidates(root: impl Into<PathBuf>, filter: impl Into<String>) -> Self {
        Self::NoCandidates {
            root: root.into(),
            filter: filter.into(),
        }
    }

    pub fn no_matches(root: impl Into<PathBuf>, inspected: usize, what: impl Into<String>) -> Self {
        Self::NoMatches {
            root: root.into(),
            inspected,
            what: what.into(),
        }
    }

    pub fn cancelled(root: impl Into<PathBuf>) -> Self {
        Self::Cancelled { root: root.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_root_display() {
        let err = ScanError::invalid_root("/missing", "path does not exist");
        assert_eq!(
            err.to_string(),
            "invalid scan root '/missing': path does not exist"
        );
    }

    #[test]
    fn test_no_candidates_and_no_matches_are_distinct() {
        let none_found = ScanError::no_candidates("/src", ".java");
        let none_matched = ScanError::no_matches("/src", 4, "implement Job");
        assert_eq!(none_found.to_string(), "no .java files found under '/src'");
        assert_eq!(
            none_matched.to_string(),
            "inspected 4 file(s) under '/src' but none implement Job"
        );
    }
}
