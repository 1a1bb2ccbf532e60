use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classifier::{Classifier, Finding};
use crate::discovery::{Candidate, CandidateOrigin, FileFilter};
use crate::error::IoError;

/// An archive harvested from a stop-descent directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JarFile {
    pub name: String,
    pub containing_dir: PathBuf,
    pub file_path: PathBuf,
    /// Filesystem modification time.
    pub last_modified: DateTime<Utc>,
}

impl Finding for JarFile {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn identity(&self) -> String {
        self.containing_dir.join(&self.name).display().to_string()
    }

    fn summary(&self) -> String {
        format!(
            "{}  {}  {}",
            self.last_modified.format("%Y-%m-%d %H:%M:%S"),
            self.name,
            self.containing_dir.display()
        )
    }
}

/// Matches by suffix only, and only for files harvested below the
/// stop-descent marker. Never opens the archive.
#[derive(Debug, Clone)]
pub struct JarClassifier {
    filter: FileFilter,
}

impl JarClassifier {
    pub fn new() -> Self {
        Self::with_extensions(["jar"])
    }

    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            filter: FileFilter::extensions(extensions),
        }
    }
}

impl Default for JarClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier for JarClassifier {
    type Finding = JarFile;

    fn accepts(&self, candidate: &Candidate) -> bool {
        candidate.is_harvested() && self.filter.matches(&candidate.path)
    }

    fn classify(&self, candidate: &Candidate) -> Result<Vec<JarFile>, IoError> {
        let path = &candidate.path;
        let metadata = fs::metadata(path).map_err(|e| IoError::metadata(path, e))?;
        let modified = metadata.modified().map_err(|e| IoError::metadata(path, e))?;

        let containing_dir = match &candidate.origin {
            CandidateOrigin::Harvested { marker_dir } => marker_dir.clone(),
            CandidateOrigin::Walked => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        Ok(vec![JarFile {
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            containing_dir,
            file_path: path.clone(),
            last_modified: DateTime::<Utc>::from(modified),
        }])
    }

    fn file_filter(&self) -> FileFilter {
        self.filter.clone()
    }

    fn match_description(&self) -> String {
        format!("are {} archives", self.filter.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_accepts_only_harvested_archives() {
        let classifier = JarClassifier::new();
        assert!(classifier.accepts(&Candidate::harvested("/p/target/app.jar", "/p/target")));
        assert!(!classifier.accepts(&Candidate::walked("/p/lib/app.jar")));
        assert!(!classifier.accepts(&Candidate::harvested("/p/target/app.war", "/p/target")));
    }

    #[test]
    fn test_classify_reads_modification_time() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target");
        fs::create_dir_all(&target).unwrap();
        let jar = target.join("app-1.0.jar");
        fs::write(&jar, b"PK").unwrap();

        let findings = JarClassifier::new()
            .classify(&Candidate::harvested(&jar, &target))
            .unwrap();

        assert_eq!(findings.len(), 1);
        let found = &findings[0];
        assert_eq!(found.name, "app-1.0.jar");
        assert_eq!(found.containing_dir, target);
        let expected: DateTime<Utc> = fs::metadata(&jar).unwrap().modified().unwrap().into();
        assert_eq!(found.last_modified, expected);
        assert_eq!(found.identity(), target.join("app-1.0.jar").display().to_string());
    }

    #[test]
    fn test_classify_missing_file_is_an_error() {
        let err = JarClassifier::new()
            .classify(&Candidate::harvested("/nonexistent/target/a.jar", "/nonexistent/target"))
            .unwrap_err();
        assert!(matches!(err, IoError::Metadata { .. }));
    }
}
