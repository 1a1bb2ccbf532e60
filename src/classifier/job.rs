use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::classifier::{read_text, Classifier, Finding};
use crate::discovery::{Candidate, FileFilter};
use crate::error::{ConfigError, IoError};

pub const DEFAULT_JOB_INTERFACE: &str = "Job";
pub const DEFAULT_JOB_ANNOTATION: &str = "@DisallowConcurrentExecution";

/// A class whose declaration implements the marker interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobClass {
    /// File name without extension.
    pub class_name: String,
    pub class_path: PathBuf,
    pub has_annotation: bool,
}

impl Finding for JobClass {
    const TRACKS_REMEDIATION: bool = true;

    fn file_path(&self) -> &Path {
        &self.class_path
    }

    fn identity(&self) -> String {
        self.class_path.display().to_string()
    }

    fn needs_remediation(&self) -> bool {
        !self.has_annotation
    }

    fn summary(&self) -> String {
        let mark = if self.has_annotation { "ok     " } else { "MISSING" };
        format!("{mark}  {}  {}", self.class_name, self.class_path.display())
    }
}

/// Regex-level check for `class X [extends Y] implements [pkg.]Job`.
///
/// This is not a Java parser. Only the first interface after `implements`
/// is considered, so `implements Runnable, Job` is not detected.
#[derive(Debug, Clone)]
pub struct JobClassifier {
    filter: FileFilter,
    interface: String,
    annotation: String,
    pattern: Regex,
}

impl JobClassifier {
    pub fn new(interface: &str, annotation: &str) -> Result<Self, ConfigError> {
        Self::with_extensions(interface, annotation, ["java"])
    }

    pub fn with_extensions<I, S>(
        interface: &str,
        annotation: &str,
        extensions: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let interface = interface.trim();
        if interface.is_empty() {
            return Err(ConfigError::invalid_pattern(interface, "interface name is empty"));
        }

        let source = format!(
            r"\bclass\s+[\w$]+(?:\s*<[^{{]*?>)?(?:\s+extends\s+[\w$.]+(?:\s*<[^{{]*?>)?)?\s+implements\s+(?:[\w$]+\s*\.\s*)*{}\b",
            regex::escape(interface)
        );
        let pattern =
            Regex::new(&source).map_err(|e| ConfigError::invalid_pattern(&source, e.to_string()))?;

        Ok(Self {
            filter: FileFilter::extensions(extensions),
            interface: interface.to_string(),
            annotation: annotation.trim().to_string(),
            pattern,
        })
    }

    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    pub fn implements_interface(&self, source: &str) -> bool {
        self.pattern.is_match(source)
    }

    /// Zero-based line of the first class declaration implementing the
    /// interface. Lines are counted the way [`str::lines`] splits them.
    pub fn declaration_line(&self, source: &str) -> Option<usize> {
        let start = self.pattern.find(source)?.start();
        Some(source[..start].matches('\n').count())
    }

    /// Whether the annotation is attached to the implementing class: on its
    /// declaration line before `class`, or in the annotation and comment
    /// lines directly above it. Annotations on other classes in the same
    /// file do not count.
    pub fn is_annotated(&self, source: &str) -> bool {
        if self.annotation.is_empty() {
            return false;
        }
        let Some(found) = self.pattern.find(source) else {
            return false;
        };

        let line_start = source[..found.start()].rfind('\n').map_or(0, |idx| idx + 1);
        if source[line_start..found.start()].contains(&self.annotation) {
            return true;
        }
        source[..line_start]
            .lines()
            .rev()
            .take_while(|line| is_header_line(line))
            .any(|line| line.contains(&self.annotation))
    }

    pub fn inspect(&self, path: &Path, source: &str) -> Option<JobClass> {
        if !self.implements_interface(source) {
            return None;
        }

        Some(JobClass {
            class_name: path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            class_path: path.to_path_buf(),
            has_annotation: self.is_annotated(source),
        })
    }
}

/// Blank, annotation, or comment line that may sit between a class
/// declaration and its annotations.
fn is_header_line(line: &str) -> bool {
    let line = line.trim_start_matches('\u{feff}').trim();
    line.is_empty()
        || line.starts_with('@')
        || line.starts_with(')')
        || line.starts_with("//")
        || line.starts_with("/*")
        || line.starts_with('*')
}

impl Classifier for JobClassifier {
    type Finding = JobClass;

    fn accepts(&self, candidate: &Candidate) -> bool {
        self.filter.matches(&candidate.path)
    }

    fn classify(&self, candidate: &Candidate) -> Result<Vec<JobClass>, IoError> {
        let source = read_text(&candidate.path)?;
        Ok(self.inspect(&candidate.path, &source).into_iter().collect())
    }

    fn file_filter(&self) -> FileFilter {
        self.filter.clone()
    }

    fn match_description(&self) -> String {
        format!("implement {}", self.interface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classifier() -> JobClassifier {
        JobClassifier::new(DEFAULT_JOB_INTERFACE, DEFAULT_JOB_ANNOTATION).unwrap()
    }

    #[test]
    fn test_detects_simple_and_qualified_interface() {
        let c = classifier();
        assert!(c.implements_interface("public class Foo implements Job {"));
        assert!(c.implements_interface("public class Foo implements org.quartz.Job {"));
        assert!(c.implements_interface("class Foo\n    implements Job, Serializable {"));
    }

    #[test]
    fn test_detects_extends_with_implements() {
        let c = classifier();
        assert!(c.implements_interface(
            "public class Sync extends BaseTask<String> implements Job {"
        ));
        assert!(c.implements_interface("public final class A<T> extends com.x.B implements Job {"));
    }

    #[test]
    fn test_rejects_lookalikes() {
        let c = classifier();
        assert!(!c.implements_interface("public class Foo implements JobListener {"));
        assert!(!c.implements_interface("public class Foo extends Job {"));
        assert!(!c.implements_interface("public interface Job {"));
    }

    #[test]
    fn test_second_interface_is_a_known_limitation() {
        assert!(!classifier().implements_interface("public class Foo implements Runnable, Job {"));
    }

    #[test]
    fn test_inspect_builds_finding() {
        let source = "@DisallowConcurrentExecution\npublic class Foo implements Job {}";
        let found = classifier()
            .inspect(Path::new("/src/com/acme/Foo.java"), source)
            .unwrap();

        assert_eq!(
            found,
            JobClass {
                class_name: "Foo".to_string(),
                class_path: PathBuf::from("/src/com/acme/Foo.java"),
                has_annotation: true,
            }
        );
        assert!(!found.needs_remediation());
    }

    #[test]
    fn test_declaration_line_skips_helper_classes() {
        let source = "package a;\n\nclass Helper {}\n\npublic class Foo\n    implements Job {\n}\n";
        assert_eq!(classifier().declaration_line(source), Some(4));
        assert_eq!(classifier().declaration_line("class Helper {}"), None);
    }

    #[test]
    fn test_annotation_on_other_class_does_not_count() {
        let source = "\
@DisallowConcurrentExecution
class Helper {}

public class Foo implements Job {}
";
        assert!(!classifier().is_annotated(source));
        let found = classifier().inspect(Path::new("Foo.java"), source).unwrap();
        assert!(!found.has_annotation);
    }

    #[test]
    fn test_annotation_above_comments_and_other_annotations() {
        let c = classifier();
        assert!(c.is_annotated(
            "@DisallowConcurrentExecution\n@Component\n/** Syncs. */\npublic class Foo implements Job {}"
        ));
        assert!(c.is_annotated("@DisallowConcurrentExecution public class Foo implements Job {}"));
        assert!(!c.is_annotated("public class Foo implements Job {\n    @DisallowConcurrentExecution\n}"));
    }

    #[test]
    fn test_custom_interface_is_escaped() {
        let c = JobClassifier::new("Task$Runner", "@Once").unwrap();
        assert!(c.implements_interface("class A implements Task$Runner {"));
        assert!(!c.implements_interface("class A implements TaskXRunner {"));
    }

    #[test]
    fn test_empty_interface_is_rejected() {
        assert!(JobClassifier::new("  ", "@X").is_err());
    }
}
