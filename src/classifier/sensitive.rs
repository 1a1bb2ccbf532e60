use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::classifier::patterns::LogPatternTable;
use crate::classifier::{read_text, Classifier, Finding};
use crate::discovery::{file_extension, Candidate, FileFilter};
use crate::error::IoError;

pub const DEFAULT_SENSITIVE_EXTENSIONS: &[&str] = &[
    "java", "jsp", "js", "jsx", "mjs", "cjs", "ts", "tsx", "vue", "py", "html", "htm", "xml",
    "properties", "yml", "yaml",
];

/// A log statement that mentions a sensitive word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitiveHit {
    pub file_path: PathBuf,
    /// Lowercased extension without the dot.
    pub file_type: String,
    /// 1-based.
    pub line_number: usize,
    /// Trimmed line text.
    pub line_content: String,
    pub matched_word: String,
}

impl Finding for SensitiveHit {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn identity(&self) -> String {
        format!("{}:{}", self.file_path.display(), self.line_number)
    }

    fn summary(&self) -> String {
        format!(
            "[{}] {}:{}  {}",
            self.matched_word,
            self.file_path.display(),
            self.line_number,
            self.line_content
        )
    }
}

#[derive(Debug, Clone)]
pub struct SensitiveLogClassifier {
    filter: FileFilter,
    words: Vec<String>,
    patterns: LogPatternTable,
}

impl SensitiveLogClassifier {
    /// Empty words are dropped; order is kept and decides attribution when a
    /// line contains several words.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter: FileFilter::extensions(DEFAULT_SENSITIVE_EXTENSIONS),
            words: words
                .into_iter()
                .map(Into::into)
                .filter(|w: &String| !w.is_empty())
                .collect(),
            patterns: LogPatternTable::default(),
        }
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter = FileFilter::extensions(extensions);
        self
    }

    pub fn with_patterns(mut self, patterns: LogPatternTable) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// At most one hit per line, attributed to the first configured word
    /// found in it. Only lines that look like log statements are checked.
    pub fn scan_source(&self, path: &Path, file_type: &str, source: &str) -> Vec<SensitiveHit> {
        if self.words.is_empty() {
            return Vec::new();
        }

        source
            .lines()
            .enumerate()
            .filter(|(_, line)| self.patterns.is_log_statement(file_type, line))
            .filter_map(|(idx, line)| {
                let word = self.words.iter().find(|w| line.contains(w.as_str()))?;
                Some(SensitiveHit {
                    file_path: path.to_path_buf(),
                    file_type: file_type.to_string(),
                    line_number: idx + 1,
                    line_content: line.trim().to_string(),
                    matched_word: word.clone(),
                })
            })
            .collect()
    }
}

impl Classifier for SensitiveLogClassifier {
    type Finding = SensitiveHit;

    fn accepts(&self, candidate: &Candidate) -> bool {
        self.filter.matches(&candidate.path)
    }

    fn classify(&self, candidate: &Candidate) -> Result<Vec<SensitiveHit>, IoError> {
        let source = read_text(&candidate.path)?;
        let file_type = file_extension(&candidate.path).unwrap_or_default();
        Ok(self.scan_source(&candidate.path, &file_type, &source))
    }

    fn file_filter(&self) -> FileFilter {
        self.filter.clone()
    }

    fn match_description(&self) -> String {
        "log sensitive words".to_string()
    }
}
