//! Log-statement heuristics keyed by file type.
//!
//! Each file type maps to an ordered list of patterns; a generic set is
//! tried for every type after the type-specific one. New languages are
//! added with [`LogPatternTable::register`] without touching the line scan.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::ConfigError;

const JAVA_PATTERNS: &[&str] = &[
    r"\b(?:log|logger|LOG|LOGGER|Log|Logger|logging)\s*\.\s*(?:trace|debug|info|warn|error|fatal)\s*\(",
    r"\bSystem\s*\.\s*(?:out|err)\s*\.\s*print(?:ln|f)?\s*\(",
    r"\.printStackTrace\s*\(",
];

const SCRIPT_PATTERNS: &[&str] = &[
    r"\bconsole\s*\.\s*(?:log|info|warn|error|debug|trace|dir)\s*\(",
    r"\b(?:logger|log|\$log)\s*\.\s*(?:trace|debug|info|warn|error)\s*\(",
];

const PYTHON_PATTERNS: &[&str] = &[
    r"\blogging\s*\.\s*(?:debug|info|warning|warn|error|critical|exception)\s*\(",
    r"\b(?:logger|log|_logger|LOGGER)\s*\.\s*(?:debug|info|warning|warn|error|critical|exception)\s*\(",
    r"\bprint\s*\(",
];

const GENERIC_PATTERNS: &[&str] = &[
    r"(?i)\b\w*log(?:ger)?\s*\.\s*(?:trace|debug|info|warn|warning|error|fatal|log)\s*\(",
    r"(?i)\blog\s*\(",
];

const JAVA_TYPES: &[&str] = &["java", "jsp"];
const SCRIPT_TYPES: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "vue"];
const PYTHON_TYPES: &[&str] = &["py"];

static DEFAULT_TABLE: LazyLock<LogPatternTable> = LazyLock::new(LogPatternTable::build_default);

#[derive(Debug, Clone)]
pub struct LogPatternTable {
    by_type: HashMap<String, Vec<Regex>>,
    generic: Vec<Regex>,
}

impl LogPatternTable {
    pub fn empty() -> Self {
        Self {
            by_type: HashMap::new(),
            generic: Vec::new(),
        }
    }

    fn build_default() -> Self {
        let java = compile_static(JAVA_PATTERNS);
        let script = compile_static(SCRIPT_PATTERNS);
        let python = compile_static(PYTHON_PATTERNS);

        let mut by_type = HashMap::new();
        for (types, patterns) in [
            (JAVA_TYPES, &java),
            (SCRIPT_TYPES, &script),
            (PYTHON_TYPES, &python),
        ] {
            for file_type in types {
                by_type.insert(file_type.to_string(), patterns.clone());
            }
        }

        Self {
            by_type,
            generic: compile_static(GENERIC_PATTERNS),
        }
    }

    /// Appends patterns for `file_type` (extension without the dot).
    pub fn register(&mut self, file_type: &str, patterns: &[&str]) -> Result<(), ConfigError> {
        let compiled = compile(patterns)?;
        self.by_type
            .entry(file_type.trim_start_matches('.').to_ascii_lowercase())
            .or_default()
            .extend(compiled);
        Ok(())
    }

    pub fn register_generic(&mut self, patterns: &[&str]) -> Result<(), ConfigError> {
        self.generic.extend(compile(patterns)?);
        Ok(())
    }

    pub fn is_log_statement(&self, file_type: &str, line: &str) -> bool {
        self.by_type
            .get(file_type)
            .into_iter()
            .flatten()
            .chain(self.generic.iter())
            .any(|re| re.is_match(line))
    }
}

impl Default for LogPatternTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(|e| ConfigError::invalid_pattern(*p, e.to_string())))
        .collect()
}

// Built-in patterns are constants covered by tests.
fn compile_static(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}
