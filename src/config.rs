//! Persisted settings and the file-backed store they live in.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::classifier::job::{DEFAULT_JOB_ANNOTATION, DEFAULT_JOB_INTERFACE};
use crate::classifier::sensitive::DEFAULT_SENSITIVE_EXTENSIONS;
use crate::error::ConfigError;

pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".svn",
    ".idea",
    ".vscode",
    "target",
    "build",
    "dist",
    "out",
    "__pycache__",
];

pub const DEFAULT_STOP_DESCENT_MARKER: &str = "target";

pub const DEFAULT_ANNOTATION_IMPORT: &str = "org.quartz.DisallowConcurrentExecution";

pub const DEFAULT_SENSITIVE_WORDS: &[&str] = &[
    "password", "passwd", "pwd", "secret", "token", "idCard", "mobile", "phone", "bankCard",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScannerSettings {
    pub excluded_dirs: Vec<String>,
    pub stop_descent_marker: String,
    pub jar_extensions: Vec<String>,
    pub job_extensions: Vec<String>,
    pub job_interface: String,
    pub job_annotation: String,
    pub job_annotation_import: String,
    pub sensitive_words: Vec<String>,
    pub sensitive_extensions: Vec<String>,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            excluded_dirs: to_strings(DEFAULT_EXCLUDED_DIRS),
            stop_descent_marker: DEFAULT_STOP_DESCENT_MARKER.to_string(),
            jar_extensions: vec!["jar".to_string()],
            job_extensions: vec!["java".to_string()],
            job_interface: DEFAULT_JOB_INTERFACE.to_string(),
            job_annotation: DEFAULT_JOB_ANNOTATION.to_string(),
            job_annotation_import: DEFAULT_ANNOTATION_IMPORT.to_string(),
            sensitive_words: to_strings(DEFAULT_SENSITIVE_WORDS),
            sensitive_extensions: to_strings(DEFAULT_SENSITIVE_EXTENSIONS),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Load/save seam for persisted state.
pub trait ConfigStore<T> {
    fn get(&self) -> Result<T, ConfigError>;

    fn save(&self, value: &T) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

/// JSON or YAML file (chosen by extension). A missing file reads as
/// `T::default()`. Saves go through a temporary file and a rename so a
/// crash never leaves a half-written file behind.
#[derive(Debug, Clone)]
pub struct FileStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Result<Format, ConfigError> {
        match self.path.extension().and_then(|e| e.to_str()) {
            None | Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some(other) => Err(ConfigError::unsupported_format(other)),
        }
    }
}

impl<T> ConfigStore<T> for FileStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn get(&self) -> Result<T, ConfigError> {
        let format = self.format()?;
        if !self.path.exists() {
            trace!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(T::default());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::read_error(&self.path, e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(T::default());
        }

        let value = match format {
            Format::Json => serde_json::from_str(&content)
                .map_err(|e| ConfigError::parse_error(&self.path, e.to_string()))?,
            Format::Yaml => serde_yaml::from_str(&content)
                .map_err(|e| ConfigError::parse_error(&self.path, e.to_string()))?,
        };
        debug!(path = %self.path.display(), "loaded settings");
        Ok(value)
    }

    fn save(&self, value: &T) -> Result<(), ConfigError> {
        let content = match self.format()? {
            Format::Json => serde_json::to_string_pretty(value)
                .map_err(|e| ConfigError::write_error(&self.path, e.to_string()))?,
            Format::Yaml => serde_yaml::to_string(value)
                .map_err(|e| ConfigError::write_error(&self.path, e.to_string()))?,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::write_error(parent, e.to_string()))?;
        }

        let mut tmp_os = self.path.as_os_str().to_os_string();
        tmp_os.push(".tmp");
        let tmp = PathBuf::from(tmp_os);

        fs::write(&tmp, content).map_err(|e| ConfigError::write_error(&tmp, e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| ConfigError::write_error(&self.path, e.to_string()))?;
        trace!(path = %self.path.display(), "saved settings");
        Ok(())
    }
}

/// `$HOME/.local/share/tree-scanner/action-log.json`, falling back to the
/// working directory when no home is set.
pub fn default_action_log_path() -> PathBuf {
    let file = "action-log.json";
    match std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        Some(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("tree-scanner")
            .join(file),
        None => PathBuf::from(file),
    }
}

pub fn load_settings(path: Option<&Path>) -> Result<ScannerSettings, ConfigError> {
    match path {
        Some(path) => FileStore::<ScannerSettings>::new(path).get(),
        None => Ok(ScannerSettings::default()),
    }
}
