//! The three tools expressed as engine configurations.

use std::path::PathBuf;

use crate::classifier::{
    Classifier, JarClassifier, JarFile, JobClass, JobClassifier, SensitiveHit,
    SensitiveLogClassifier,
};
use crate::collector::ScanReport;
use crate::config::ScannerSettings;
use crate::error::Result;
use crate::scanner::{EmptyOutcome, ScanConfig, TreeScanner};

/// Archives directly inside every `target` (or configured marker)
/// directory. An empty result is valid.
pub fn jar_scan(root: impl Into<PathBuf>, settings: &ScannerSettings) -> (ScanConfig, JarClassifier) {
    let classifier = JarClassifier::with_extensions(&settings.jar_extensions);
    let config = ScanConfig::new(root)
        .exclude_dirs(settings.excluded_dirs.iter().cloned())
        .stop_descent(settings.stop_descent_marker.clone(), classifier.file_filter());
    (config, classifier)
}

/// Classes implementing the configured interface. Finding no source files,
/// or no implementing class, is an error.
pub fn job_scan(
    root: impl Into<PathBuf>,
    settings: &ScannerSettings,
) -> Result<(ScanConfig, JobClassifier)> {
    let classifier = JobClassifier::with_extensions(
        &settings.job_interface,
        &settings.job_annotation,
        &settings.job_extensions,
    )?;
    let config = ScanConfig::new(root)
        .exclude_dirs(settings.excluded_dirs.iter().cloned())
        .empty_outcome(EmptyOutcome::Reject);
    Ok((config, classifier))
}

/// Log statements mentioning any of `words` (falling back to the
/// configured list when `words` is empty).
pub fn sensitive_scan(
    root: impl Into<PathBuf>,
    settings: &ScannerSettings,
    words: &[String],
) -> (ScanConfig, SensitiveLogClassifier) {
    let words = if words.is_empty() {
        settings.sensitive_words.clone()
    } else {
        words.to_vec()
    };
    let classifier =
        SensitiveLogClassifier::new(words).with_extensions(&settings.sensitive_extensions);
    let config = ScanConfig::new(root).exclude_dirs(settings.excluded_dirs.iter().cloned());
    (config, classifier)
}

pub fn scan_jars(root: impl Into<PathBuf>, settings: &ScannerSettings) -> Result<ScanReport<JarFile>> {
    let (config, classifier) = jar_scan(root, settings);
    Ok(TreeScanner::new(classifier).scan(&config)?)
}

pub fn scan_jobs(root: impl Into<PathBuf>, settings: &ScannerSettings) -> Result<ScanReport<JobClass>> {
    let (config, classifier) = job_scan(root, settings)?;
    Ok(TreeScanner::new(classifier).scan(&config)?)
}

pub fn scan_sensitive(
    root: impl Into<PathBuf>,
    settings: &ScannerSettings,
    words: &[String],
) -> Result<ScanReport<SensitiveHit>> {
    let (config, classifier) = sensitive_scan(root, settings, words);
    Ok(TreeScanner::new(classifier).scan(&config)?)
}
