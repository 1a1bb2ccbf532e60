/// Tree Scanner
///
/// Walks a directory tree once, hands each candidate file to a pluggable
/// classifier and collects the findings in discovery order. Three
/// classifiers ship with the crate: build archives under `target`
/// directories, Quartz job classes missing their concurrency guard, and log
/// statements that mention sensitive words.
pub mod classifier;
pub mod cli;
pub mod collector;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod output;
pub mod remediation;
pub mod scanner;

pub use classifier::{Classifier, Finding};
pub use collector::{Discovered, ScanReport};
pub use error::{Error, Result};
pub use scanner::{scan, EmptyOutcome, ScanConfig, TreeScanner};
