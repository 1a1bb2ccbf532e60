use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::ScannerSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tree-scanner")]
#[command(
    about = "Tree scanner - find build archives, unguarded Quartz jobs and sensitive log statements",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Settings file (JSON or YAML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List archives sitting directly inside build output directories
    Jars {
        /// Directory to scan
        root: PathBuf,

        /// Directory name where recursion stops and archives are collected
        #[arg(long, value_name = "NAME")]
        marker: Option<String>,

        /// Additional directory name to skip. Can be specified multiple times.
        #[arg(long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,

        /// Output format (json, text)
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find classes implementing the job interface and report missing annotations
    Jobs {
        /// Directory to scan
        root: PathBuf,

        /// Interface name to look for
        #[arg(long, value_name = "NAME")]
        interface: Option<String>,

        /// Add the annotation to every class that lacks it
        #[arg(long)]
        annotate_all: bool,

        /// Action log file (defaults to the per-user log)
        #[arg(long, value_name = "FILE")]
        log: Option<PathBuf>,

        /// Additional directory name to skip. Can be specified multiple times.
        #[arg(long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,

        /// Output format (json, text)
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },

    /// Find log statements that mention sensitive words
    Sensitive {
        /// Directory to scan
        root: PathBuf,

        /// Sensitive word. Can be specified multiple times.
        #[arg(short = 'w', long = "word", value_name = "WORD")]
        words: Vec<String>,

        /// Restrict the scan to these file extensions
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,

        /// Also export the hits as CSV
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        /// Additional directory name to skip. Can be specified multiple times.
        #[arg(long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,

        /// Output format (json, text)
        #[arg(short = 'f', long, default_value = "text")]
        format: OutputFormat,
    },

    /// Add the annotation to the given source files
    Annotate {
        /// Java source files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Action log file (defaults to the per-user log)
        #[arg(long, value_name = "FILE")]
        log: Option<PathBuf>,
    },
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref config_path) = self.config {
            if !config_path.exists() {
                anyhow::bail!("Settings file does not exist: {}", config_path.display());
            }
        }
        if let Command::Annotate { files, .. } = &self.command {
            for file in files {
                validate_file(file)?;
            }
        }
        Ok(())
    }

    /// Folds command-line overrides into the loaded settings.
    pub fn apply_overrides(&self, settings: &mut ScannerSettings) {
        match &self.command {
            Command::Jars {
                marker, exclude, ..
            } => {
                if let Some(marker) = marker {
                    settings.stop_descent_marker = marker.clone();
                }
                settings.excluded_dirs.extend(exclude.iter().cloned());
            }
            Command::Jobs {
                interface, exclude, ..
            } => {
                if let Some(interface) = interface {
                    settings.job_interface = interface.clone();
                }
                settings.excluded_dirs.extend(exclude.iter().cloned());
            }
            Command::Sensitive {
                extensions,
                exclude,
                ..
            } => {
                if !extensions.is_empty() {
                    settings.sensitive_extensions = extensions.clone();
                }
                settings.excluded_dirs.extend(exclude.iter().cloned());
            }
            Command::Annotate { .. } => {}
        }
    }
}

pub fn validate_file(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Path is not a file: {}", path.display());
    }
    std::fs::metadata(path).with_context(|| format!("Cannot read file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("tree-scanner").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_output_format_as_str() {
        assert_eq!(OutputFormat::Json.as_str(), "json");
        assert_eq!(OutputFormat::Text.as_str(), "text");
    }

    #[test]
    fn test_parse_sensitive_with_words() {
        let args = parse(&["sensitive", "/src", "-w", "password", "--word", "token", "-f", "json"]);
        match args.command {
            Command::Sensitive { words, format, .. } => {
                assert_eq!(words, vec!["password".to_string(), "token".to_string()]);
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&["jars", "/src", "-vv", "--config", "s.yaml"]);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.config, Some(PathBuf::from("s.yaml")));
    }

    #[test]
    fn test_annotate_requires_files() {
        let result = Args::try_parse_from(["tree-scanner", "annotate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_overrides_for_jars() {
        let args = parse(&["jars", "/src", "--marker", "build", "--exclude", "vendor"]);
        let mut settings = ScannerSettings::default();

        args.apply_overrides(&mut settings);

        assert_eq!(settings.stop_descent_marker, "build");
        assert!(settings.excluded_dirs.contains(&"vendor".to_string()));
    }

    #[test]
    fn test_apply_overrides_for_sensitive_extensions() {
        let args = parse(&["sensitive", "/src", "--ext", "py"]);
        let mut settings = ScannerSettings::default();

        args.apply_overrides(&mut settings);

        assert_eq!(settings.sensitive_extensions, vec!["py".to_string()]);
    }

    #[test]
    fn test_validate_missing_config() {
        let args = parse(&["jars", "/src", "--config", "/definitely/missing.json"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_annotate_files() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("Foo.java");
        fs::write(&file, "class Foo implements Job {}").unwrap();

        let ok = parse(&["annotate", file.to_str().unwrap()]);
        assert!(ok.validate().is_ok());

        let missing = parse(&["annotate", "/definitely/Missing.java"]);
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_validate_file_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_file(temp_dir.path()).is_err());
    }
}
