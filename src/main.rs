use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use tracing::info;

use tree_scanner::cli::{self, Command};
use tree_scanner::config::{default_action_log_path, load_settings};
use tree_scanner::logging::{self, Verbosity};
use tree_scanner::output::{write_sensitive_csv, OutputFormatter};
use tree_scanner::remediation::{annotate_all, annotate_pending, AnnotationSpec, BatchOutcome, JsonActionLog};
use tree_scanner::scanner::presets;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    logging::init(Verbosity::from_flags(args.verbose, args.quiet));
    args.validate().context("Invalid arguments")?;

    let mut settings = load_settings(args.config.as_deref()).context("Failed to load settings")?;
    args.apply_overrides(&mut settings);

    match &args.command {
        Command::Jars { root, format, .. } => {
            let report = presets::scan_jars(root, &settings)?.sort_by_modified_desc();
            print!("{}", OutputFormatter::format(&report, *format)?);
        }
        Command::Jobs {
            root,
            annotate_all: annotate,
            log,
            format,
            ..
        } => {
            let report = presets::scan_jobs(root, &settings)?;
            print!("{}", OutputFormatter::format(&report, *format)?);

            if *annotate {
                let log = JsonActionLog::new(log.clone().unwrap_or_else(default_action_log_path));
                let spec = AnnotationSpec::from_settings(&settings)
                    .context("Invalid annotation settings")?;
                let outcome = annotate_pending(&report, &spec, &log);
                report_batch(&outcome);
            }
        }
        Command::Sensitive {
            root,
            words,
            csv,
            format,
            ..
        } => {
            let report = presets::scan_sensitive(root, &settings, words)?;
            if let Some(csv_path) = csv {
                write_sensitive_csv(csv_path, report.records())
                    .with_context(|| format!("Failed to export {}", csv_path.display()))?;
                info!(path = %csv_path.display(), rows = report.total(), "csv written");
            }
            print!("{}", OutputFormatter::format(&report, *format)?);
        }
        Command::Annotate { files, log } => {
            let log = JsonActionLog::new(log.clone().unwrap_or_else(default_action_log_path));
            let spec =
                AnnotationSpec::from_settings(&settings).context("Invalid annotation settings")?;
            let outcome = annotate_all(files, &spec, &log);
            report_batch(&outcome);
            if outcome.succeeded == 0 && outcome.skipped == 0 && outcome.failed > 0 {
                anyhow::bail!("no file could be annotated");
            }
        }
    }

    Ok(())
}

fn report_batch(outcome: &BatchOutcome) {
    println!("{outcome}");
    for failure in &outcome.failures {
        eprintln!("failed {}: {}", failure.path.display(), failure.message);
    }
}
