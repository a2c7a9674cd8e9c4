//! Command-line interface module for declutter.
//!
//! Running `declutter` with no arguments organizes the built-in target
//! directory. Errors never escape this layer: they are logged once and the
//! process still exits normally.

use crate::config::{FailurePolicy, OrganizerConfig, default_target_dir};
use crate::file_organizer::{OrganizeResult, OrganizeReport, Organizer};
use crate::output::OutputFormatter;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

/// Sort the files of a directory into per-category subfolders.
#[derive(Debug, Clone, Parser)]
#[command(name = "declutter", version, about)]
pub struct Cli {
    /// Directory to organize. Defaults to the built-in target directory.
    pub directory: Option<PathBuf>,

    /// Keep going when a file cannot be moved, and list failures at the end.
    #[arg(long)]
    pub keep_going: bool,
}

impl Cli {
    /// Builds the organizer configuration these arguments describe.
    pub fn config(&self) -> OrganizerConfig {
        let target_dir = self.directory.clone().unwrap_or_else(default_target_dir);
        let policy = if self.keep_going {
            FailurePolicy::Continue
        } else {
            FailurePolicy::Abort
        };
        OrganizerConfig::new(target_dir).with_failure_policy(policy)
    }
}

/// Organizes the directory described by `config`.
///
/// # Examples
///
/// ```no_run
/// use declutter::cli::organize_directory;
/// use declutter::OrganizerConfig;
///
/// let report = organize_directory(OrganizerConfig::new("/path/to/directory"))?;
/// println!("Moved {} files", report.moved.len());
/// # Ok::<(), declutter::OrganizeError>(())
/// ```
pub fn organize_directory(config: OrganizerConfig) -> OrganizeResult<OrganizeReport> {
    info!("Organizing {}", config.target_dir.display());
    Organizer::new(config)?.organize()
}

/// Runs the CLI: organizes, prints the summary, and logs any failure.
pub fn run_cli(cli: &Cli) {
    match organize_directory(cli.config()) {
        Ok(report) => {
            if !report.is_complete_success() {
                error!(
                    "{} of {} files could not be moved",
                    report.failures.len(),
                    report.failures.len() + report.moved.len()
                );
            }
            OutputFormatter::report(&report);
        }
        Err(e) => error!("An error occurred: {}", e),
    }
}
