//! declutter - sort a directory's files into category folders
//!
//! This library classifies the top-level files of a directory by extension,
//! creates one subfolder per category, and moves each file into its folder,
//! renaming on collision instead of overwriting.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use config::{ConfigError, FailurePolicy, OrganizerConfig};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{OrganizeError, OrganizeReport, OrganizeResult, Organizer};

pub use cli::{Cli, run_cli};
