//! Output formatting and styling module.
//!
//! Everything the CLI prints to stdout goes through [`OutputFormatter`]. Log
//! lines are separate and go to stderr through `tracing`.

use crate::file_organizer::{FileFailure, OrganizeReport};
use colored::*;
use std::collections::HashMap;

/// Manages CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints the end-of-run report: a summary table, then any failures.
    pub fn report(report: &OrganizeReport) {
        if report.moved.is_empty() && report.failures.is_empty() {
            Self::success("Nothing to organize.");
            return;
        }

        if !report.moved.is_empty() {
            Self::summary_table(&report.category_counts(), report.moved.len());
        }

        if report.failures.is_empty() {
            Self::success("All files organized.");
        } else {
            Self::failure_list(&report.failures);
        }
    }

    /// Prints a summary table with file counts by category.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use declutter::output::OutputFormatter;
    /// use std::collections::HashMap;
    ///
    /// let mut counts = HashMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &HashMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let rows = summary_rows(category_counts);
        let width = rows
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &rows {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            file_word(total_files),
            width = width
        );
    }

    /// Prints the files that stayed in place and why.
    pub fn failure_list(failures: &[FileFailure]) {
        Self::warning(&format!(
            "{} {} could not be organized:",
            failures.len(),
            file_word(failures.len())
        ));
        for failure in failures {
            println!("  {} {}: {}", "✗".red(), failure.path.display(), failure.error);
        }
    }
}

/// Category rows sorted by name for stable output.
fn summary_rows(category_counts: &HashMap<String, usize>) -> Vec<(&str, usize)> {
    let mut rows: Vec<_> = category_counts
        .iter()
        .map(|(name, count)| (name.as_str(), *count))
        .collect();
    rows.sort_by_key(|&(name, _)| name);
    rows
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_rows_sorted() {
        let mut counts = HashMap::new();
        counts.insert("Videos".to_string(), 1);
        counts.insert("Audio".to_string(), 3);
        counts.insert("Images".to_string(), 2);

        assert_eq!(
            summary_rows(&counts),
            vec![("Audio", 3), ("Images", 2), ("Videos", 1)]
        );
    }

    #[test]
    fn test_file_word() {
        assert_eq!(file_word(0), "files");
        assert_eq!(file_word(1), "file");
        assert_eq!(file_word(2), "files");
    }
}
