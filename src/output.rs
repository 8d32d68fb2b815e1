//! Output formatting and styling module.
//!
//! Provides a centralized interface for all console output of a reorganization
//! run: banners, phase headers, per-entry progress lines, warnings and the final
//! summary. Names are printed exactly as they appear on disk.

use crate::reorganizer::RunReport;
use colored::*;

/// Width of the banner and phase separator lines.
pub const RULE_WIDTH: usize = 60;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Separator rules, banners and the run summary
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docs_reorganizer::output::OutputFormatter;
    /// OutputFormatter::success("Copied: intro.md → 02_البدء_السريع/");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header preceded by a blank line.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a separator line made of `ch`.
    pub fn rule(ch: char) {
        println!("{}", ch.to_string().repeat(RULE_WIDTH));
    }

    /// Prints the opening banner of a run.
    pub fn banner(title: &str) {
        Self::rule('=');
        println!("{}", title.bold());
        Self::rule('=');
    }

    /// Prints a phase header followed by a thin rule.
    pub fn phase(number: usize, title: &str) {
        Self::header(&format!("Phase {}: {}", number, title));
        Self::rule('-');
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints the closing summary of a run.
    pub fn summary(report: &RunReport) {
        println!();
        Self::rule('=');
        let operation_word = if report.operations == 1 {
            "operation"
        } else {
            "operations"
        };
        let line = format!(
            "Done! {} {} completed",
            report.operations.to_string().green().bold(),
            operation_word
        );
        if report.dry_run {
            println!("{} {}", line, "(dry run, nothing was written)".yellow());
        } else {
            println!("{}", line);
        }
        if !report.warnings.is_empty() {
            println!(
                "{} {} skipped",
                report.warnings.len().to_string().yellow(),
                if report.warnings.len() == 1 {
                    "entry"
                } else {
                    "entries"
                }
            );
        }
        Self::rule('=');
    }

    /// Prints the manual follow-up steps after a real run.
    pub fn next_steps() {
        Self::header("Next steps:");
        println!("1. Review the new folders");
        println!("2. Delete the old folders manually once verified");
        println!("3. Add a README file to each folder");
    }
}
