//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.
//! Progress and results go to stdout; errors and warnings go to stderr.

use console::style;

use crate::domain::{ReleasePlan, ReleaseVersion};
use crate::warning::ReleaseWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().for_stderr(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a non-fatal release warning.
pub fn display_warning(warning: &ReleaseWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow().for_stderr(), warning);
}

pub fn display_current_version(version: &ReleaseVersion) {
    println!("\n{} {}", style("Current version:").bold(), style(version).cyan());
}

/// Show what a dry run would have done.
pub fn display_dry_run(bump_command: &str) {
    println!("\n{}", style("Dry run - no changes made").bold());
    println!("  Would run: {}", style(bump_command).cyan());
    println!("  Then commit, tag, and push after confirmation");
}

/// Summarise the local release before asking to push it.
///
/// # Arguments
/// * `plan` - Version, tag and messages of the release
/// * `signed` - Whether the tag carries a signature
/// * `remote` / `branch` - Where the release will be pushed
pub fn display_release_summary(plan: &ReleasePlan, signed: bool, remote: &str, branch: &str) {
    print!("{}", format_release_summary(plan, signed, remote, branch));
}

fn format_release_summary(plan: &ReleasePlan, signed: bool, remote: &str, branch: &str) -> String {
    format!(
        "\n{}\n  Commit: {}\n  Tag:    {} ({})\n  Push:   {} {} + {}\n",
        style("Release ready:").bold(),
        style(&plan.commit_message).green(),
        style(&plan.tag).green(),
        if signed { "signed" } else { "annotated" },
        remote,
        branch,
        plan.tag
    )
}

/// Print the commands that undo an unpublished local release.
pub fn display_cleanup_instructions(commands: &[String]) {
    print!("{}", format_cleanup_instructions(commands));
}

fn format_cleanup_instructions(commands: &[String]) -> String {
    let mut out = format!(
        "\n{} Release not pushed. The local commit and tag were kept; to undo them run:\n",
        style("→").yellow()
    );
    for command in commands {
        out.push_str(&format!("  {}\n", style(command).cyan()));
    }
    out
}

/// Report that a failed push was rolled back locally.
pub fn display_rollback(tag: &str) {
    eprintln!(
        "{} Rolled back local release commit and tag {}; the remote was not modified",
        style("↺").yellow().for_stderr(),
        tag
    );
}

/// Final report of a published release.
pub fn display_published(version: &ReleaseVersion, commit: &str, tag: &str) {
    println!(
        "\n{} Released {} (commit {}, tag {})\n",
        style("✓").green(),
        style(version).bold(),
        commit,
        tag
    );
}
