//! Merge log rendering
//!
//! The merge log is prepended to the main repository's README on the
//! integration branch, so visitors of the published branch see which PRs it
//! contains.

use crate::error::Result;
use crate::types::MergeOutcome;
use crate::vcs::{CommandOutput, VersionControl};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Documentation file the merge log is prepended to
pub const README_FILE: &str = "README.md";

const SEPARATOR: &str = "\n======\n\n";

const TABLE_HEADERS: [&str; 5] = ["PR", "Ref", "Commit", "Author", "Status"];

/// Commit message of the merge log commit
pub fn commit_message(bot_name: &str) -> String {
    format!("{bot_name} merge log")
}

/// Pipes would otherwise end the cell early
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Render outcomes as a markdown pipe table, in attempt order
pub fn render_merge_table(outcomes: &[MergeOutcome]) -> String {
    let rows: Vec<[String; 5]> = outcomes
        .iter()
        .map(|o| {
            [
                o.number.to_string(),
                escape_cell(&o.head_ref),
                format!("`{}`", o.head_commit),
                escape_cell(&o.author),
                o.status.to_string(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_row = |cells: [&str; 5]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                // PR numbers are right-aligned
                if i == 0 {
                    format!("{cell:>width$}")
                } else {
                    format!("{cell:<width$}")
                }
            })
            .collect();
        format!("| {} |", padded.join(" | "))
    };

    let alignment: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            if i == 0 {
                format!("{}:", "-".repeat(width + 1))
            } else {
                format!(":{}", "-".repeat(width + 1))
            }
        })
        .collect();

    let mut lines = vec![
        render_row(TABLE_HEADERS),
        format!("|{}|", alignment.join("|")),
    ];
    lines.extend(rows.iter().map(|row| render_row(row.each_ref().map(String::as_str))));
    lines.join("\n")
}

/// Compose the README content for the integration branch
///
/// The merge log comes first; `original` follows verbatim below a separator,
/// or a note says there was none.
pub fn render_report(bot_name: &str, outcomes: &[MergeOutcome], original: Option<&str>) -> String {
    let mut content = format!("# {bot_name} merge log\n\nScroll down for the original {README_FILE}!\n");
    content.push_str(SEPARATOR);
    content.push_str(&render_merge_table(outcomes));
    content.push('\n');

    match original {
        Some(text) => {
            content.push_str(&format!(
                "\nEnd of merge log. You can find the original {README_FILE} below the break.\n"
            ));
            content.push_str(SEPARATOR);
            content.push_str(text);
        }
        None => {
            content.push_str(&format!(
                "\nEnd of merge log. No original {README_FILE} existed.\n"
            ));
        }
    }

    content
}

/// Write the merge log into `repo` and commit it
///
/// Every failure here is logged and swallowed: the merges already exist on
/// the branch whether or not the log could be recorded. Returns whether the
/// log was committed.
pub async fn write_report(
    vcs: &dyn VersionControl,
    repo: &Path,
    bot_name: &str,
    outcomes: &[MergeOutcome],
) -> bool {
    let readme_path = repo.join(README_FILE);

    let original = match fs::read_to_string(&readme_path) {
        Ok(text) => Some(text),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %readme_path.display(), error = %e, "Could not read README.md, merge log not written");
            return false;
        }
    };

    let content = render_report(bot_name, outcomes, original.as_deref());
    if let Err(e) = fs::write(&readme_path, content) {
        warn!(path = %readme_path.display(), error = %e, "Could not write README.md");
        return false;
    }

    let staged = vcs.add(repo, README_FILE).await;
    if !succeeded("add", staged) {
        return false;
    }
    let committed = vcs.commit(repo, &commit_message(bot_name)).await;
    if !succeeded("commit", committed) {
        return false;
    }

    debug!("committed merge log");
    true
}

fn succeeded(step: &str, outcome: Result<CommandOutput>) -> bool {
    match outcome {
        Ok(output) if output.success() => true,
        Ok(output) => {
            warn!(step, reason = %output.failure_reason(), "Could not commit merge log");
            false
        }
        Err(e) => {
            warn!(step, error = %e, "Could not commit merge log");
            false
        }
    }
}
