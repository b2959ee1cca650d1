use std::io::IsTerminal;
use chrono::Duration;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::github::types::PullRequest;

const EMPTY_LIST: &str = "No pull requests found.";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn format_size(pr: &PullRequest) -> String {
    format!("+{}/-{}", pr.additions, pr.deletions)
}

/// Format PRs as a table with columns: Index, Age, Ref, Title, Author, Size
/// No headers. Drafts are marked with a trailing "[draft]".
pub fn format_pr_table(prs: &[PullRequest], use_colors: bool) -> String {
    format_pr_table_with_width(prs, use_colors, get_terminal_width())
}

fn format_pr_table_with_width(
    prs: &[PullRequest],
    use_colors: bool,
    term_width: Option<usize>,
) -> String {
    if prs.is_empty() {
        return EMPTY_LIST.to_string();
    }

    let separator = "  ";
    let ref_width = prs.iter().map(|pr| pr.short_ref().len()).max().unwrap_or(0);

    prs.iter()
        .enumerate()
        .map(|(idx, pr)| {
            // 1-based index, right-aligned with trailing dot
            let index_str = format!("{:>2}.", idx + 1);
            let age_str = format!("{:>4}", format_age(pr.age()));
            let ref_str = format!("{:<width$}", pr.short_ref(), width = ref_width);
            let tail = format!(
                "{}{}{}{}",
                separator,
                pr.author_login(),
                separator,
                format_size(pr)
            );
            let draft = if pr.is_draft { " [draft]" } else { "" };

            let fixed_width = index_str.len()
                + 1
                + age_str.len()
                + separator.len() * 2
                + ref_str.len()
                + tail.len()
                + draft.len();

            let title = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_title(&pr.title, width - fixed_width)
                }
                // Very narrow terminal, show truncated
                Some(_) => truncate_title(&pr.title, 20),
                // No terminal (pipe), don't truncate
                None => pr.title.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    age_str.dimmed(),
                    separator,
                    ref_str.cyan(),
                    separator,
                    title.bold(),
                    separator,
                    pr.author_login().yellow(),
                    separator,
                    format_size(pr),
                ) + &draft.dimmed().to_string()
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, age_str, separator, ref_str, separator, title, tail, draft
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a single PR with detailed multi-line output (for verbose mode)
pub fn format_pr_detail(pr: &PullRequest, use_colors: bool) -> String {
    let age = format_age(pr.age());
    let total_size = pr.size();
    let draft = if pr.is_draft { " (draft)" } else { "" };

    if use_colors {
        format!(
            "{}{}\n  Repo: {}\n  Author: {}\n  Age: {}\n  Size: +{}/{} ({} lines, {} files)\n  URL: {}",
            pr.title.bold(),
            draft.dimmed(),
            pr.repository.name_with_owner.cyan(),
            pr.author_login().yellow(),
            age,
            pr.additions.green(),
            pr.deletions.red(),
            total_size,
            pr.changed_files,
            pr.url.underline()
        )
    } else {
        format!(
            "{}{}\n  Repo: {}\n  Author: {}\n  Age: {}\n  Size: +{}/{} ({} lines, {} files)\n  URL: {}",
            pr.title,
            draft,
            pr.repository.name_with_owner,
            pr.author_login(),
            age,
            pr.additions,
            pr.deletions,
            total_size,
            pr.changed_files,
            pr.url
        )
    }
}

/// Format PRs with `format_pr_detail`, separated by blank lines
pub fn format_pr_details(prs: &[PullRequest], use_colors: bool) -> String {
    if prs.is_empty() {
        return EMPTY_LIST.to_string();
    }

    prs.iter()
        .map(|pr| format_pr_detail(pr, use_colors))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Format PRs as tab-separated values for scripting
/// Columns: created_at, repo, number, author, title, url (no headers, no colors)
pub fn format_tsv(prs: &[PullRequest]) -> String {
    if prs.is_empty() {
        return String::new();
    }

    prs.iter()
        .map(|pr| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                pr.created_at.to_rfc3339(),
                pr.repository.name_with_owner,
                pr.number,
                pr.author_login(),
                pr.title,
                pr.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
