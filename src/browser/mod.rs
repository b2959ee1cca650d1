use anyhow::{Context, Result};

use crate::github::PullRequest;

/// Look up a PR by its 1-based position in the rendered list.
pub fn select_by_index(prs: &[PullRequest], index: usize) -> Result<&PullRequest> {
    if prs.is_empty() {
        anyhow::bail!("No pull requests to open.");
    }
    index
        .checked_sub(1)
        .and_then(|i| prs.get(i))
        .with_context(|| format!("Invalid index {}. Must be between 1 and {}.", index, prs.len()))
}

/// Open the PR at `index` (1-based) in the user's default browser
///
/// # Errors
/// Returns error if the index is out of range or the browser cannot be
/// opened (e.g., no browser available)
pub fn open_pull_request(prs: &[PullRequest], index: usize) -> Result<&PullRequest> {
    let pr = select_by_index(prs, index)?;
    webbrowser::open(&pr.url)
        .with_context(|| format!("Failed to open browser for URL: {}", pr.url))?;
    Ok(pr)
}
