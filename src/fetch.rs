use std::collections::HashSet;
use std::time::Duration;

use crate::config::Settings;
use crate::error::Result;
use crate::github::{
    fetch_batch, fetch_team_members, fetch_viewer_login, fetch_viewer_teams, BatchResponse,
    Category, GraphqlTransport, PullRequest, SearchQueries, SearchResultItem, TeamSummary,
};

/// Flatten all category result sets into one list, visiting categories in
/// their fixed order. Absent nodes and non-PR items are skipped.
pub fn aggregate(response: &BatchResponse) -> Vec<PullRequest> {
    Category::ALL
        .iter()
        .flat_map(|category| response.get(*category).items())
        .filter_map(SearchResultItem::as_pull_request)
        .cloned()
        .collect()
}

/// Keep the first occurrence of each URL, preserving first-occurrence order.
pub fn dedupe(prs: Vec<PullRequest>) -> Vec<PullRequest> {
    let mut seen_urls = HashSet::new();
    prs.into_iter()
        .filter(|pr| seen_urls.insert(pr.url.clone()))
        .collect()
}

/// Most recently created first.
pub fn sort_newest_first(prs: &mut [PullRequest]) {
    prs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Aggregate, dedupe and sort one batch.
pub fn collect_pull_requests(response: &BatchResponse) -> Vec<PullRequest> {
    let all_prs = aggregate(response);
    let total = all_prs.len();

    let mut unique_prs = dedupe(all_prs);
    tracing::debug!(total, unique = unique_prs.len(), "deduplicated pull requests");

    sort_newest_first(&mut unique_prs);
    unique_prs
}

/// Fetch the viewer's and the team's open pull requests as one list.
///
/// Resolves the viewer login and team members, then issues a single batched
/// search. Any failure aborts the whole fetch; no partial list is returned.
pub async fn fetch_team_pulls(
    transport: &dyn GraphqlTransport,
    settings: &Settings,
) -> Result<Vec<PullRequest>> {
    let login = fetch_viewer_login(transport, settings.timeout).await?;
    let teammates =
        fetch_team_members(transport, &settings.org, &settings.team, settings.timeout).await?;
    tracing::debug!(%login, teammates = teammates.len(), "resolved viewer context");

    if teammates.is_empty() {
        tracing::warn!(
            org = %settings.org,
            team = %settings.team,
            "team has no members; team-authored search is skipped"
        );
    }

    let queries = SearchQueries::build(&login, &settings.org, &settings.team, &teammates);
    for category in Category::ALL {
        tracing::debug!(category = %category, query = queries.get(category), "search query");
    }

    let response = fetch_batch(transport, &queries, settings.page_size, settings.timeout).await?;
    Ok(collect_pull_requests(&response))
}

/// Teams in `org` the viewer belongs to, for picking a `--team` value.
pub async fn fetch_viewer_team_list(
    transport: &dyn GraphqlTransport,
    org: &str,
    deadline: Duration,
) -> Result<Vec<TeamSummary>> {
    let login = fetch_viewer_login(transport, deadline).await?;
    let teams = fetch_viewer_teams(transport, &login, org, deadline).await?;
    tracing::debug!(%login, %org, count = teams.len(), "resolved viewer teams");
    Ok(teams)
}
