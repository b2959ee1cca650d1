pub mod batch;
pub mod client;
pub mod query;
pub mod search;
pub mod types;
pub mod viewer;

pub use batch::{fetch_batch, BatchResponse, MAX_PAGE_SIZE};
pub use client::{create_client, GraphqlTransport};
pub use query::{Category, SearchQueries};
pub use search::{SearchConnection, SearchEdge, SearchResultItem};
pub use types::PullRequest;
pub use viewer::{
    fetch_team_members, fetch_viewer_login, fetch_viewer_orgs, fetch_viewer_teams, TeamSummary,
};
