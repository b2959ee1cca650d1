//! Teamboard: open GitHub pull requests for you and your team.
//!
//! Searches five relevance categories (mentioned, review requested, authored
//! by teammates, team mentioned, team review requested) in a single GraphQL
//! round trip, then merges them into one de-duplicated list, newest first.

pub mod browser;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetch;
pub mod github;
pub mod output;

pub use error::{Error, Result};
pub use fetch::{
    aggregate, collect_pull_requests, dedupe, fetch_team_pulls, fetch_viewer_team_list,
    sort_newest_first,
};
