use serde::{Deserialize, Serialize};

use crate::github::MAX_PAGE_SIZE;

pub const DEFAULT_TIMEOUT: &str = "30s";

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_timeout() -> String {
    DEFAULT_TIMEOUT.to_string()
}

/// On-disk configuration. `org` and `team` may come from the command line
/// instead.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub org: Option<String>,
    pub team: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Deadline for each GraphQL request, e.g. "30s" or "1m"
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            org: None,
            team: None,
            page_size: default_page_size(),
            timeout: default_timeout(),
        }
    }
}
