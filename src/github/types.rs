use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Login shown for pull requests whose author account no longer exists.
pub const GHOST_LOGIN: &str = "ghost";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub author: Option<Author>,
    pub repository: Repository,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
    pub url: String,                // unique key across categories
    pub changed_files: u64,
    pub additions: u64,             // Lines added
    pub deletions: u64,             // Lines deleted
    pub is_draft: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Author {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name_with_owner: String,    // "owner/repo" format
}

impl PullRequest {
    /// Calculate PR age from creation time
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.created_at
    }

    /// Calculate total size (additions + deletions)
    pub fn size(&self) -> u64 {
        self.additions + self.deletions
    }

    pub fn author_login(&self) -> &str {
        self.author
            .as_ref()
            .map_or(GHOST_LOGIN, |author| author.login.as_str())
    }

    /// Return a short reference in the format "owner/repo#123"
    pub fn short_ref(&self) -> String {
        format!("{}#{}", self.repository.name_with_owner, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_open_pull_request() {
        let pr: PullRequest = serde_json::from_value(json!({
            "number": 42,
            "title": "Add team board",
            "author": { "login": "octocat" },
            "repository": { "nameWithOwner": "acme/widgets" },
            "createdAt": "2024-03-01T10:00:00Z",
            "mergedAt": null,
            "url": "https://github.com/acme/widgets/pull/42",
            "changedFiles": 3,
            "additions": 120,
            "deletions": 7,
            "isDraft": false
        }))
        .unwrap();

        assert_eq!(pr.number, 42);
        assert_eq!(pr.author_login(), "octocat");
        assert_eq!(pr.short_ref(), "acme/widgets#42");
        assert_eq!(pr.size(), 127);
        assert!(pr.merged_at.is_none());
    }

    #[test]
    fn test_missing_author_is_ghost() {
        let pr: PullRequest = serde_json::from_value(json!({
            "number": 1,
            "title": "Orphaned",
            "author": null,
            "repository": { "nameWithOwner": "acme/widgets" },
            "createdAt": "2024-03-01T10:00:00Z",
            "mergedAt": null,
            "url": "https://github.com/acme/widgets/pull/1",
            "changedFiles": 0,
            "additions": 0,
            "deletions": 0,
            "isDraft": true
        }))
        .unwrap();

        assert_eq!(pr.author_login(), GHOST_LOGIN);
    }
}
