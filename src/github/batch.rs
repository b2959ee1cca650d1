//! One GraphQL round trip carrying all five category searches.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::github::client::{execute, GraphqlTransport};
use crate::github::query::{Category, SearchQueries};
use crate::github::search::SearchConnection;

/// GitHub caps `first` on search connections at 100.
pub const MAX_PAGE_SIZE: u32 = 100;

const SEARCH_RESULTS_FRAGMENT: &str = r#"
fragment SearchResults on SearchResultItemConnection {
    issueCount
    edges {
        node {
            __typename
            ... on PullRequest {
                number
                title
                author {
                    login
                }
                repository {
                    nameWithOwner
                }
                createdAt
                mergedAt
                url
                changedFiles
                additions
                deletions
                isDraft
            }
        }
    }
}
"#;

/// Per-category result sets from one batch.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub mentioned: SearchConnection,
    pub review_requested: SearchConnection,
    pub team_authored: SearchConnection,
    pub team_mentioned: SearchConnection,
    pub team_review_requested: SearchConnection,
}

impl BatchResponse {
    pub fn get(&self, category: Category) -> &SearchConnection {
        match category {
            Category::Mentioned => &self.mentioned,
            Category::ReviewRequested => &self.review_requested,
            Category::TeamAuthored => &self.team_authored,
            Category::TeamMentioned => &self.team_mentioned,
            Category::TeamReviewRequested => &self.team_review_requested,
        }
    }
}

fn limit_variable(category: Category) -> String {
    format!("{}First", category.alias())
}

/// Build the aliased batch document.
pub fn batch_document() -> String {
    let params: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("${}: String!, ${}: Int!", c.alias(), limit_variable(*c)))
        .collect();

    let searches: Vec<String> = Category::ALL
        .iter()
        .map(|c| {
            format!(
                "    {alias}: search(query: ${alias}, type: ISSUE, first: ${limit}) {{\n        ...SearchResults\n    }}",
                alias = c.alias(),
                limit = limit_variable(*c)
            )
        })
        .collect();

    format!(
        "query TeamBoard({}) {{\n{}\n}}\n{}",
        params.join(", "),
        searches.join("\n"),
        SEARCH_RESULTS_FRAGMENT
    )
}

/// Build the request payload: document plus one query string and one limit
/// per category.
pub fn create_batch_payload(queries: &SearchQueries, page_size: u32) -> Value {
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    let mut variables = Map::new();
    for category in Category::ALL {
        variables.insert(
            category.alias().to_string(),
            Value::String(queries.get(category).to_string()),
        );
        variables.insert(
            limit_variable(category),
            Value::from(queries.limit(category, page_size)),
        );
    }

    serde_json::json!({
        "query": batch_document(),
        "variables": variables,
    })
}

/// Issue the batch and decode all five result sets.
///
/// Any GraphQL error or undecodable item fails the whole batch.
pub async fn fetch_batch(
    transport: &dyn GraphqlTransport,
    queries: &SearchQueries,
    page_size: u32,
    deadline: Duration,
) -> Result<BatchResponse> {
    let payload = create_batch_payload(queries, page_size);
    let data = execute(transport, &payload, deadline).await?;

    let response: BatchResponse = serde_json::from_value(data)
        .map_err(|e| Error::Decode(format!("Unable to decode search results: {}", e)))?;

    for category in Category::ALL {
        let conn = response.get(category);
        tracing::debug!(
            category = %category,
            returned = conn.edges.len(),
            total = conn.issue_count,
            "search results"
        );
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::client::testing::ScriptedTransport;
    use serde_json::json;

    fn pr_node(number: u64, created_at: &str) -> Value {
        json!({
            "__typename": "PullRequest",
            "number": number,
            "title": format!("PR #{}", number),
            "author": { "login": "alice" },
            "repository": { "nameWithOwner": "acme/widgets" },
            "createdAt": created_at,
            "mergedAt": null,
            "url": format!("https://github.com/acme/widgets/pull/{}", number),
            "changedFiles": 1,
            "additions": 10,
            "deletions": 2,
            "isDraft": false
        })
    }

    fn connection(nodes: Vec<Value>) -> Value {
        let edges: Vec<Value> = nodes.into_iter().map(|n| json!({ "node": n })).collect();
        json!({ "issueCount": edges.len(), "edges": edges })
    }

    fn queries() -> SearchQueries {
        SearchQueries::build("me", "acme", "core", &["alice".to_string()])
    }

    #[test]
    fn test_document_declares_every_alias() {
        let doc = batch_document();
        for category in Category::ALL {
            assert!(doc.contains(&format!("{}: search(query: ${}", category.alias(), category.alias())));
            assert!(doc.contains(&format!("${}First: Int!", category.alias())));
        }
        assert!(doc.contains("fragment SearchResults on SearchResultItemConnection"));
    }

    #[test]
    fn test_payload_variables() {
        let payload = create_batch_payload(&queries(), 250);
        let vars = &payload["variables"];

        assert_eq!(vars["reviewRequested"], queries().review_requested.as_str());
        assert_eq!(vars["teamAuthoredFirst"], 100);
        assert_eq!(vars["mentionedFirst"], 100);
    }

    #[test]
    fn test_payload_without_teammates_requests_nothing_for_team_authored() {
        let queries = SearchQueries::build("me", "acme", "core", &[]);
        let payload = create_batch_payload(&queries, 50);

        assert_eq!(payload["variables"]["teamAuthoredFirst"], 0);
        assert_eq!(payload["variables"]["teamMentionedFirst"], 50);
    }

    #[tokio::test]
    async fn test_fetch_batch_single_round_trip() {
        let transport = ScriptedTransport::replying(json!({
            "data": {
                "mentioned": connection(vec![pr_node(1, "2024-03-02T00:00:00Z")]),
                "reviewRequested": connection(vec![]),
                "teamAuthored": connection(vec![pr_node(1, "2024-03-02T00:00:00Z")]),
                "teamMentioned": connection(vec![]),
                "teamReviewRequested": connection(vec![json!(null)])
            }
        }));

        let response = fetch_batch(&transport, &queries(), 100, Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(transport.sent_count(), 1);
        assert_eq!(response.mentioned.edges.len(), 1);
        assert_eq!(response.team_authored.issue_count, 1);
        assert!(response.team_review_requested.edges[0].node.is_none());
    }

    #[tokio::test]
    async fn test_fetch_batch_unknown_typename_is_decode_error() {
        let transport = ScriptedTransport::replying(json!({
            "data": {
                "mentioned": connection(vec![json!({ "__typename": "Issue", "number": 5 })]),
                "reviewRequested": connection(vec![]),
                "teamAuthored": connection(vec![]),
                "teamMentioned": connection(vec![]),
                "teamReviewRequested": connection(vec![])
            }
        }));

        let err = fetch_batch(&transport, &queries(), 100, Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            Error::Decode(msg) => assert!(msg.contains("Issue")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_batch_missing_category_is_decode_error() {
        let transport = ScriptedTransport::replying(json!({
            "data": {
                "mentioned": connection(vec![]),
                "reviewRequested": connection(vec![]),
                "teamAuthored": connection(vec![]),
                "teamMentioned": connection(vec![])
            }
        }));

        let err = fetch_batch(&transport, &queries(), 100, Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_batch_edge_without_node_is_decode_error() {
        let transport = ScriptedTransport::replying(json!({
            "data": {
                "mentioned": connection(vec![]),
                "reviewRequested": { "issueCount": 1, "edges": [ {} ] },
                "teamAuthored": connection(vec![]),
                "teamMentioned": connection(vec![]),
                "teamReviewRequested": connection(vec![])
            }
        }));

        let err = fetch_batch(&transport, &queries(), 100, Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            Error::Decode(msg) => assert!(msg.contains("node"), "got: {}", msg),
            other => panic!("expected decode error, got {:?}", other),
        }
    }
}
