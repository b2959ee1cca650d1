//! Search connections and the `SearchResultItem` union.
//!
//! GitHub's search returns a union of node types. Only pull requests are
//! meaningful here, and anything else fails the decode instead of being
//! coerced into a pull request shape.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::github::types::PullRequest;

/// Wire name of the GraphQL type discriminator field.
pub const TYPENAME_FIELD: &str = "__typename";

const PULL_REQUEST_TYPENAME: &str = "PullRequest";

/// A decoded search node.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SearchResultItem {
    PullRequest(Box<PullRequest>),
}

impl SearchResultItem {
    /// Downcast to the pull request variant.
    pub fn as_pull_request(&self) -> Option<&PullRequest> {
        match self {
            SearchResultItem::PullRequest(pr) => Some(pr.as_ref()),
        }
    }

    /// Decode one raw node: peek the discriminator, then dispatch.
    pub fn from_value(raw: Value) -> Result<Self, String> {
        let typename = match raw.get(TYPENAME_FIELD) {
            None | Some(Value::Null) => "",
            Some(Value::String(name)) => name.as_str(),
            Some(other) => {
                return Err(format!("unexpected type discriminator value: {}", other));
            }
        };

        match typename {
            PULL_REQUEST_TYPENAME => serde_json::from_value::<PullRequest>(raw)
                .map(|pr| SearchResultItem::PullRequest(Box::new(pr)))
                .map_err(|e| format!("invalid PullRequest node: {}", e)),
            "" => Err("response missing required type discriminator".to_string()),
            other => Err(format!(
                "unexpected concrete type for SearchResultItem: \"{}\"",
                other
            )),
        }
    }
}

impl<'de> Deserialize<'de> for SearchResultItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        SearchResultItem::from_value(raw).map_err(de::Error::custom)
    }
}

/// An edge in a search connection. A `null` node decodes to `None`; an edge
/// without a `node` key is rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEdge {
    pub node: Option<SearchResultItem>,
}

#[derive(Deserialize)]
struct RawEdge {
    // Outer None: key absent. Inner None: explicit null.
    #[serde(default, deserialize_with = "present")]
    node: Option<Option<SearchResultItem>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl<'de> Deserialize<'de> for SearchEdge {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEdge::deserialize(deserializer)?;
        let node = raw.node.ok_or_else(|| de::Error::missing_field("node"))?;
        Ok(SearchEdge { node })
    }
}

/// One category's result set.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConnection {
    /// Total number of matches, which may exceed the edges returned.
    pub issue_count: u64,
    pub edges: Vec<SearchEdge>,
}

impl SearchConnection {
    /// Iterate over the nodes that are present, skipping `null` ones.
    pub fn items(&self) -> impl Iterator<Item = &SearchResultItem> {
        self.edges.iter().filter_map(|edge| edge.node.as_ref())
    }
}
