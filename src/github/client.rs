use std::time::Duration;

use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Create an authenticated GitHub client using a personal access token
pub fn create_client(token: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|e| Error::Config(format!("Failed to create GitHub client: {}", e)))
}

/// Sends one GraphQL document and returns the raw JSON envelope.
///
/// Implementations must be shareable across concurrent pipeline runs.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn send_graphql(&self, payload: &Value) -> Result<Value>;
}

#[async_trait]
impl GraphqlTransport for Octocrab {
    async fn send_graphql(&self, payload: &Value) -> Result<Value> {
        let envelope: Value = self.graphql(payload).await?;
        Ok(envelope)
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
    #[serde(default)]
    path: Vec<Value>,
}

impl GraphqlError {
    fn describe(&self) -> String {
        if self.path.is_empty() {
            return self.message.clone();
        }
        let path: Vec<String> = self
            .path
            .iter()
            .map(|segment| match segment {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        format!("{} (at {})", self.message, path.join("."))
    }
}

/// Post `payload` under a deadline and return the envelope's `data`.
///
/// Any `errors` entry fails the call even when `data` is partially filled.
pub async fn execute(
    transport: &dyn GraphqlTransport,
    payload: &Value,
    deadline: Duration,
) -> Result<Value> {
    let raw = tokio::time::timeout(deadline, transport.send_graphql(payload))
        .await
        .map_err(|_| {
            Error::Transport(format!(
                "GraphQL request exceeded deadline of {}",
                humantime::format_duration(deadline)
            ))
        })??;

    unwrap_envelope(raw)
}

fn unwrap_envelope(raw: Value) -> Result<Value> {
    let envelope: Envelope = serde_json::from_value(raw)
        .map_err(|e| Error::Protocol(format!("malformed GraphQL envelope: {}", e)))?;

    if !envelope.errors.is_empty() {
        let messages: Vec<String> = envelope.errors.iter().map(GraphqlError::describe).collect();
        tracing::warn!(count = messages.len(), "GraphQL response carried errors");
        return Err(Error::Protocol(messages.join("; ")));
    }

    match envelope.data {
        Some(Value::Null) | None => Err(Error::Protocol(
            "GraphQL response contained no data".to_string(),
        )),
        Some(data) => Ok(data),
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_execute_returns_data() {
        let transport = ScriptedTransport::replying(json!({ "data": { "viewer": { "login": "me" } } }));

        let data = execute(&transport, &json!({}), Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(data["viewer"]["login"], "me");
        assert_eq!(transport.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_errors_array_fails_closed_despite_data() {
        let transport = ScriptedTransport::replying(json!({
            "data": { "viewer": { "login": "me" } },
            "errors": [
                { "message": "Something went wrong", "path": ["teamAuthored", 0] }
            ]
        }));

        let err = execute(&transport, &json!({}), Duration::from_secs(5))
            .await
            .unwrap_err();

        match err {
            Error::Protocol(msg) => {
                assert!(msg.contains("Something went wrong"));
                assert!(msg.contains("teamAuthored.0"));
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_data_is_protocol_error() {
        let transport = ScriptedTransport::replying(json!({ "data": null }));

        let err = execute(&transport, &json!({}), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Protocol(_)));
    }

    #[tokio::test]
    async fn test_non_object_envelope_is_protocol_error() {
        let transport = ScriptedTransport::replying(json!(["not", "an", "envelope"]));

        let err = execute(&transport, &json!({}), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Protocol(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport =
            ScriptedTransport::new(vec![Err(Error::Transport("connection refused".to_string()))]);

        let err = execute(&transport, &json!({}), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
    }

    struct StalledTransport;

    #[async_trait]
    impl GraphqlTransport for StalledTransport {
        async fn send_graphql(&self, _payload: &Value) -> Result<Value> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(json!({ "data": {} }))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_maps_to_transport_error() {
        let err = execute(&StalledTransport, &json!({}), Duration::from_millis(50))
            .await
            .unwrap_err();

        match err {
            Error::Transport(msg) => assert!(msg.contains("deadline")),
            other => panic!("expected transport error, got {:?}", other),
        }
    }
}
