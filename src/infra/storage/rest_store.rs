// Managed key-value store reached over a Redis-over-REST API.
//
// The API shape is the common serverless one:
// - GET  {base}/get/{key}  -> {"result": "<string>" | null}
// - POST {base}/set/{key}  (body = value) -> {"result": "OK"}
// - POST {base}/del/{key}  -> {"result": <number>}
//
// Values are stored as JSON text so any document shape round-trips.

use crate::core::storage::{KeyValueStore, StoreError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RestResponse {
    result: Option<Value>,
    error: Option<String>,
}

pub struct RestKvStore {
    client: Client,
    base_url: String,
}

fn unavailable(e: impl std::fmt::Display) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

impl RestKvStore {
    pub fn new(base_url: &str, token: &str) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| StoreError::Backend(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, command: &str, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, command, key)
    }

    async fn read_response(response: reqwest::Response) -> Result<Option<Value>, StoreError> {
        let status = response.status();
        let body: RestResponse = response.json().await.map_err(unavailable)?;

        if let Some(error) = body.error {
            return Err(StoreError::Unavailable(format!("{}: {}", status, error)));
        }
        if !status.is_success() {
            return Err(StoreError::Unavailable(format!(
                "unexpected status {}",
                status
            )));
        }
        Ok(body.result)
    }
}

#[async_trait]
impl KeyValueStore for RestKvStore {
    fn name(&self) -> &'static str {
        "rest-kv"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let response = self
            .client
            .get(self.url("get", key))
            .send()
            .await
            .map_err(unavailable)?;

        match Self::read_response(response).await? {
            Some(Value::String(text)) => Ok(Some(serde_json::from_str(&text)?)),
            Some(Value::Null) | None => Ok(None),
            Some(other) => Err(StoreError::Backend(format!(
                "unexpected value type for key {}: {}",
                key, other
            ))),
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let text = serde_json::to_string(&value)?;
        let response = self
            .client
            .post(self.url("set", key))
            .body(text)
            .send()
            .await
            .map_err(unavailable)?;

        Self::read_response(response).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.url("del", key))
            .send()
            .await
            .map_err(unavailable)?;

        Self::read_response(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_are_built_from_base() {
        let store = RestKvStore::new("https://kv.example.com/", "token").unwrap();
        assert_eq!(
            store.url("get", "likes:sunset"),
            "https://kv.example.com/get/likes:sunset"
        );
    }

    #[test]
    fn test_token_must_be_a_valid_header() {
        assert!(RestKvStore::new("https://kv.example.com", "bad\ntoken").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unavailable() {
        // Nothing listens on port 9 (discard) locally
        let store = RestKvStore::new("http://127.0.0.1:9", "token").unwrap();

        let err = store.get("anything").await.unwrap_err();

        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
