//! Counter storage behind the pixel endpoint.
//!
//! Production uses a REST key-value service; tests and local development use
//! the in-memory store. Enum dispatch keeps the handler free of trait
//! objects.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from counter store")]
    UnexpectedStatus { status: u16 },
}

pub enum CounterStore {
    Memory(MemoryStore),
    Rest(RestStore),
}

impl CounterStore {
    /// Increment the counter at `key` and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on REST transport failures; the in-memory
    /// store never fails.
    pub async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        match self {
            CounterStore::Memory(store) => Ok(store.incr(key).await),
            CounterStore::Rest(store) => store.incr(key).await,
        }
    }
}

/// Process-local counters; contents vanish on restart.
#[derive(Default)]
pub struct MemoryStore {
    counts: Mutex<HashMap<String, u64>>,
}

impl MemoryStore {
    pub async fn incr(&self, key: &str) -> u64 {
        let mut counts = self.counts.lock().await;
        let entry = counts.entry(key.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }
}

#[derive(Debug, Deserialize)]
struct IncrResponse {
    result: u64,
}

/// REST key-value service client (`GET {base}/incr/{key}` with a bearer
/// token), the shape exposed by serverless KV providers.
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RestStore {
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, token: &str, timeout_secs: u64) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    async fn incr(&self, key: &str) -> Result<u64, StoreError> {
        let url = format!(
            "{}/incr/{}",
            self.base_url,
            utf8_percent_encode(key, NON_ALPHANUMERIC)
        );
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }
        let body: IncrResponse = response.json().await?;
        Ok(body.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_increments_per_key() {
        let store = MemoryStore::default();
        assert_eq!(store.incr("hits:2026-08-23:chanel:BAGS/Tote").await, 1);
        assert_eq!(store.incr("hits:2026-08-23:chanel:BAGS/Tote").await, 2);
        assert_eq!(store.incr("hits:2026-08-23:dior:BAGS/Tote").await, 1);
    }

    #[tokio::test]
    async fn rest_store_calls_incr_with_encoded_key() {
        use wiremock::matchers::{bearer_token, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/incr/hits%3Achanel%3Atote"))
            .and(bearer_token("secret"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"result": 7})),
            )
            .mount(&server)
            .await;

        let store = CounterStore::Rest(RestStore::new(&server.uri(), "secret", 5).unwrap());
        let value = store.incr("hits:chanel:tote").await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn rest_store_non_ok_status_is_an_error() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let store = CounterStore::Rest(RestStore::new(&server.uri(), "secret", 5).unwrap());
        let err = store.incr("hits:x").await.unwrap_err();
        assert!(matches!(err, StoreError::UnexpectedStatus { status: 503 }));
    }
}
