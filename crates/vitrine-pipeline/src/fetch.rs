//! HTTP client for the CSV sources.
//!
//! Every remote call is attempted exactly once; there is no retry policy
//! anywhere in the pipeline. A failed source fetch is a hard error that
//! aborts the run.

use std::time::Duration;

use reqwest::Client;

use crate::error::PipelineError;

/// HTTP client for fetching CSV exports over HTTP(S).
pub struct SourceClient {
    client: Client,
}

impl SourceClient {
    /// Creates a `SourceClient` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches one CSV document as text.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::UnexpectedStatus`] — any non-2xx status.
    /// - [`PipelineError::Http`] — network or TLS failure.
    pub async fn fetch_csv(&self, url: &str) -> Result<String, PipelineError> {
        tracing::debug!(%url, "fetching CSV source");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        tracing::debug!(%url, bytes = body.len(), "CSV source fetched");
        Ok(body)
    }

    /// Fetches the brand and catalog CSVs concurrently, all-or-nothing.
    ///
    /// # Errors
    ///
    /// If either fetch fails the whole join fails and the run aborts; a
    /// partial source set would produce a misleading artifact.
    pub async fn fetch_sources(
        &self,
        brands_url: &str,
        catalog_url: &str,
    ) -> Result<(String, String), PipelineError> {
        tokio::try_join!(self.fetch_csv(brands_url), self.fetch_csv(catalog_url))
    }
}
