//! HTTP client for the drive `files` listing endpoint.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use serde::Deserialize;

use vitrine_core::catalog::DriveFile;

use crate::error::EnrichError;

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<RawFile>,
}

#[derive(Debug, Deserialize)]
struct RawFile {
    id: String,
    name: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
}

/// HTTP client for listing a drive folder's media children.
///
/// The API base is configurable so tests can point it at a local mock
/// server. Each listing is a single request with no retry and no pagination;
/// folders in scope hold at most a few dozen files.
pub struct DriveClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl DriveClient {
    /// Creates a `DriveClient` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        api_base: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Lists image/video children of `folder_id`, mapped to [`DriveFile`]
    /// records with computed preview/thumbnail/view URLs.
    ///
    /// # Errors
    ///
    /// - [`EnrichError::UnexpectedStatus`] — any non-2xx status.
    /// - [`EnrichError::Http`] — network or TLS failure.
    /// - [`EnrichError::Deserialize`] — response body is not the expected shape.
    pub async fn list_media(&self, folder_id: &str) -> Result<Vec<DriveFile>, EnrichError> {
        let query = format!(
            "'{folder_id}' in parents and (mimeType contains 'image/' or mimeType contains 'video/') and trashed=false"
        );
        let url = format!(
            "{}/files?q={}&fields=files(id,name,mimeType)&pageSize=1000&key={}",
            self.api_base,
            utf8_percent_encode(&query, NON_ALPHANUMERIC),
            self.api_key,
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::UnexpectedStatus {
                status: status.as_u16(),
                url: format!("{}/files", self.api_base),
            });
        }

        let body = response.text().await?;
        let listing: FileListResponse =
            serde_json::from_str(&body).map_err(|e| EnrichError::Deserialize {
                context: format!("drive folder {folder_id}"),
                source: e,
            })?;

        Ok(listing.files.into_iter().map(to_drive_file).collect())
    }
}

fn to_drive_file(raw: RawFile) -> DriveFile {
    DriveFile {
        thumbnail_url: format!("https://drive.google.com/thumbnail?id={}&sz=w400", raw.id),
        preview_url: format!("https://drive.google.com/thumbnail?id={}&sz=w1000", raw.id),
        view_url: format!("https://drive.google.com/file/d/{}/view", raw.id),
        id: raw.id,
        name: raw.name,
        mime_type: raw.mime_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_file_maps_to_computed_urls() {
        let file = to_drive_file(RawFile {
            id: "ABC123".to_string(),
            name: "front.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
        });
        assert_eq!(
            file.thumbnail_url,
            "https://drive.google.com/thumbnail?id=ABC123&sz=w400"
        );
        assert_eq!(
            file.view_url,
            "https://drive.google.com/file/d/ABC123/view"
        );
        assert_eq!(file.mime_type, "image/jpeg");
    }
}
