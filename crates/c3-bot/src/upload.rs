//! Attachment download for picture uploads

use crate::command::Attachment;
use async_trait::async_trait;

/// Errors downloading an attachment
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Request failed before a response arrived, or the body broke off
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("fetching {url} returned status {status}")]
    Status { url: String, status: u16 },
}

impl FetchError {
    /// Create status error
    #[inline]
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }
}

/// Downloads the bytes of a message attachment
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    /// Download `attachment` fully into memory
    async fn fetch(&self, attachment: &Attachment) -> Result<Vec<u8>, FetchError>;
}

/// [`AttachmentFetcher`] over HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create fetcher with a default client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create fetcher sharing an existing client
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AttachmentFetcher for HttpFetcher {
    async fn fetch(&self, attachment: &Attachment) -> Result<Vec<u8>, FetchError> {
        let url = attachment.url.as_str();
        let http = |source: reqwest::Error| FetchError::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(http)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(url, status.as_u16()));
        }

        let body = response.bytes().await.map_err(http)?;
        tracing::debug!(%url, bytes = body.len(), "attachment downloaded");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message() {
        let err = FetchError::status("http://cdn/a.png", 404);
        assert_eq!(err.to_string(), "fetching http://cdn/a.png returned status 404");
    }

    #[tokio::test]
    async fn unreachable_url_is_http_error() {
        let fetcher = HttpFetcher::new();
        let attachment = Attachment {
            filename: "a.png".to_string(),
            url: "http://127.0.0.1:1/a.png".to_string(),
            content_type: None,
        };
        let err = fetcher.fetch(&attachment).await.unwrap_err();
        assert!(matches!(err, FetchError::Http { .. }));
    }
}
