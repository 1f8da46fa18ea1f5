pub mod model;
pub mod reader;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use tracing::instrument;

pub use model::{ExtractedText, normalize_whitespace};

use crate::fetcher::{FetchError, fetch};

/// Turns an HTML document into raw and normalized text. Never fails.
pub fn extract_text(html: &str) -> ExtractedText {
    ExtractedText::from_raw(reader::raw_text(html))
}

/// Fetches a URL and reduces it to text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractedText, FetchError>;
}

/// `ContentExtractor` backed by the shared HTTP client.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpContentExtractor;

impl HttpContentExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentExtractor for HttpContentExtractor {
    #[instrument(skip(self))]
    async fn extract(&self, url: &str) -> Result<ExtractedText, FetchError> {
        let page = fetch(url).await?;
        Ok(extract_text(&page.body_utf8))
    }
}
