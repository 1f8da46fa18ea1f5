//! Runs extraction for a list of URLs and records every outcome.
//!
//! URLs are handled one at a time in input order to keep the outbound request
//! rate against third-party hosts low. A failure for one URL is stored as a
//! failed record and reported in its result entry; it never stops the batch.
//! Only store failures abort the call.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    entities::{ContentStatus, NewWebContent, WebContent},
    extractor::ContentExtractor,
    fetcher::is_safe_url,
    repositories::WebContentRepositoryTrait,
};

pub const UNSAFE_URL_MESSAGE: &str = "Invalid or unsafe URL";

/// Outcome for one input URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub url: String,
    pub status: ContentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Key of the stored record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
}

impl From<WebContent> for BatchResult {
    fn from(record: WebContent) -> Self {
        match record.status {
            ContentStatus::Completed => Self {
                url: record.url,
                status: ContentStatus::Completed,
                extracted_content: Some(record.extracted_content),
                raw_text: Some(record.raw_text),
                error: None,
                content_id: Some(record.id),
            },
            ContentStatus::Failed => Self {
                url: record.url,
                status: ContentStatus::Failed,
                extracted_content: None,
                raw_text: None,
                error: record.error,
                content_id: Some(record.id),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractOneError {
    #[error("{}", UNSAFE_URL_MESSAGE)]
    UnsafeUrl,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct BatchProcessor {
    repo: Arc<dyn WebContentRepositoryTrait + Send + Sync>,
    extractor: Arc<dyn ContentExtractor + Send + Sync>,
}

impl BatchProcessor {
    pub fn new(
        repo: Arc<dyn WebContentRepositoryTrait + Send + Sync>,
        extractor: Arc<dyn ContentExtractor + Send + Sync>,
    ) -> Self {
        Self { repo, extractor }
    }

    /// Returns exactly one result per input URL, in input order. Every outcome,
    /// including safety rejections, is persisted.
    #[instrument(skip(self, urls, context), fields(url_count = urls.len()))]
    pub async fn run_batch(
        &self,
        user_id: &str,
        urls: &[String],
        context: Option<&str>,
        model_id: &str,
    ) -> Result<Vec<BatchResult>> {
        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            let result = self.process_url(user_id, url, context, model_id).await?;
            results.push(result);
        }

        let failed = results
            .iter()
            .filter(|result| result.status == ContentStatus::Failed)
            .count();
        info!(total = results.len(), failed, "batch extraction finished");

        Ok(results)
    }

    /// Single-URL variant. Unsafe URLs are refused before anything is fetched
    /// or stored.
    #[instrument(skip(self, context))]
    pub async fn extract_one(
        &self,
        user_id: &str,
        url: &str,
        context: Option<&str>,
        model_id: &str,
    ) -> Result<BatchResult, ExtractOneError> {
        if !is_safe_url(url) {
            return Err(ExtractOneError::UnsafeUrl);
        }
        Ok(self.process_url(user_id, url, context, model_id).await?)
    }

    #[instrument(skip(self, context, model_id))]
    async fn process_url(
        &self,
        user_id: &str,
        url: &str,
        context: Option<&str>,
        model_id: &str,
    ) -> Result<BatchResult> {
        let context = context.map(str::to_string);

        if !is_safe_url(url) {
            warn!("rejected unsafe url");
            return self
                .record_failure(user_id, url, context, model_id, UNSAFE_URL_MESSAGE)
                .await;
        }

        let text = match self.extractor.extract(url).await {
            Ok(text) => text,
            Err(fetch_error) => {
                warn!(error = %fetch_error, "extraction failed");
                return self
                    .record_failure(user_id, url, context, model_id, &fetch_error.to_string())
                    .await;
            }
        };

        let completed = NewWebContent::completed(
            url,
            text.extracted_content,
            text.raw_text,
            model_id,
            context.clone(),
        );

        match self.repo.save(user_id, completed).await {
            Ok(record) => {
                info!(content_id = %record.id, "stored extracted content");
                Ok(record.into())
            }
            Err(store_error) => {
                // Recorded like any other per-URL failure; if the store is
                // really down the second save fails too and aborts the batch.
                warn!(error = %store_error, "failed to store extracted content");
                self.record_failure(user_id, url, context, model_id, &store_error.to_string())
                    .await
            }
        }
    }

    async fn record_failure(
        &self,
        user_id: &str,
        url: &str,
        context: Option<String>,
        model_id: &str,
        message: &str,
    ) -> Result<BatchResult> {
        let record = self
            .repo
            .save(user_id, NewWebContent::failed(url, model_id, context, message))
            .await?;
        Ok(record.into())
    }
}
