use std::sync::Arc;

use crate::{
    batch::BatchProcessor, config::Config, extractor::ContentExtractor,
    repositories::WebContentRepositoryTrait,
};

#[derive(Clone)]
pub struct AppState {
    pub content_repo: Arc<dyn WebContentRepositoryTrait + Send + Sync>,
    pub batch: BatchProcessor,
    pub identity_claim: Arc<str>,
    pub history_page_limit: usize,
}

impl AppState {
    pub fn new(
        content_repo: Arc<dyn WebContentRepositoryTrait + Send + Sync>,
        extractor: Arc<dyn ContentExtractor + Send + Sync>,
        config: &Config,
    ) -> Self {
        Self {
            batch: BatchProcessor::new(content_repo.clone(), extractor),
            content_repo,
            identity_claim: Arc::from(config.identity_claim()),
            history_page_limit: usize::try_from(config.history_page_limit()).unwrap_or(50),
        }
    }
}
