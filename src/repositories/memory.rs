use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use crate::entities::{NewWebContent, WebContent, next_timestamp};
use crate::repositories::web_content::{
    PageCursor, WebContentPage, WebContentRepositoryTrait, ensure_cursor_partition,
};

type Partition = BTreeMap<String, WebContent>;

/// Process-local store, one ordered map per user. Used for development
/// (`CONTENT_STORE=memory`) and tests.
#[derive(Clone, Default)]
pub struct InMemoryWebContentRepository {
    partitions: Arc<DashMap<String, Partition>>,
}

impl InMemoryWebContentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held for `user_id`.
    pub fn count(&self, user_id: &str) -> usize {
        self.partitions
            .get(user_id)
            .map(|partition| partition.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl WebContentRepositoryTrait for InMemoryWebContentRepository {
    async fn save(&self, user_id: &str, content: NewWebContent) -> Result<WebContent> {
        let record = content.into_record(user_id, next_timestamp());
        self.partitions
            .entry(user_id.to_string())
            .or_default()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn list(
        &self,
        user_id: &str,
        limit: usize,
        start: Option<PageCursor>,
    ) -> Result<WebContentPage> {
        ensure_cursor_partition(user_id, start.as_ref())?;
        if limit == 0 {
            return Ok(WebContentPage::default());
        }

        let Some(partition) = self.partitions.get(user_id) else {
            return Ok(WebContentPage::default());
        };

        let upper = match start {
            Some(cursor) => Bound::Excluded(cursor.id),
            None => Bound::Unbounded,
        };

        let items = partition
            .range::<String, _>((Bound::Unbounded, upper))
            .rev()
            .take(limit.saturating_add(1))
            .map(|(_, record)| record.clone())
            .collect();

        Ok(WebContentPage::from_lookahead(items, limit))
    }

    async fn get_by_id(&self, user_id: &str, id: &str) -> Result<Option<WebContent>> {
        Ok(self
            .partitions
            .get(user_id)
            .and_then(|partition| partition.get(id).cloned()))
    }

    async fn delete_by_id(&self, user_id: &str, id: &str) -> Result<()> {
        if let Some(mut partition) = self.partitions.get_mut(user_id) {
            partition.remove(id);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ContentStatus;

    fn completed(url: &str) -> NewWebContent {
        NewWebContent::completed(url, "Hello World", "  Hello\n World ", "model-1", None)
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let repo = InMemoryWebContentRepository::new();
        let input = NewWebContent::completed(
            "https://example.com/a",
            "Hello World",
            "  Hello\n World ",
            "model-1",
            Some("ctx".to_string()),
        );

        let saved = repo.save("alice", input.clone()).await.unwrap();
        let fetched = repo.get_by_id("alice", &saved.id).await.unwrap().unwrap();

        assert_eq!(fetched, saved);
        assert_eq!(fetched.url, input.url);
        assert_eq!(fetched.extracted_content, input.extracted_content);
        assert_eq!(fetched.raw_text, input.raw_text);
        assert_eq!(fetched.model_id, input.model_id);
        assert_eq!(fetched.context, input.context);
        assert_eq!(fetched.status, ContentStatus::Completed);
        assert_eq!(fetched.error, None);
    }

    #[tokio::test]
    async fn test_repeated_url_gets_distinct_keys() {
        let repo = InMemoryWebContentRepository::new();
        let first = repo.save("alice", completed("https://x.example/")).await.unwrap();
        let second = repo.save("alice", completed("https://x.example/")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.created_at > first.created_at);
        assert_eq!(repo.count("alice"), 2);
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let repo = InMemoryWebContentRepository::new();
        assert!(repo.get_by_id("alice", "nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partitions_are_isolated() {
        let repo = InMemoryWebContentRepository::new();
        let saved = repo.save("alice", completed("https://a.example/")).await.unwrap();

        assert!(repo.get_by_id("bob", &saved.id).await.unwrap().is_none());
        assert!(repo.list("bob", 10, None).await.unwrap().items.is_empty());

        repo.delete_by_id("bob", &saved.id).await.unwrap();
        assert!(repo.get_by_id("alice", &saved.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = InMemoryWebContentRepository::new();
        let saved = repo.save("alice", completed("https://a.example/")).await.unwrap();

        repo.delete_by_id("alice", &saved.id).await.unwrap();
        repo.delete_by_id("alice", &saved.id).await.unwrap();
        repo.delete_by_id("alice", "never-existed").await.unwrap();
        repo.delete_by_id("nobody", "never-existed").await.unwrap();

        assert!(repo.get_by_id("alice", &saved.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_pages_newest_first() {
        let repo = InMemoryWebContentRepository::new();
        let oldest = repo.save("alice", completed("https://1.example/")).await.unwrap();
        let middle = repo.save("alice", completed("https://2.example/")).await.unwrap();
        let newest = repo.save("alice", completed("https://3.example/")).await.unwrap();

        let first = repo.list("alice", 1, None).await.unwrap();
        assert_eq!(first.items, vec![newest.clone()]);
        let cursor = first.next_cursor.clone().unwrap();
        assert_eq!(cursor.id, newest.id);

        let second = repo.list("alice", 1, Some(cursor)).await.unwrap();
        assert_eq!(second.items, vec![middle.clone()]);

        let rest = repo
            .list("alice", 5, second.next_cursor.clone())
            .await
            .unwrap();
        assert_eq!(rest.items, vec![oldest]);
        assert!(rest.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_exact_page_has_no_cursor() {
        let repo = InMemoryWebContentRepository::new();
        repo.save("alice", completed("https://1.example/")).await.unwrap();
        repo.save("alice", completed("https://2.example/")).await.unwrap();

        let page = repo.list("alice", 2, None).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.next_cursor.is_none());
    }

    #[tokio::test]
    async fn test_foreign_cursor_is_rejected() {
        let repo = InMemoryWebContentRepository::new();
        let cursor = PageCursor {
            user_id: "bob".to_string(),
            id: "0000000000001#deadbeef".to_string(),
        };
        assert!(repo.list("alice", 1, Some(cursor)).await.is_err());
    }

    #[tokio::test]
    async fn test_unbounded_limit_returns_everything() {
        let repo = InMemoryWebContentRepository::new();
        repo.save("alice", completed("https://1.example/")).await.unwrap();
        repo.save("alice", completed("https://2.example/")).await.unwrap();

        let page = repo.list("alice", usize::MAX, None).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.next_cursor.is_none());
    }
}
