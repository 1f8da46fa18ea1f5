use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{NewWebContent, WebContent};

/// Resume point for a history listing: the partition and the last key returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCursor {
    pub user_id: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebContentPage {
    pub items: Vec<WebContent>,
    /// Present only when more records remain after `items`.
    pub next_cursor: Option<PageCursor>,
}

impl WebContentPage {
    /// Builds a page from up to `limit + 1` newest-first rows. The extra row only
    /// signals that another page exists.
    pub(crate) fn from_lookahead(mut items: Vec<WebContent>, limit: usize) -> Self {
        if items.len() <= limit {
            return Self {
                items,
                next_cursor: None,
            };
        }
        items.truncate(limit);
        let next_cursor = items.last().map(|last| PageCursor {
            user_id: last.user_id.clone(),
            id: last.id.clone(),
        });
        Self { items, next_cursor }
    }
}

/// Per-user store of extraction records. Every method is scoped to `user_id`;
/// no call can observe another user's records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebContentRepositoryTrait: Send + Sync {
    /// Persists a new record with a freshly generated key and timestamp.
    async fn save(&self, user_id: &str, content: NewWebContent) -> Result<WebContent>;

    /// Newest-first listing of up to `limit` records, resuming after `start`.
    async fn list(
        &self,
        user_id: &str,
        limit: usize,
        start: Option<PageCursor>,
    ) -> Result<WebContentPage>;

    async fn get_by_id(&self, user_id: &str, id: &str) -> Result<Option<WebContent>>;

    /// Deleting a missing key is not an error.
    async fn delete_by_id(&self, user_id: &str, id: &str) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}

pub(crate) fn ensure_cursor_partition(user_id: &str, start: Option<&PageCursor>) -> Result<()> {
    if let Some(cursor) = start
        && cursor.user_id != user_id
    {
        anyhow::bail!("pagination cursor belongs to a different partition");
    }
    Ok(())
}
