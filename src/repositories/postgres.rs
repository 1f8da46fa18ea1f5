use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use crate::entities::{NewWebContent, WebContent, next_timestamp};
use crate::repositories::web_content::{
    PageCursor, WebContentPage, WebContentRepositoryTrait, ensure_cursor_partition,
};

/// PostgreSQL-backed Content Store. The (user_id, id) primary key doubles as the
/// partition and sort key.
#[derive(Clone)]
pub struct PgWebContentRepository {
    pool: PgPool,
}

impl PgWebContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WebContentRepositoryTrait for PgWebContentRepository {
    #[instrument(skip(self, content), fields(url = %content.url))]
    async fn save(&self, user_id: &str, content: NewWebContent) -> Result<WebContent> {
        let record = content.into_record(user_id, next_timestamp());

        let saved = sqlx::query_as::<_, WebContent>(
            r#"
            INSERT INTO web_contents
                  (user_id, id, url, extracted_content, raw_text, context, model_id, created_at, status, error)
            VALUES ($1,      $2, $3,  $4,                $5,       $6,      $7,       $8,         $9,     $10)
            RETURNING user_id, id, url, extracted_content, raw_text, context, model_id, created_at, status, error
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.id)
        .bind(&record.url)
        .bind(&record.extracted_content)
        .bind(&record.raw_text)
        .bind(&record.context)
        .bind(&record.model_id)
        .bind(record.created_at)
        .bind(record.status)
        .bind(&record.error)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    #[instrument(skip(self))]
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

        let after = start.map(|cursor| cursor.id);
        let lookahead = i64::try_from(limit.saturating_add(1)).unwrap_or(i64::MAX);

        let items = sqlx::query_as::<_, WebContent>(
            r#"
            SELECT user_id, id, url, extracted_content, raw_text, context, model_id, created_at, status, error
            FROM web_contents
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR id < $2)
            ORDER BY id DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(after)
        .bind(lookahead)
        .fetch_all(&self.pool)
        .await?;

        Ok(WebContentPage::from_lookahead(items, limit))
    }

    async fn get_by_id(&self, user_id: &str, id: &str) -> Result<Option<WebContent>> {
        let record = sqlx::query_as::<_, WebContent>(
            r#"
            SELECT user_id, id, url, extracted_content, raw_text, context, model_id, created_at, status, error
            FROM web_contents
            WHERE user_id = $1 AND id = $2
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_by_id(&self, user_id: &str, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM web_contents WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}
