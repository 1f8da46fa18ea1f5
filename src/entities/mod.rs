use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::atomic::{AtomicI64, Ordering};
use utoipa::ToSchema;

/// --- PostgreSQL Enums ---
#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[sqlx(type_name = "content_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Completed,
    Failed,
}

/// --- Tables ---

/// One stored extraction attempt. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebContent {
    pub user_id: String, // partition key
    pub id: String,      // record key, unique within the partition
    pub url: String,
    pub extracted_content: String,
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub model_id: String,
    pub created_at: i64, // unix millis
    pub status: ContentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fields supplied by the caller when saving a record. Key and timestamp are
/// generated by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWebContent {
    pub url: String,
    pub extracted_content: String,
    pub raw_text: String,
    pub model_id: String,
    pub context: Option<String>,
    pub status: ContentStatus,
    pub error: Option<String>,
}

impl NewWebContent {
    pub fn completed(
        url: impl Into<String>,
        extracted_content: impl Into<String>,
        raw_text: impl Into<String>,
        model_id: impl Into<String>,
        context: Option<String>,
    ) -> Self {
        Self {
            url: url.into(),
            extracted_content: extracted_content.into(),
            raw_text: raw_text.into(),
            model_id: model_id.into(),
            context,
            status: ContentStatus::Completed,
            error: None,
        }
    }

    /// Failed attempts keep empty text fields and always carry a message.
    pub fn failed(
        url: impl Into<String>,
        model_id: impl Into<String>,
        context: Option<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            extracted_content: String::new(),
            raw_text: String::new(),
            model_id: model_id.into(),
            context,
            status: ContentStatus::Failed,
            error: Some(error.into()),
        }
    }

    pub fn into_record(self, user_id: &str, created_at: i64) -> WebContent {
        WebContent {
            user_id: user_id.to_string(),
            id: record_key(created_at, &self.url),
            url: self.url,
            extracted_content: self.extracted_content,
            raw_text: self.raw_text,
            context: self.context,
            model_id: self.model_id,
            created_at,
            status: self.status,
            error: self.error,
        }
    }
}

/// `<13-digit millis>#<8 hex chars of md5(url)>`. Zero padding keeps
/// lexicographic order equal to chronological order.
pub fn record_key(created_at: i64, url: &str) -> String {
    let digest = format!("{:x}", md5::compute(url.as_bytes()));
    format!("{:013}#{}", created_at, &digest[..8])
}

static LAST_TIMESTAMP: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp that is strictly increasing across the process, so
/// two saves never share a record key even within the same millisecond.
pub fn next_timestamp() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_TIMESTAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_TIMESTAMP.compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(current) => last = current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_key_format() {
        let key = record_key(1_700_000_000_000, "https://example.com/");
        let (millis, hash) = key.split_once('#').unwrap();
        assert_eq!(millis, "1700000000000");
        assert_eq!(hash.len(), 8);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, record_key(1_700_000_000_000, "https://example.com/"));
    }

    #[test]
    fn test_record_key_sorts_chronologically() {
        let earlier = record_key(999_999_999_999, "https://b.example/");
        let later = record_key(1_000_000_000_000, "https://a.example/");
        assert!(earlier < later);
    }

    #[test]
    fn test_next_timestamp_strictly_increases() {
        let stamps: Vec<i64> = (0..1000).map(|_| next_timestamp()).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_failed_record_invariants() {
        let record = NewWebContent::failed("https://x.example/", "m", None, "boom")
            .into_record("alice", 42);
        assert_eq!(record.status, ContentStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("boom"));
        assert_eq!(record.extracted_content, "");
        assert_eq!(record.raw_text, "");
        assert_eq!(record.user_id, "alice");
        assert_eq!(record.created_at, 42);
    }

    #[test]
    fn test_serializes_camel_case_without_empty_options() {
        let record = NewWebContent::completed("https://x.example/", "Hello", " Hello ", "m", None)
            .into_record("alice", 1);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["extractedContent"], "Hello");
        assert_eq!(json["rawText"], " Hello ");
        assert_eq!(json["modelId"], "m");
        assert_eq!(json["status"], "completed");
        assert!(json.get("error").is_none());
        assert!(json.get("context").is_none());
    }
}
