use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::{batch::BatchResult, entities::WebContent, repositories::PageCursor};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchExtractRequest {
    /// Kept loose so a missing or non-array value gets our own 400 message.
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub urls: Option<Value>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub model_id: Option<String>,
}

/// A batch request that passed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBatchRequest {
    pub urls: Vec<String>,
    pub context: Option<String>,
    pub model_id: String,
}

impl BatchExtractRequest {
    pub fn validate(self) -> Result<ValidBatchRequest, String> {
        let urls = match self.urls {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err("URLs array is required".to_string()),
        };
        // Non-string entries are kept as their JSON text; they never pass the
        // URL safety check and come back as per-URL failures.
        let urls = urls
            .into_iter()
            .map(|item| match item {
                Value::String(url) => url,
                other => other.to_string(),
            })
            .collect();

        let model_id = required(self.model_id).ok_or("modelId is required")?;

        Ok(ValidBatchRequest {
            urls,
            context: self.context,
            model_id,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchExtractResponse {
    pub results: Vec<BatchResult>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    #[serde(default)]
    #[schema(value_type = String)]
    pub url: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    #[schema(value_type = String)]
    pub model_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidExtractRequest {
    pub url: String,
    pub context: Option<String>,
    pub model_id: String,
}

impl ExtractRequest {
    pub fn validate(self) -> Result<ValidExtractRequest, String> {
        let url = required(self.url).ok_or("URL is required")?;
        let model_id = required(self.model_id).ok_or("modelId is required")?;
        Ok(ValidExtractRequest {
            url,
            context: self.context,
            model_id,
        })
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Page size, defaults to the configured history limit.
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
    /// Base64-encoded JSON cursor from a previous `lastEvaluatedKey`.
    pub exclusive_start_key: Option<String>,
}

impl HistoryQuery {
    pub fn page_limit(&self, default: usize) -> Result<usize, String> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => match raw.parse::<usize>() {
                Ok(limit) if limit > 0 => Ok(limit),
                _ => Err("limit must be a positive integer".to_string()),
            },
        }
    }

    pub fn start_cursor(&self) -> Result<Option<PageCursor>, String> {
        self.exclusive_start_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .map(decode_cursor)
            .transpose()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub data: Vec<WebContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_evaluated_key: Option<String>,
}

pub fn encode_cursor(cursor: &PageCursor) -> String {
    // PageCursor holds only strings, serialization cannot fail
    let json = serde_json::to_vec(cursor).unwrap_or_default();
    STANDARD.encode(json)
}

pub fn decode_cursor(encoded: &str) -> Result<PageCursor, String> {
    // A raw '+' in the query string arrives as a space.
    let normalized = encoded.trim().replace(' ', "+");
    let bytes = STANDARD
        .decode(normalized)
        .map_err(|_| "Invalid exclusiveStartKey".to_string())?;
    serde_json::from_slice(&bytes).map_err(|_| "Invalid exclusiveStartKey".to_string())
}
