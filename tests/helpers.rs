use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

use webtext::{
    app_state::AppState,
    config::Config,
    extractor::{ContentExtractor, ExtractedText, extract_text},
    fetcher::FetchError,
    repositories::InMemoryWebContentRepository,
    routes::create_router,
};

/// Serves canned HTML per URL; unknown URLs fail like a 404.
#[derive(Default)]
pub struct StubExtractor {
    pages: HashMap<String, String>,
}

impl StubExtractor {
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl ContentExtractor for StubExtractor {
    async fn extract(&self, url: &str) -> Result<ExtractedText, FetchError> {
        self.pages
            .get(url)
            .map(|html| extract_text(html))
            .ok_or(FetchError::Http {
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }
}

pub fn test_app(extractor: StubExtractor) -> (Router, InMemoryWebContentRepository) {
    let repo = InMemoryWebContentRepository::new();
    let state = AppState::new(
        Arc::new(repo.clone()),
        Arc::new(extractor),
        &Config::default(),
    );
    (create_router(state), repo)
}

pub fn bearer(user: &str) -> String {
    let token = encode(
        &Header::default(),
        &json!({ "cognito:username": user, "sub": format!("sub-{}", user) }),
        &EncodingKey::from_secret(b"gateway"),
    )
    .unwrap();
    format!("Bearer {}", token)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(user));
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Record keys contain `#`, which must be escaped in a path segment.
pub fn content_path(id: &str) -> String {
    format!("/web-text/{}", id.replace('#', "%23"))
}
