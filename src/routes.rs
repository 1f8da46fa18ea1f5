use axum::{
    Json, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    app_state::AppState,
    batch::BatchResult,
    entities::{ContentStatus, WebContent},
    error::MessageResponse,
    health::{self, HealthResponse},
    web_text::{
        dtos::{BatchExtractRequest, BatchExtractResponse, ExtractRequest, HistoryResponse},
        handlers,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        handlers::batch_extract,
        handlers::extract_single,
        handlers::list_history,
        handlers::get_content,
        handlers::delete_content,
    ),
    components(schemas(
        BatchExtractRequest,
        BatchExtractResponse,
        BatchResult,
        ContentStatus,
        ExtractRequest,
        HealthResponse,
        HistoryResponse,
        MessageResponse,
        WebContent,
    )),
    tags(
        (name = "web-text", description = "Web page text extraction and history"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/web-text/batch", post(handlers::batch_extract))
        .route("/web-text/extract", post(handlers::extract_single))
        .route("/web-text/history", get(handlers::list_history))
        .route(
            "/web-text/{id}",
            get(handlers::get_content).delete(handlers::delete_content),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}
