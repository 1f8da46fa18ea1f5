use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use tracing::{info, instrument};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    batch::{BatchResult, ExtractOneError, UNSAFE_URL_MESSAGE},
    entities::WebContent,
    error::{ApiError, MessageResponse},
    web_text::dtos::{
        BatchExtractRequest, BatchExtractResponse, ExtractRequest, HistoryQuery, HistoryResponse,
        encode_cursor,
    },
};

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|_| ApiError::bad_request("Invalid request body"))
}

fn content_id(id: String) -> Result<String, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::bad_request("Content ID is required"));
    }
    Ok(id)
}

#[utoipa::path(
    post,
    path = "/web-text/batch",
    tag = "web-text",
    request_body = BatchExtractRequest,
    responses(
        (status = 200, description = "One result per input URL, in input order", body = BatchExtractResponse),
        (status = 400, description = "Missing URLs or modelId", body = MessageResponse),
        (status = 401, description = "No caller identity", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id))]
pub async fn batch_extract(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    payload: Result<Json<BatchExtractRequest>, JsonRejection>,
) -> Result<Json<BatchExtractResponse>, ApiError> {
    let request = json_body(payload)?
        .validate()
        .map_err(ApiError::BadRequest)?;

    info!(url_count = request.urls.len(), model_id = %request.model_id, "batch extraction requested");

    let results = state
        .batch
        .run_batch(
            &auth_user.user_id,
            &request.urls,
            request.context.as_deref(),
            &request.model_id,
        )
        .await?;

    Ok(Json(BatchExtractResponse { results }))
}

#[utoipa::path(
    post,
    path = "/web-text/extract",
    tag = "web-text",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Extraction outcome, persisted", body = BatchResult),
        (status = 400, description = "Missing fields or unsafe URL", body = MessageResponse),
        (status = 401, description = "No caller identity", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    )
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id))]
pub async fn extract_single(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<BatchResult>, ApiError> {
    let request = json_body(payload)?
        .validate()
        .map_err(ApiError::BadRequest)?;

    let result = state
        .batch
        .extract_one(
            &auth_user.user_id,
            &request.url,
            request.context.as_deref(),
            &request.model_id,
        )
        .await
        .map_err(|err| match err {
            ExtractOneError::UnsafeUrl => ApiError::bad_request(UNSAFE_URL_MESSAGE),
            ExtractOneError::Store(source) => ApiError::Internal(source),
        })?;

    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/web-text/history",
    tag = "web-text",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Newest-first page of the caller's records", body = HistoryResponse),
        (status = 400, description = "Bad limit or cursor", body = MessageResponse),
        (status = 401, description = "No caller identity", body = MessageResponse)
    )
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id))]
pub async fn list_history(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = query
        .page_limit(state.history_page_limit)
        .map_err(ApiError::BadRequest)?;
    let start = query.start_cursor().map_err(ApiError::BadRequest)?;

    if let Some(cursor) = &start
        && cursor.user_id != auth_user.user_id
    {
        return Err(ApiError::bad_request("Invalid exclusiveStartKey"));
    }

    let page = state
        .content_repo
        .list(&auth_user.user_id, limit, start)
        .await?;

    Ok(Json(HistoryResponse {
        data: page.items,
        last_evaluated_key: page.next_cursor.as_ref().map(encode_cursor),
    }))
}

#[utoipa::path(
    get,
    path = "/web-text/{id}",
    tag = "web-text",
    params(("id" = String, Path, description = "Record key")),
    responses(
        (status = 200, description = "The stored record", body = WebContent),
        (status = 400, description = "Missing id", body = MessageResponse),
        (status = 401, description = "No caller identity", body = MessageResponse),
        (status = 404, description = "No such record for this caller", body = MessageResponse)
    )
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id, id = %id))]
pub async fn get_content(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WebContent>, ApiError> {
    let id = content_id(id)?;

    state
        .content_repo
        .get_by_id(&auth_user.user_id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Content not found".to_string()))
}

#[utoipa::path(
    delete,
    path = "/web-text/{id}",
    tag = "web-text",
    params(("id" = String, Path, description = "Record key")),
    responses(
        (status = 200, description = "Deleted, or never existed", body = MessageResponse),
        (status = 400, description = "Missing id", body = MessageResponse),
        (status = 401, description = "No caller identity", body = MessageResponse)
    )
)]
#[instrument(skip_all, fields(user_id = %auth_user.user_id, id = %id))]
pub async fn delete_content(
    auth_user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = content_id(id)?;

    state
        .content_repo
        .delete_by_id(&auth_user.user_id, &id)
        .await?;

    info!("content deleted");
    Ok(Json(MessageResponse::new("Content deleted successfully")))
}
