use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::api::envelope::Envelope;
use crate::api::paging::PagingParams;
use crate::app::AppState;
use crate::database::models::resource::{Resource, ResourcePayload};
use crate::error::ApiError;
use crate::middleware::{JsonBody, USER_HEADER};
use crate::types::{ResourceId, UserId};

pub const ALLOW_METHODS: &str = "POST, GET, OPTIONS, PUT, PATCH, DELETE";

/// Value of `Access-Control-Allow-Headers`: the standard body headers plus the identity header.
pub fn allow_headers() -> String {
    format!("Content-Type, Content-Length, Accept-Encoding, {}", USER_HEADER)
}

type ApiResult<T> = Result<Envelope<T>, ApiError>;

/// GET /resources?$offset=&$limit= - List the caller's resources
pub async fn list(
    State(state): State<Arc<AppState>>,
    user: UserId,
    RawQuery(query): RawQuery,
) -> ApiResult<Vec<Resource>> {
    let params = PagingParams::from_query(query.as_deref());
    let page = state.resources.list(&user, &params).await?;
    Ok(Envelope::multiple(StatusCode::OK, "OK", page.items, page.paging))
}

/// POST /resources - Create a resource owned by the caller
pub async fn create(
    State(state): State<Arc<AppState>>,
    user: UserId,
    JsonBody(payload): JsonBody<ResourcePayload>,
) -> ApiResult<Resource> {
    let resource = state.resources.create(&user, &payload).await?;
    Ok(Envelope::single(StatusCode::CREATED, "Resource added", resource))
}

/// GET /resources/:id - Fetch one of the caller's resources
pub async fn get(
    State(state): State<Arc<AppState>>,
    user: UserId,
    Path(id): Path<String>,
) -> ApiResult<Resource> {
    let resource = state.resources.get(&user, &ResourceId::new(id)).await?;
    Ok(Envelope::single(StatusCode::OK, "OK", resource))
}

/// PUT /resources/:id - Full replace; the path id wins over the body
pub async fn update(
    State(state): State<Arc<AppState>>,
    user: UserId,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<ResourcePayload>,
) -> ApiResult<Resource> {
    let resource = state
        .resources
        .update(&user, &ResourceId::new(id), &payload)
        .await?;
    Ok(Envelope::single(StatusCode::OK, "Resource modified", resource))
}

/// PATCH /resources/:id - Not implemented; the body is not read
pub async fn patch(
    State(state): State<Arc<AppState>>,
    user: UserId,
    Path(id): Path<String>,
) -> ApiError {
    state.resources.patch(&user, &ResourceId::new(id)).await.into()
}

/// DELETE /resources/:id - Remove one of the caller's resources
pub async fn delete(
    State(state): State<Arc<AppState>>,
    user: UserId,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.resources.delete(&user, &ResourceId::new(id)).await?;
    Ok(Envelope::status(StatusCode::OK, "Resource deleted"))
}

/// OPTIONS /resources and /resources/:id - CORS headers only, empty body
pub async fn options() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS.to_string()),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, allow_headers()),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
        ],
    )
}

/// Unknown paths
pub async fn not_found() -> Envelope<()> {
    Envelope::status(StatusCode::NOT_FOUND, "Not found")
}

/// Known path, unsupported method
pub async fn method_not_allowed() -> Envelope<()> {
    Envelope::status(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
