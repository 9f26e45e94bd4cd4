use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use super::paging::Paging;

/// `result` block present on every response. `code` mirrors the HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultInfo {
    pub code: u16,
    pub info: String,
}

/// Canonical response wrapper: `{result, data?, paging?}`.
///
/// `data` is only emitted when there is body content, `paging` only for
/// multi-result responses.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,
    result: ResultInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    paging: Option<Paging>,
}

impl<T: Serialize> Envelope<T> {
    /// `{result, data: {...}}`
    pub fn single(status: StatusCode, info: impl Into<String>, data: T) -> Self {
        Self {
            status,
            result: result_info(status, info),
            data: Some(data),
            paging: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn result(&self) -> &ResultInfo {
        &self.result
    }
}

impl<I: Serialize> Envelope<Vec<I>> {
    /// `{result, data: [...], paging: {offset, limit}}`
    pub fn multiple(status: StatusCode, info: impl Into<String>, data: Vec<I>, paging: Paging) -> Self {
        Self {
            status,
            result: result_info(status, info),
            data: Some(data),
            paging: Some(paging),
        }
    }
}

impl Envelope<()> {
    /// `{result}` with no `data` key
    pub fn status(status: StatusCode, info: impl Into<String>) -> Self {
        Self {
            status,
            result: result_info(status, info),
            data: None,
            paging: None,
        }
    }
}

fn result_info(status: StatusCode, info: impl Into<String>) -> ResultInfo {
    ResultInfo {
        code: status.as_u16(),
        info: info.into(),
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self) {
            Ok(body) => (self.status, Json(body)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response envelope: {}", e);
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (
                    status,
                    Json(json!({
                        "result": { "code": status.as_u16(), "info": "Failed to serialize response data" }
                    })),
                )
                    .into_response()
            }
        }
    }
}
