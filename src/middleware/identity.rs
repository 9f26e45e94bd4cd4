use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::types::UserId;

/// Header an upstream auth proxy sets to the caller's identity.
pub const USER_HEADER: &str = "gs-user";

/// Reads the caller's identity from `headers`.
///
/// Any UTF-8 value is kept as sent, so distinct non-ASCII identities stay
/// distinct. A missing or non-UTF-8 header yields the empty identifier.
pub fn user_id_from_headers(headers: &HeaderMap) -> UserId {
    let value = headers
        .get(USER_HEADER)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .unwrap_or_default();
    UserId::new(value)
}

/// Extracts the caller's [`UserId`] from [`USER_HEADER`]. Never rejects.
#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(user_id_from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    async fn extract(req: Request<()>) -> UserId {
        let (mut parts, _) = req.into_parts();
        UserId::from_request_parts(&mut parts, &()).await.unwrap()
    }

    fn with_raw_header(bytes: &[u8]) -> Request<()> {
        let mut req = Request::builder().body(()).unwrap();
        req.headers_mut()
            .insert(USER_HEADER, HeaderValue::from_bytes(bytes).unwrap());
        req
    }

    #[tokio::test]
    async fn reads_header_value() {
        let req = Request::builder().header(USER_HEADER, "alice").body(()).unwrap();
        assert_eq!(extract(req).await, UserId::new("alice"));
    }

    #[tokio::test]
    async fn missing_header_is_empty_identity() {
        let req = Request::builder().body(()).unwrap();
        assert_eq!(extract(req).await.as_str(), "");
    }

    #[tokio::test]
    async fn non_ascii_identities_stay_distinct() {
        let jose = extract(with_raw_header("josé".as_bytes())).await;
        let muller = extract(with_raw_header("müller".as_bytes())).await;
        assert_eq!(jose.as_str(), "josé");
        assert_eq!(muller.as_str(), "müller");
        assert_ne!(jose, muller);
    }

    #[tokio::test]
    async fn invalid_utf8_is_empty_identity() {
        assert_eq!(extract(with_raw_header(b"\xff\xfe")).await.as_str(), "");
    }
}
