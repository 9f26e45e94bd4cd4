use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use crate::api::envelope::Envelope;
use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub store: String,
}

/// GET /health - 200 when the store answers a ping, 503 otherwise
pub async fn health(State(state): State<Arc<AppState>>) -> Envelope<HealthStatus> {
    let timestamp = chrono::Utc::now();

    match state.resources.store_health().await {
        Ok(()) => Envelope::single(
            StatusCode::OK,
            "OK",
            HealthStatus {
                status: "ok",
                timestamp,
                store: "ok".to_string(),
            },
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            Envelope::single(
                StatusCode::SERVICE_UNAVAILABLE,
                "Store unavailable",
                HealthStatus {
                    status: "degraded",
                    timestamp,
                    store: e.to_string(),
                },
            )
        }
    }
}
