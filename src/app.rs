use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api::paging::PagingPolicy;
use crate::config::AppConfig;
use crate::database::store::ResourceStore;
use crate::handlers::{health, resources};
use crate::middleware::request_log_middleware;
use crate::services::ResourceService;
use crate::types::RESOURCES_PATH;

/// Shared per-process state handed to every handler.
pub struct AppState {
    pub resources: ResourceService,
}

impl AppState {
    pub fn new(store: Arc<dyn ResourceStore>, config: &AppConfig) -> Self {
        Self {
            resources: ResourceService::new(store, PagingPolicy::from(&config.paging)),
        }
    }
}

pub fn router(state: Arc<AppState>, config: &AppConfig) -> Router {
    let item_path = format!("{}/:id", RESOURCES_PATH);

    let app = Router::new()
        .route("/health", get(health::health))
        .route(
            RESOURCES_PATH,
            get(resources::list)
                .post(resources::create)
                .options(resources::options),
        )
        .route(
            &item_path,
            get(resources::get)
                .put(resources::update)
                .patch(resources::patch)
                .delete(resources::delete)
                .options(resources::options),
        )
        .method_not_allowed_fallback(resources::method_not_allowed)
        .fallback(resources::not_found)
        .with_state(state);

    let app = if config.api.enable_request_logging {
        app.layer(middleware::from_fn(request_log_middleware))
    } else {
        app
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(allow_any_origin()),
    )
}

/// `Access-Control-Allow-Origin: *` on every response that doesn't already carry one.
fn allow_any_origin() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    )
}
