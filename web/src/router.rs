use crate::controller::{health_check_controller, webhook_controller};
use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use service::config::DEFAULT_WEBHOOK_PATH;
use tower_http::limit::RequestBodyLimitLayer;

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI document. To be a part
// of the rendered document, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Webhook Receiver API"
        ),
        paths(
            health_check_controller::health_check,
            health_check_controller::service_info,
            webhook_controller::receive,
        ),
        components(
            schemas(
                health_check_controller::ServiceInfo,
                health_check_controller::Endpoints,
            )
        ),
        tags(
            (name = "webhook_receiver", description = "Signed webhook intake")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    let webhook_path = app_state.config.webhook_path().to_string();

    Router::new()
        .merge(health_routes())
        .merge(info_routes(app_state.clone()))
        .merge(webhook_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", api_doc(&webhook_path)).path("/rapidoc"))
}

/// The generated document, with the webhook operation moved to the path the
/// receiver is actually mounted on.
fn api_doc(webhook_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if webhook_path != DEFAULT_WEBHOOK_PATH {
        if let Some(item) = doc.paths.paths.remove(DEFAULT_WEBHOOK_PATH) {
            doc.paths.paths.insert(webhook_path.to_string(), item);
        }
    }
    doc
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn info_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check_controller::service_info))
        .with_state(app_state)
}

fn webhook_routes(app_state: AppState) -> Router {
    let path = app_state.config.webhook_path().to_string();
    let max_body_bytes = app_state.config.max_body_bytes;

    Router::new()
        .route(&path, post(webhook_controller::receive))
        // The tower-http limit replaces axum's built-in default so the
        // configured size is the only one applied.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(app_state)
}
