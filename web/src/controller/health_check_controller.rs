use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Describes the running receiver.
#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    status: String,
    message: String,
    endpoints: Endpoints,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Endpoints {
    webhook: String,
}

/// GET liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API router is up and responding to requests", body = String),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}

/// GET a description of the receiver and where it accepts webhooks
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Receiver is running", body = ServiceInfo)
    )
)]
pub async fn service_info(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(ServiceInfo {
        status: "ok".to_string(),
        message: "Rust webhook receiver".to_string(),
        endpoints: Endpoints {
            webhook: format!("POST {}", app_state.config.webhook_path()),
        },
    })
}
