use crate::infra::AppState;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use dpo_vendor::auth::{auth_callback_url, auth_redirect_base, ProfileDirectory};
use dpo_vendor::compliance::{compliance_router, ComplianceIntakeService};
use dpo_vendor::wizard::SubmissionAdapter;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Serialize)]
pub(crate) struct CallbackUrlResponse {
    pub(crate) redirect_base: String,
    pub(crate) callback_url: String,
}

pub(crate) fn with_compliance_routes<A, P>(
    service: Arc<ComplianceIntakeService<A, P>>,
) -> axum::Router
where
    A: SubmissionAdapter + 'static,
    P: ProfileDirectory + 'static,
{
    compliance_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/auth/callback-url",
            axum::routing::get(callback_url_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Where the auth provider should send the browser back to, given the caller's origin.
pub(crate) async fn callback_url_endpoint(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Json<CallbackUrlResponse> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Url::parse(value).ok());

    Json(CallbackUrlResponse {
        redirect_base: auth_redirect_base(origin.as_ref(), &state.public_url),
        callback_url: auth_callback_url(origin.as_ref(), &state.public_url),
    })
}
