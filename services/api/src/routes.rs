use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use provider_ops::auth::{auth_router, AuthService, UserRepository};
use provider_ops::providers::{provider_router, ProviderRepository, ProviderService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn app_router<R, U>(
    providers: Arc<ProviderService<R>>,
    auth: Arc<AuthService<U>>,
) -> Router
where
    R: ProviderRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/api/v1/health", get(healthcheck))
        .route("/api/v1/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .merge(auth_router(auth.clone()))
        .merge(provider_router(providers, auth))
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
