use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryProviderRepository, InMemoryUserRepository};
use crate::routes::app_router;
use axum::http::HeaderValue;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use provider_ops::auth::{AuthService, TokenService};
use provider_ops::config::{AppConfig, CorsConfig};
use provider_ops::error::AppError;
use provider_ops::providers::ProviderService;
use provider_ops::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let tokens = TokenService::new(&config.auth.secret_key, config.auth.token_lifetime());
    let auth_service = Arc::new(AuthService::new(
        Arc::new(InMemoryUserRepository::default()),
        tokens,
    ));
    if auth_service.bootstrap_admin(
        &config.auth.bootstrap_admin_email,
        &config.auth.bootstrap_admin_password,
    )? {
        info!(email = %config.auth.bootstrap_admin_email, "bootstrap admin available");
    }

    let provider_service = Arc::new(ProviderService::new(Arc::new(
        InMemoryProviderRepository::default(),
    )));

    let app = app_router(provider_service, auth_service)
        .layer(Extension(app_state))
        .layer(cors_layer(&config.cors))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        app = %config.app_name,
        ?config.environment,
        %addr,
        "provider operations service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Credentials are allowed, so origins must be listed and methods/headers mirrored.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unusable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}
