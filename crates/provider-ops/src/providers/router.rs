use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Extension, Json, Router};
use serde::Serialize;

use super::domain::{ProviderId, ProviderView};
use super::export::EXPORT_FILE_NAME;
use super::import::ImportError;
use super::query::{ProviderPage, ProviderQuery, ProviderSummary};
use super::repository::ProviderRepository;
use super::service::{ImportSummary, ProviderService};
use crate::auth::{require_bearer, AuthService, CurrentUser, UserRepository};
use crate::error::AppError;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const UPLOAD_FIELD: &str = "file";

/// Router exposing the provider directory endpoints. Every route requires a bearer token.
pub fn provider_router<R, U>(
    providers: Arc<ProviderService<R>>,
    auth: Arc<AuthService<U>>,
) -> Router
where
    R: ProviderRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/api/v1/providers", get(list_handler::<R>))
        .route("/api/v1/providers/import-csv", post(import_handler::<R>))
        .route("/api/v1/providers/summary", get(summary_handler::<R>))
        .route(
            "/api/v1/providers/validate-all",
            post(validate_all_handler::<R>),
        )
        .route("/api/v1/providers/export/csv", get(export_handler::<R>))
        .route("/api/v1/providers/:provider_id", get(get_handler::<R>))
        .route(
            "/api/v1/providers/:provider_id/validate",
            post(validate_handler::<R>),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .route_layer(middleware::from_fn_with_state(auth, require_bearer::<U>))
        .with_state(providers)
}

pub(crate) async fn import_handler<R>(
    State(service): State<Arc<ProviderService<R>>>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImportSummary>), AppError>
where
    R: ProviderRepository + 'static,
{
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ImportError::Upload(err.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let contents = field
            .bytes()
            .await
            .map_err(|err| ImportError::Upload(err.to_string()))?;

        let summary = service.import_csv(user.id(), &file_name, &contents)?;
        return Ok((StatusCode::CREATED, Json(summary)));
    }

    Err(ImportError::MissingFile.into())
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ProviderService<R>>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ProviderQuery>,
) -> Result<Json<ProviderPage>, AppError>
where
    R: ProviderRepository + 'static,
{
    Ok(Json(service.list(user.id(), &query)?))
}

pub(crate) async fn summary_handler<R>(
    State(service): State<Arc<ProviderService<R>>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ProviderSummary>, AppError>
where
    R: ProviderRepository + 'static,
{
    Ok(Json(service.summary(user.id())?))
}

#[derive(Debug, Serialize)]
pub struct BatchValidationResponse {
    pub processed: usize,
}

pub(crate) async fn validate_all_handler<R>(
    State(service): State<Arc<ProviderService<R>>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<BatchValidationResponse>, AppError>
where
    R: ProviderRepository + 'static,
{
    let tally = service.revalidate_all(user.id())?;
    Ok(Json(BatchValidationResponse {
        processed: tally.processed,
    }))
}

pub(crate) async fn export_handler<R>(
    State(service): State<Arc<ProviderService<R>>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError>
where
    R: ProviderRepository + 'static,
{
    let body = service.export_csv(user.id())?;
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
        ),
    ];
    Ok((StatusCode::OK, headers, body))
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<ProviderService<R>>>,
    Extension(user): Extension<CurrentUser>,
    Path(provider_id): Path<String>,
) -> Result<Json<ProviderView>, AppError>
where
    R: ProviderRepository + 'static,
{
    let record = service.get(user.id(), &ProviderId(provider_id))?;
    Ok(Json(record.view()))
}

pub(crate) async fn validate_handler<R>(
    State(service): State<Arc<ProviderService<R>>>,
    Extension(user): Extension<CurrentUser>,
    Path(provider_id): Path<String>,
) -> Result<Json<ProviderView>, AppError>
where
    R: ProviderRepository + 'static,
{
    let record = service.revalidate(user.id(), &ProviderId(provider_id))?;
    Ok(Json(record.view()))
}
