use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::providers::{ImportError, ProviderServiceError};
use crate::telemetry::TelemetryError;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(ImportError),
    Providers(ProviderServiceError),
    Auth(AuthError),
    Export(csv::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Providers(err) => write!(f, "provider error: {}", err),
            AppError::Auth(err) => write!(f, "auth error: {}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Providers(err) => Some(err),
            AppError::Auth(err) => Some(err),
            AppError::Export(err) => Some(err),
        }
    }
}

fn import_status(err: &ImportError) -> StatusCode {
    match err {
        ImportError::InvalidFileType
        | ImportError::MissingFile
        | ImportError::EmptyFile
        | ImportError::Upload(_) => StatusCode::BAD_REQUEST,
        ImportError::InvalidEncoding
        | ImportError::NoHeaders
        | ImportError::MissingColumns(_)
        | ImportError::Csv(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ImportError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Import(err) => import_status(err),
            AppError::Providers(err) => match err {
                ProviderServiceError::Import(err) => import_status(err),
                ProviderServiceError::Query(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ProviderServiceError::NotFound => StatusCode::NOT_FOUND,
                ProviderServiceError::Repository(_) | ProviderServiceError::Export(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Auth(err) => match err {
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidEmail | AuthError::WeakPassword => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                AuthError::InvalidCredentials | AuthError::Unauthorized => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::TokenIssue(_)
                | AuthError::PasswordHash(_)
                | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Import(err) if status.is_client_error() => err.to_string(),
            AppError::Providers(err) if status.is_client_error() => err.to_string(),
            AppError::Auth(err) if status.is_client_error() => err.to_string(),
            _ => {
                tracing::error!(error = %self, "request failed");
                self.to_string()
            }
        };

        let body = Json(json!({ "error": message }));
        if matches!(self, AppError::Auth(AuthError::Unauthorized)) {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ImportError> for AppError {
    fn from(value: ImportError) -> Self {
        Self::Import(value)
    }
}

impl From<ProviderServiceError> for AppError {
    fn from(value: ProviderServiceError) -> Self {
        Self::Providers(value)
    }
}

impl From<AuthError> for AppError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value)
    }
}
