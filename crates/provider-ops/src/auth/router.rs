use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Extension, Form, Json, Router};

use super::domain::{CurrentUser, LoginForm, RegisterRequest, TokenResponse, UserView};
use super::middleware::require_bearer;
use super::repository::UserRepository;
use super::service::AuthService;
use crate::error::AppError;

/// Router exposing registration, login, and the current-user endpoint.
pub fn auth_router<U>(auth: Arc<AuthService<U>>) -> Router
where
    U: UserRepository + 'static,
{
    let protected = Router::new()
        .route("/api/v1/auth/me", get(me_handler))
        .route_layer(middleware::from_fn_with_state(
            auth.clone(),
            require_bearer::<U>,
        ));

    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<U>))
        .route("/api/v1/auth/login", post(login_handler::<U>))
        .with_state(auth)
        .merge(protected)
}

pub(crate) async fn register_handler<U>(
    State(auth): State<Arc<AuthService<U>>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserView>), AppError>
where
    U: UserRepository + 'static,
{
    let user = auth.register(request)?;
    Ok((StatusCode::CREATED, Json(user.view())))
}

pub(crate) async fn login_handler<U>(
    State(auth): State<Arc<AuthService<U>>>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError>
where
    U: UserRepository + 'static,
{
    let token = auth.login(&form.username, &form.password)?;
    Ok(Json(token))
}

pub(crate) async fn me_handler(Extension(user): Extension<CurrentUser>) -> Json<UserView> {
    Json(user.0.view())
}
