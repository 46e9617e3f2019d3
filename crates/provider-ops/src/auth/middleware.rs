use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::domain::CurrentUser;
use super::repository::UserRepository;
use super::service::{AuthError, AuthService};
use crate::error::AppError;

/// Reject requests without a valid bearer token; otherwise attach [`CurrentUser`].
pub async fn require_bearer<U>(
    State(auth): State<Arc<AuthService<U>>>,
    mut request: Request,
    next: Next,
) -> Response
where
    U: UserRepository + 'static,
{
    let resolved = bearer_token(&request)
        .ok_or(AuthError::Unauthorized)
        .and_then(|token| auth.authenticate(token));

    match resolved {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(err) => AppError::from(err).into_response(),
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}
