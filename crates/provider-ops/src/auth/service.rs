use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use email_address::EmailAddress;
use tracing::{debug, info};

use super::domain::{RegisterRequest, TokenResponse, User, UserId};
use super::password::{hash_password, verify_password, DEFAULT_COST};
use super::repository::UserRepository;
use super::token::TokenService;
use crate::repository::RepositoryError;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Registration, login, and bearer-token resolution for tenants.
pub struct AuthService<U> {
    users: Arc<U>,
    tokens: TokenService,
    password_cost: u32,
}

impl<U> AuthService<U>
where
    U: UserRepository + 'static,
{
    pub fn new(users: Arc<U>, tokens: TokenService) -> Self {
        Self {
            users,
            tokens,
            password_cost: DEFAULT_COST,
        }
    }

    /// Override the bcrypt work factor used for new password hashes.
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    pub fn register(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let email = request.email.trim().to_string();
        if !is_plausible_email(&email) {
            return Err(AuthError::InvalidEmail);
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }

        let user = self.create_user(&email, &request.password, false)?;
        info!(user = %user.id.0, "user registered");
        Ok(user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = self
            .users
            .find_by_email(email)?
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self.tokens.issue(&user.email).map_err(AuthError::TokenIssue)?;
        Ok(TokenResponse::bearer(token))
    }

    /// Resolve a bearer token to an active user.
    pub fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.verify(token).map_err(|err| {
            debug!(error = %err, "rejected bearer token");
            AuthError::Unauthorized
        })?;

        match self.users.find_by_email(&claims.sub)? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AuthError::Unauthorized),
        }
    }

    /// Create the configured superuser unless that email is already registered.
    pub fn bootstrap_admin(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        if self.users.find_by_email(email)?.is_some() {
            return Ok(false);
        }
        let admin = self.create_user(email, password, true)?;
        info!(user = %admin.id.0, "bootstrap admin created");
        Ok(true)
    }

    fn create_user(
        &self,
        email: &str,
        password: &str,
        is_superuser: bool,
    ) -> Result<User, AuthError> {
        let password_hash =
            hash_password(password, self.password_cost).map_err(AuthError::PasswordHash)?;
        let user = User {
            id: UserId::generate(),
            email: email.to_string(),
            password_hash,
            is_active: true,
            is_superuser,
            created_at: Utc::now(),
        };

        self.users.insert(user).map_err(|err| match err {
            RepositoryError::Conflict => AuthError::EmailTaken,
            other => AuthError::Repository(other),
        })
    }
}

/// RFC 5322 syntax via `email_address`, plus a dotted domain so that local
/// hostnames are refused.
fn is_plausible_email(email: &str) -> bool {
    match EmailAddress::from_str(email) {
        Ok(address) => {
            let domain = address.domain();
            domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        Err(_) => false,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already registered.")]
    EmailTaken,
    #[error("A valid email address is required.")]
    InvalidEmail,
    #[error("Password must be at least {MIN_PASSWORD_LEN} characters.")]
    WeakPassword,
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("Could not validate credentials.")]
    Unauthorized,
    #[error("failed to issue access token: {0}")]
    TokenIssue(jsonwebtoken::errors::Error),
    #[error("failed to hash password: {0}")]
    PasswordHash(bcrypt::BcryptError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
