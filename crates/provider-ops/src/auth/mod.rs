//! Tenant accounts, password storage, and bearer-token authentication.

pub mod domain;
pub mod middleware;
pub mod password;
pub mod repository;
pub mod router;
pub mod service;
pub mod token;


pub use domain::{
    CurrentUser, LoginForm, RegisterRequest, TokenResponse, User, UserId, UserView,
};
pub use middleware::require_bearer;
pub use password::MIN_HASH_COST;
pub use repository::UserRepository;
pub use router::auth_router;
pub use service::{AuthError, AuthService, MIN_PASSWORD_LEN};
pub use token::{Claims, TokenService};
