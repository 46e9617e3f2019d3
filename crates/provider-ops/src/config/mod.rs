use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_APP_NAME: &str = "Provider Operations Platform";
const DEFAULT_SECRET_KEY: &str = "change-this-in-production";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub app_name: String,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );
        let app_name = env::var("APP_NAME").unwrap_or_else(|_| DEFAULT_APP_NAME.to_string());

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let secret_key =
            env::var("APP_SECRET_KEY").unwrap_or_else(|_| DEFAULT_SECRET_KEY.to_string());
        if environment == AppEnvironment::Production && secret_key == DEFAULT_SECRET_KEY {
            return Err(ConfigError::InsecureSecretKey);
        }

        let token_minutes = env::var("APP_ACCESS_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "120".to_string())
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|minutes| *minutes > 0)
            .ok_or(ConfigError::InvalidTokenLifetime)?;

        let origins = parse_origins(
            &env::var("APP_CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        )?;

        let bootstrap_email = env::var("APP_BOOTSTRAP_ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin@providerops.local".to_string());
        let bootstrap_password = env::var("APP_BOOTSTRAP_ADMIN_PASSWORD")
            .unwrap_or_else(|_| "ChangeMe123!".to_string());

        Ok(Self {
            environment,
            app_name,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            auth: AuthConfig {
                secret_key,
                access_token_expire_minutes: token_minutes,
                bootstrap_admin_email: bootstrap_email,
                bootstrap_admin_password: bootstrap_password,
            },
            cors: CorsConfig { origins },
        })
    }
}

/// Accepts a comma-separated list or a JSON array of origins.
fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let raw = raw.trim();
    let origins: Vec<String> = if raw.starts_with('[') {
        serde_json::from_str::<Vec<String>>(raw).map_err(|_| ConfigError::InvalidCorsOrigins)?
    } else {
        raw.split(',').map(str::to_string).collect()
    };

    Ok(origins
        .into_iter()
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Token signing and first-run account settings.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub access_token_expire_minutes: i64,
    pub bootstrap_admin_email: String,
    pub bootstrap_admin_password: String,
}

impl AuthConfig {
    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &"<redacted>")
            .field(
                "access_token_expire_minutes",
                &self.access_token_expire_minutes,
            )
            .field("bootstrap_admin_email", &self.bootstrap_admin_email)
            .field("bootstrap_admin_password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub origins: Vec<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTokenLifetime,
    InvalidCorsOrigins,
    InsecureSecretKey,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTokenLifetime => write!(
                f,
                "APP_ACCESS_TOKEN_EXPIRE_MINUTES must be a positive integer"
            ),
            ConfigError::InvalidCorsOrigins => write!(
                f,
                "APP_CORS_ORIGINS must be a comma-separated list or a JSON array of strings"
            ),
            ConfigError::InsecureSecretKey => {
                write!(f, "APP_SECRET_KEY must be changed before running in production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
