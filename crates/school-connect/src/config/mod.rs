use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use uuid::Uuid;

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
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub site: SiteConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let site_name = env::var("APP_SITE_NAME").unwrap_or_else(|_| "School Connect".to_string());
        let data_file = env::var("APP_DATA_FILE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let credentials = parse_credentials(&env::var("APP_AUTH_TOKENS").unwrap_or_default())?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            site: SiteConfig { name: site_name },
            storage: StorageConfig { data_file },
            auth: AuthConfig { credentials },
        })
    }
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Branding echoed by the discovery endpoint.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub name: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "School Connect".to_string(),
        }
    }
}

/// Where the store snapshot lives between restarts.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub data_file: Option<PathBuf>,
}

/// Static bearer credentials accepted by the API.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub credentials: Vec<Credential>,
}

/// One `token=<user uuid>[:staff]` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub user_id: Uuid,
    pub staff: bool,
}

/// Parse the comma separated `APP_AUTH_TOKENS` value.
pub fn parse_credentials(raw: &str) -> Result<Vec<Credential>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_credential)
        .collect()
}

fn parse_credential(entry: &str) -> Result<Credential, ConfigError> {
    let invalid = |reason: &'static str| ConfigError::InvalidCredential {
        entry: entry.to_string(),
        reason,
    };

    let (token, subject) = entry.split_once('=').ok_or_else(|| invalid("missing '='"))?;
    let token = token.trim();
    if token.is_empty() {
        return Err(invalid("empty token"));
    }

    let (user, flag) = match subject.split_once(':') {
        Some((user, flag)) => (user, Some(flag.trim())),
        None => (subject, None),
    };
    let staff = match flag {
        None => false,
        Some(flag) if flag.eq_ignore_ascii_case("staff") => true,
        Some(_) => return Err(invalid("unknown flag, expected 'staff'")),
    };
    let user_id = Uuid::parse_str(user.trim()).map_err(|_| invalid("user id is not a uuid"))?;

    Ok(Credential {
        token: token.to_string(),
        user_id,
        staff,
    })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCredential { entry: String, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCredential { entry, reason } => {
                write!(f, "APP_AUTH_TOKENS entry '{entry}' is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidCredential { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
