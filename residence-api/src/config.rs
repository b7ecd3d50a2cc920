/// Configuration management for the residence server
///
/// Configuration comes from environment variables; a `.env` file is loaded
/// first when present.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `JWT_SECRET`: bearer-token signing key, at least 32 characters (required)
/// - `API_HOST` / `API_PORT`: bind address (default: 0.0.0.0:8080)
/// - `APP_ENV`: `production` enables HSTS and `Secure` cookies
/// - `CORS_ORIGINS`: comma-separated origins, `*` for any (default: `*`)
/// - `ADMIN_USERNAME` / `ADMIN_PASSWORD`: seeded administrator (default: admin / 123456789)
/// - `RESIDENT_MIN_BIRTH_YEAR` / `RESIDENT_MAX_BIRTH_YEAR`: accepted range (default: 1940..=2025)
///
/// # Example
///
/// ```no_run
/// use residence_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Listening on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use residence_shared::auth::credentials::{DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME};
use residence_shared::registry::validation::BirthYearBounds;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Minimum accepted `JWT_SECRET` length
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Seeded administrator
    pub admin: AdminConfig,

    /// Resident validation bounds
    pub residents: ResidentConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,

    /// Production mode: HSTS header and `Secure` cookies
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of pooled connections
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing key; generate with `openssl rand -hex 32`
    #[serde(skip_serializing)]
    pub secret: String,
}

/// Administrator seeded on first start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Login name
    pub username: String,

    /// Initial secret
    #[serde(skip_serializing)]
    pub password: String,
}

/// Resident validation bounds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResidentConfig {
    /// Earliest accepted year of birth
    pub min_birth_year: i32,

    /// Latest accepted year of birth
    pub max_birth_year: i32,
}

impl ResidentConfig {
    /// Bounds in the form the registry expects
    pub fn birth_years(&self) -> BirthYearBounds {
        BirthYearBounds {
            min: self.min_birth_year,
            max: self.max_birth_year,
        }
    }
}

impl Default for ResidentConfig {
    fn default() -> Self {
        let bounds = BirthYearBounds::default();
        Self {
            min_birth_year: bounds.min,
            max_birth_year: bounds.max,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails
    /// to parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            );
        }

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = lookup("APP_ENV")
            .map(|env| env.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let defaults = ResidentConfig::default();
        let residents = ResidentConfig {
            min_birth_year: parse_or(&lookup, "RESIDENT_MIN_BIRTH_YEAR", defaults.min_birth_year)?,
            max_birth_year: parse_or(&lookup, "RESIDENT_MAX_BIRTH_YEAR", defaults.max_birth_year)?,
        };
        if residents.min_birth_year > residents.max_birth_year {
            anyhow::bail!("RESIDENT_MIN_BIRTH_YEAR must not exceed RESIDENT_MAX_BIRTH_YEAR");
        }

        Ok(Self {
            api: ApiConfig {
                host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "API_PORT", 8080)?,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            },
            jwt: JwtConfig { secret: jwt_secret },
            admin: AdminConfig {
                username: lookup("ADMIN_USERNAME")
                    .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
                password: lookup("ADMIN_PASSWORD")
                    .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            },
            residents,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether any origin may call the API
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}
