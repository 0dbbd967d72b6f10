use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::{TimeDelta, Utc};

/// Placeholder JWT secrets that MUST NOT be used in production.
const PLACEHOLDER_SECRETS: &[&str] = &["dev-secret-change-me", "change-me-to-a-random-string"];

pub const DEV_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub token_ttl: TimeDelta,
    pub cors_allowed_origins: Vec<String>,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let environment = var("JOBHUNT_ENV", "development");
        let jwt_secret = var("JOBHUNT_JWT_SECRET", DEV_SECRET);

        if jwt_secret.is_empty() {
            bail!("JOBHUNT_JWT_SECRET must not be empty");
        }
        if environment == "production" && PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("JOBHUNT_JWT_SECRET is unset or still a placeholder");
        }

        let port = var("JOBHUNT_PORT", "8080")
            .parse()
            .context("JOBHUNT_PORT is not a valid port")?;
        let token_ttl_hours: i64 = var("JOBHUNT_TOKEN_TTL_HOURS", "24")
            .parse()
            .context("JOBHUNT_TOKEN_TTL_HOURS is not a number")?;
        if token_ttl_hours <= 0 {
            bail!("JOBHUNT_TOKEN_TTL_HOURS must be positive");
        }
        // Tokens issued now must still get a representable expiry.
        let token_ttl = TimeDelta::try_hours(token_ttl_hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .context("JOBHUNT_TOKEN_TTL_HOURS is too large")?;

        let cors_allowed_origins = var("JOBHUNT_CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            jwt_secret,
            db_path: var("JOBHUNT_DB_PATH", "jobhunt.db").into(),
            host: var("JOBHUNT_HOST", "0.0.0.0"),
            port,
            token_ttl,
            cors_allowed_origins,
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
