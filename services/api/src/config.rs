use anyhow::{Context as _, bail};

use rapido_core::tracing::LogFormat;

/// API service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL` (falls back to `DB_URL`).
    pub database_url: String,
    /// TCP port for the HTTP server (default 8080). Env var: `API_PORT`.
    pub api_port: u16,
    /// HMAC secret for access tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default one day).
    pub access_token_ttl_secs: u64,
    /// Also accept a bare user id as the bearer credential.
    pub accept_user_id_tokens: bool,
    pub password_hash_cost: u32,
    pub run_migrations: bool,
    pub log_format: LogFormat,
}

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL")
            .or_else(|| get("DB_URL"))
            .context("DATABASE_URL must be set")?;
        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET must be set")?;

        let api_port = parse_or(get("API_PORT"), "API_PORT", DEFAULT_PORT)?;
        let access_token_ttl_secs = parse_or(
            get("ACCESS_TOKEN_TTL_SECS"),
            "ACCESS_TOKEN_TTL_SECS",
            DEFAULT_TOKEN_TTL_SECS,
        )?;
        if access_token_ttl_secs == 0 {
            bail!("ACCESS_TOKEN_TTL_SECS must be positive");
        }
        let password_hash_cost = parse_or(
            get("PASSWORD_HASH_COST"),
            "PASSWORD_HASH_COST",
            bcrypt::DEFAULT_COST,
        )?;
        if !(4..=31).contains(&password_hash_cost) {
            bail!("PASSWORD_HASH_COST must be between 4 and 31");
        }

        Ok(Self {
            database_url,
            api_port,
            jwt_secret,
            access_token_ttl_secs,
            accept_user_id_tokens: parse_flag(get("ACCEPT_USER_ID_TOKENS"), "ACCEPT_USER_ID_TOKENS")?,
            password_hash_cost,
            run_migrations: parse_flag(get("RUN_MIGRATIONS"), "RUN_MIGRATIONS")?,
            log_format: LogFormat::from_env_value(get("LOG_FORMAT").as_deref()),
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {v:?}")),
        None => Ok(default),
    }
}

fn parse_flag(value: Option<String>, key: &str) -> anyhow::Result<bool> {
    match value.as_deref().map(str::trim) {
        None => Ok(false),
        Some("1" | "true" | "TRUE" | "yes") => Ok(true),
        Some("0" | "false" | "FALSE" | "no") => Ok(false),
        Some(other) => bail!("{key} must be a boolean, got {other:?}"),
    }
}
