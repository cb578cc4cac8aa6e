//! Database connection configuration
//!
//! The connection string comes from the environment. Its scheme is rewritten
//! to plain `postgres://`, sqlx parses the rest, and the resulting options
//! always demand TLS.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// Connections older than this are recycled by the pool.
pub const DEFAULT_POOL_RECYCLE: Duration = Duration::from_secs(300);

/// Default maximum connections for the pool.
/// Kept low for a single small service.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("database URL is empty")]
    EmptyUrl,

    #[error("unsupported database URL scheme '{0}' (expected postgres or postgresql)")]
    UnsupportedScheme(String),

    #[error("invalid database URL: {0}")]
    InvalidUrl(#[from] sqlx::Error),
}

/// Settings for the process-wide connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Connection string as supplied by the environment
    pub url: String,

    /// Maximum age of a pooled connection
    pub pool_recycle: Duration,

    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool_recycle: DEFAULT_POOL_RECYCLE,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Connect options with TLS enforced.
    ///
    /// Whatever ssl mode the URL ends up with after sqlx has applied every
    /// query parameter (`sslmode` and its `ssl-mode` alias alike), anything
    /// short of `require` is raised to `require`. Certificate-verifying
    /// modes are kept.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let url = normalize_scheme(&self.url)?;
        let options = PgConnectOptions::from_str(&url)?;

        Ok(match options.get_ssl_mode() {
            PgSslMode::Require | PgSslMode::VerifyCa | PgSslMode::VerifyFull => options,
            _ => options.ssl_mode(PgSslMode::Require),
        })
    }
}

/// Rewrite the URL scheme to `postgres://`, leaving the rest untouched.
///
/// Accepts `postgres://`, `postgresql://` and driver-qualified forms such as
/// `postgresql+psycopg://`.
pub fn normalize_scheme(url: &str) -> Result<String, ConfigError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ConfigError::EmptyUrl);
    }

    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| ConfigError::UnsupportedScheme(url.to_owned()))?;

    let base_scheme = scheme.split('+').next().unwrap_or(scheme);
    if !matches!(base_scheme, "postgres" | "postgresql") {
        return Err(ConfigError::UnsupportedScheme(scheme.to_owned()));
    }

    Ok(format!("postgres://{rest}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ssl_mode(url: &str) -> PgSslMode {
        DatabaseConfig::new(url)
            .connect_options()
            .unwrap()
            .get_ssl_mode()
    }

    #[test]
    fn rewrites_scheme_variants() {
        for url in [
            "postgres://u@h/db",
            "postgresql://u@h/db",
            "postgresql+psycopg://u@h/db",
            "postgres+asyncpg://u@h/db",
        ] {
            assert_eq!(normalize_scheme(url).unwrap(), "postgres://u@h/db", "{url}");
        }
    }

    #[test]
    fn rejects_other_schemes() {
        let err = normalize_scheme("mysql://u@h/db").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(s) if s == "mysql"));

        assert!(matches!(normalize_scheme("   ").unwrap_err(), ConfigError::EmptyUrl));
        assert!(matches!(
            normalize_scheme("not a url").unwrap_err(),
            ConfigError::UnsupportedScheme(_)
        ));
    }

    #[test]
    fn requires_tls_by_default() {
        assert!(matches!(ssl_mode("postgres://u@h/db"), PgSslMode::Require));
        assert!(matches!(
            ssl_mode("postgresql+psycopg://u@h/db"),
            PgSslMode::Require
        ));
    }

    #[test]
    fn upgrades_weak_ssl_modes() {
        for mode in ["disable", "allow", "prefer"] {
            let url = format!("postgres://u@h/db?sslmode={mode}");
            assert!(matches!(ssl_mode(&url), PgSslMode::Require), "{mode}");
        }
    }

    #[test]
    fn ssl_mode_alias_cannot_disable_tls() {
        // The last ssl parameter wins inside sqlx, whichever spelling it uses
        assert!(matches!(
            ssl_mode("postgres://u@h/db?sslmode=require&ssl-mode=disable"),
            PgSslMode::Require
        ));
        assert!(matches!(
            ssl_mode("postgres://u@h/db?ssl-mode=prefer"),
            PgSslMode::Require
        ));
    }

    #[test]
    fn keeps_verifying_ssl_modes() {
        assert!(matches!(
            ssl_mode("postgres://u@h/db?sslmode=verify-full"),
            PgSslMode::VerifyFull
        ));
        assert!(matches!(
            ssl_mode("postgres://u@h/db?sslmode=verify-ca"),
            PgSslMode::VerifyCa
        ));
    }

    #[test]
    fn connect_options_parse() {
        let config = DatabaseConfig::new("postgresql://user:pw@localhost:5432/todos");
        let options = config.connect_options().unwrap();
        assert_eq!(options.get_database(), Some("todos"));
        assert_eq!(config.pool_recycle, Duration::from_secs(300));
    }
}
