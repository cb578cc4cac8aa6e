//! HTTP server command for the dailyDo todo API
//!
//! Connects the gateway, creates the schema, then blocks on the server.
//! Any failure before the listener is bound aborts startup.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use dailydo_server::config::{DEFAULT_MAX_CONNECTIONS, DEFAULT_POOL_RECYCLE};
use dailydo_server::{run_server, DatabaseConfig, Gateway, MemoryGateway, PgGateway, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (TLS is always required)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Recycle pooled connections older than this many seconds
    #[arg(long, env = "DAILYDO_POOL_RECYCLE_SECS", default_value_t = DEFAULT_POOL_RECYCLE.as_secs())]
    pub pool_recycle_secs: u64,

    /// Maximum number of pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Keep todos in memory instead of PostgreSQL (lost on exit)
    #[arg(long)]
    pub in_memory: bool,
}

impl ServeArgs {
    fn database_config(&self) -> Result<DatabaseConfig> {
        let url = self
            .database_url
            .clone()
            .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or .env")?;

        Ok(DatabaseConfig {
            url,
            pool_recycle: Duration::from_secs(self.pool_recycle_secs),
            max_connections: self.max_connections,
        })
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let gateway: Arc<dyn Gateway> = if args.in_memory {
        tracing::warn!("Using in-memory store - todos are lost on exit");
        Arc::new(MemoryGateway::new())
    } else {
        let db_config = args.database_config()?;
        tracing::info!(
            pool_recycle_secs = args.pool_recycle_secs,
            max_connections = args.max_connections,
            "Connecting to database"
        );
        let gateway = PgGateway::connect(&db_config)
            .await
            .context("Failed to connect to database")?;
        Arc::new(gateway)
    };

    gateway
        .initialize()
        .await
        .context("Failed to create database schema")?;

    tracing::info!("Starting dailyDo server on {}", args.bind);

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Run server (blocks until shutdown)
    run_server(gateway, config).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = ServeArgs::try_parse_from(["serve"]).unwrap();
        assert_eq!(args.bind.port(), 8000);
        assert_eq!(args.max_connections, 5);
        assert!(!args.in_memory);
        assert!(!args.cors_permissive);
    }

    #[test]
    fn database_config_from_flags() {
        let args = ServeArgs::try_parse_from([
            "serve",
            "--database-url",
            "postgres://u@h/db",
            "--pool-recycle-secs",
            "60",
        ])
        .unwrap();

        let config = args.database_config().unwrap();
        assert_eq!(config.url, "postgres://u@h/db");
        assert_eq!(config.pool_recycle, Duration::from_secs(60));
    }
}
