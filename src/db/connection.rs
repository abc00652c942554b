use std::time::Duration;

use anyhow::Context;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use super::providers::{self, redact_url};
use crate::config::DatabaseConfig;

/// Opens the pool and creates any missing tables. Any failure here is fatal.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let url = cfg.connection_url();
    let provider = providers::default_registry()?.provider_for_url(&url)?;

    let mut options = ConnectOptions::new(url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .with_context(|| format!("failed to connect to database {}", redact_url(&url)))?;
    provider.post_connect(&db).await?;

    info!(provider = provider.id().as_str(), "syncing database schema from entities");
    db.get_schema_registry("todo_server::db::entities::*")
        .sync(&db)
        .await
        .context("failed to sync database schema")?;
    Ok(db)
}
