use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    config::{AppConfig, StorageBackend},
    db::connection,
    repository::{MemoryTodoRepository, SqlTodoRepository, Todo, TodoRepository},
};

/// Builds the storage strategy selected by `storage.backend`.
pub async fn init_repository(cfg: &AppConfig) -> Result<Arc<dyn TodoRepository>> {
    let repo: Arc<dyn TodoRepository> = match cfg.storage.backend {
        StorageBackend::Database => {
            let db = connection::connect(&cfg.database).await?;
            Arc::new(SqlTodoRepository::new(&db))
        }
        StorageBackend::Memory => {
            let repo = match cfg.storage.seed_path.as_deref() {
                Some(path) => {
                    let todos = load_seed(path).await?;
                    info!(count = todos.len(), path = %path.display(), "loaded seed todos");
                    MemoryTodoRepository::with_todos(todos)?
                }
                None => MemoryTodoRepository::new(),
            };
            Arc::new(repo)
        }
    };

    info!(backend = %repo.backend(), "todo storage ready");
    Ok(repo)
}

pub async fn load_seed(path: &Path) -> Result<Vec<Todo>> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("seed file {} is not a JSON array of todos", path.display()))
}
