//! Todo storage behind a single async contract.
//!
//! Two implementations exist: [`SqlTodoRepository`] backed by sea-orm and
//! [`MemoryTodoRepository`] holding everything in process memory. Handlers only
//! ever see `Arc<dyn TodoRepository>`.

mod memory;
mod model;
mod sql;

use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;

use crate::config::StorageBackend;

pub use memory::MemoryTodoRepository;
pub use model::{
    NewTodo, Todo, TodoId, TodoPatch, next_stored_timestamp, next_timestamp, stored_now,
};
pub use sql::SqlTodoRepository;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("todo not found (id={id})")]
    NotFound { id: TodoId },
    #[error("todo id space exhausted")]
    IdsExhausted,
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait TodoRepository: Send + Sync {
    fn backend(&self) -> StorageBackend;

    /// All todos in the backend's natural order.
    async fn list(&self) -> RepoResult<Vec<Todo>>;

    /// Stores a new todo, assigning its id, `completed = false` and timestamps.
    async fn insert(&self, todo: NewTodo) -> RepoResult<Todo>;

    async fn get_by_id(&self, id: TodoId) -> RepoResult<Todo>;

    /// Applies the fields present in `patch` to `id` and refreshes `updated_at`
    /// to a strictly later value. `id` and `created_at` never change.
    async fn update(&self, id: TodoId, patch: TodoPatch) -> RepoResult<Todo>;

    async fn delete_by_id(&self, id: TodoId) -> RepoResult<()>;
}
