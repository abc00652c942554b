use std::collections::HashSet;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{
    NewTodo, RepoError, RepoResult, Todo, TodoId, TodoPatch, TodoRepository, next_timestamp,
};
use crate::config::StorageBackend;

#[derive(Debug)]
struct MemoryState {
    todos: Vec<Todo>,
    next_id: TodoId,
}

/// Process-local store. Contents are lost on restart.
///
/// Every mutation holds the write lock for its whole read-modify-write, so ids
/// are never handed out twice and readers never observe a half-applied change.
#[derive(Debug)]
pub struct MemoryTodoRepository {
    state: RwLock<MemoryState>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                todos: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Pre-loads `todos` in the given order; new ids start above the largest one.
    /// `u64::MAX` is reserved so the counter can always advance.
    pub fn with_todos(todos: Vec<Todo>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(todos.len());
        for todo in &todos {
            if !seen.insert(todo.id) {
                bail!("duplicate todo id {} in seed data", todo.id);
            }
            if todo.title.trim().is_empty() {
                bail!("todo {} in seed data has an empty title", todo.id);
            }
            if todo.created_at > todo.updated_at {
                bail!("todo {} in seed data was updated before it was created", todo.id);
            }
        }

        let next_id = match todos.iter().map(|todo| todo.id).max() {
            Some(max) => match max.checked_add(1) {
                Some(next) => next,
                None => bail!("todo id {max} in seed data leaves no room for new ids"),
            },
            None => 1,
        };

        Ok(Self {
            state: RwLock::new(MemoryState { todos, next_id }),
        })
    }
}

impl Default for MemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Memory
    }

    async fn list(&self) -> RepoResult<Vec<Todo>> {
        Ok(self.state.read().await.todos.clone())
    }

    async fn insert(&self, todo: NewTodo) -> RepoResult<Todo> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id = id.checked_add(1).ok_or(RepoError::IdsExhausted)?;

        let now = Utc::now();
        let created = Todo {
            id,
            title: todo.title,
            description: todo.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        state.todos.push(created.clone());
        Ok(created)
    }

    async fn get_by_id(&self, id: TodoId) -> RepoResult<Todo> {
        self.state
            .read()
            .await
            .todos
            .iter()
            .find(|todo| todo.id == id)
            .cloned()
            .ok_or(RepoError::NotFound { id })
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> RepoResult<Todo> {
        let mut state = self.state.write().await;
        let stored = state
            .todos
            .iter_mut()
            .find(|stored| stored.id == id)
            .ok_or(RepoError::NotFound { id })?;

        patch.apply(stored);
        stored.updated_at = next_timestamp(stored.updated_at);
        Ok(stored.clone())
    }

    async fn delete_by_id(&self, id: TodoId) -> RepoResult<()> {
        let mut state = self.state.write().await;
        let position = state
            .todos
            .iter()
            .position(|todo| todo.id == id)
            .ok_or(RepoError::NotFound { id })?;
        state.todos.remove(position);
        Ok(())
    }
}
