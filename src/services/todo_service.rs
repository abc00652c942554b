use std::sync::Arc;

use crate::{
    error::AppError,
    repository::{NewTodo, Todo, TodoId, TodoPatch, TodoRepository},
};

#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>, AppError> {
        self.repo
            .list()
            .await
            .map_err(|err| AppError::from_repo(err, "Failed to fetch todos"))
    }

    pub async fn create_todo(&self, title: &str, description: &str) -> Result<Todo, AppError> {
        let todo = self
            .repo
            .insert(NewTodo {
                title: title.to_string(),
                description: description.to_string(),
            })
            .await
            .map_err(|err| AppError::from_repo(err, "Failed to create todo"))?;
        tracing::info!(id = todo.id, "todo created");
        Ok(todo)
    }

    pub async fn require_todo(&self, id: TodoId) -> Result<Todo, AppError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|err| AppError::from_repo(err, "Failed to fetch todo"))
    }

    /// Applies the fields present in `patch`. An empty patch still bumps `updated_at`.
    pub async fn update_todo(&self, id: TodoId, patch: TodoPatch) -> Result<Todo, AppError> {
        if patch.is_empty() {
            tracing::debug!(id, "empty update, refreshing updated_at only");
        }
        self.repo
            .update(id, patch)
            .await
            .map_err(|err| AppError::from_repo(err, "Failed to update todo"))
    }

    pub async fn delete_todo(&self, id: TodoId) -> Result<(), AppError> {
        self.repo
            .delete_by_id(id)
            .await
            .map_err(|err| AppError::from_repo(err, "Failed to delete todo"))?;
        tracing::info!(id, "todo deleted");
        Ok(())
    }
}
