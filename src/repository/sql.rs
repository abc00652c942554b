use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryOrder, Set,
};

use super::{
    NewTodo, RepoError, RepoResult, Todo, TodoId, TodoPatch, TodoRepository,
    next_stored_timestamp, stored_now,
};
use crate::{
    config::StorageBackend,
    db::entities::{prelude::Todo as TodoEntity, todo},
};

/// Relational store; one statement per call, atomicity left to the engine.
#[derive(Clone)]
pub struct SqlTodoRepository {
    db: DatabaseConnection,
}

impl SqlTodoRepository {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    async fn find_row(&self, id: TodoId) -> RepoResult<todo::Model> {
        // Ids past the column range cannot have been assigned.
        let Ok(row_id) = i64::try_from(id) else {
            return Err(RepoError::NotFound { id });
        };
        TodoEntity::find_by_id(row_id)
            .one(&self.db)
            .await?
            .ok_or(RepoError::NotFound { id })
    }
}

fn to_todo(model: todo::Model) -> RepoResult<Todo> {
    let id = TodoId::try_from(model.id)
        .map_err(|_| DbErr::Custom(format!("todos row has negative id {}", model.id)))?;
    Ok(Todo {
        id,
        title: model.title,
        description: model.description,
        completed: model.completed,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

#[async_trait]
impl TodoRepository for SqlTodoRepository {
    fn backend(&self) -> StorageBackend {
        StorageBackend::Database
    }

    async fn list(&self) -> RepoResult<Vec<Todo>> {
        TodoEntity::find()
            .order_by_asc(todo::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_todo)
            .collect()
    }

    async fn insert(&self, new_todo: NewTodo) -> RepoResult<Todo> {
        let now = stored_now();
        let model = todo::ActiveModel {
            title: Set(new_todo.title),
            description: Set(new_todo.description),
            completed: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        to_todo(model.insert(&self.db).await?)
    }

    async fn get_by_id(&self, id: TodoId) -> RepoResult<Todo> {
        to_todo(self.find_row(id).await?)
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> RepoResult<Todo> {
        let stored = self.find_row(id).await?;
        let updated_at = next_stored_timestamp(stored.updated_at);

        let mut active = stored.into_active_model();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(completed) = patch.completed {
            active.completed = Set(completed);
        }
        active.updated_at = Set(updated_at);

        match active.update(&self.db).await {
            Ok(model) => to_todo(model),
            // Row vanished between the lookup and the write.
            Err(DbErr::RecordNotUpdated) => Err(RepoError::NotFound { id }),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_by_id(&self, id: TodoId) -> RepoResult<()> {
        let Ok(row_id) = i64::try_from(id) else {
            return Err(RepoError::NotFound { id });
        };
        let result = TodoEntity::delete_by_id(row_id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound { id });
        }
        tracing::debug!(id, "deleted todo row");
        Ok(())
    }
}
