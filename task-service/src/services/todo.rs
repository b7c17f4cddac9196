use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::TodoStore,
    models::{CreateTodoRequest, Todo, UpdateTodoRequest},
    services::TodoError,
};

#[derive(Clone)]
pub struct TodoService {
    todos: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoStore>) -> Self {
        Self { todos }
    }

    pub async fn create(
        &self,
        organization_id: Uuid,
        created_by: Uuid,
        req: CreateTodoRequest,
    ) -> Result<Todo, TodoError> {
        let todo = Todo::new(organization_id, created_by, req.title, req.description);
        self.todos.insert(todo.clone()).await?;
        tracing::debug!(org_id = %organization_id, todo_id = %todo.id, "todo created");
        Ok(todo)
    }

    pub async fn list(&self, organization_id: Uuid) -> Result<Vec<Todo>, TodoError> {
        Ok(self.todos.find_by_organization_id(organization_id).await?)
    }

    /// Fetch a todo, treating an id from another organization as absent.
    pub async fn get(&self, organization_id: Uuid, todo_id: Uuid) -> Result<Todo, TodoError> {
        self.todos
            .find_by_id(todo_id)
            .await?
            .filter(|t| t.organization_id == organization_id)
            .ok_or(TodoError::NotFound)
    }

    pub async fn update(&self, mut todo: Todo, req: UpdateTodoRequest) -> Result<Todo, TodoError> {
        if let Some(title) = req.title {
            todo.title = title;
        }
        if let Some(description) = req.description {
            todo.description = Some(description);
        }
        todo.updated_at = Utc::now();
        self.todos.update(todo.clone()).await?;
        Ok(todo)
    }

    pub async fn complete(&self, mut todo: Todo) -> Result<Todo, TodoError> {
        if !todo.completed {
            todo.completed = true;
            todo.completed_at = Some(Utc::now());
            todo.updated_at = Utc::now();
            self.todos.update(todo.clone()).await?;
        }
        Ok(todo)
    }

    pub async fn delete(&self, organization_id: Uuid, todo_id: Uuid) -> Result<(), TodoError> {
        // Scope check first so cross-org ids report not-found.
        self.get(organization_id, todo_id).await?;
        self.todos.delete(todo_id).await?;
        Ok(())
    }
}
