use crate::domain::error::TodoError;
use crate::domain::repository::TodoRepository;
use crate::domain::todo::{CreateTodo, NewTodo, OwnerId, Todo, TodoChanges, TodoId, UpdateTodo};
use async_trait::async_trait;

#[async_trait]
pub trait TodoService: Send + Sync + 'static {
    async fn list(&self, owner: &OwnerId) -> Result<Vec<Todo>, TodoError>;
    async fn create(&self, owner: &OwnerId, input: CreateTodo) -> Result<Todo, TodoError>;
    async fn update(&self, owner: &OwnerId, id: &TodoId, input: UpdateTodo) -> Result<Todo, TodoError>;
    async fn delete(&self, owner: &OwnerId, id: &TodoId) -> Result<(), TodoError>;
}

#[derive(Clone)]
pub struct TodoServiceImpl<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoServiceImpl<R> {
    pub fn new(repo: R) -> Self { Self { repo } }
}

#[async_trait]
impl<R: TodoRepository> TodoService for TodoServiceImpl<R> {
    async fn list(&self, owner: &OwnerId) -> Result<Vec<Todo>, TodoError> {
        self.repo.list(owner).await.map_err(|e| internal("list", e))
    }

    async fn create(&self, owner: &OwnerId, input: CreateTodo) -> Result<Todo, TodoError> {
        let input = NewTodo::try_from(input)?;
        let todo = self.repo.create(owner, input).await.map_err(|e| internal("create", e))?;
        tracing::info!(owner = %owner, id = %todo.id, "created todo");
        Ok(todo)
    }

    async fn update(&self, owner: &OwnerId, id: &TodoId, input: UpdateTodo) -> Result<Todo, TodoError> {
        let changes = TodoChanges::try_from(input)?;
        let updated = self.repo.update(owner, id, changes).await.map_err(|e| internal("update", e))?;
        let todo = updated.ok_or(TodoError::NotFound)?;
        tracing::info!(owner = %owner, id = %todo.id, "updated todo");
        Ok(todo)
    }

    async fn delete(&self, owner: &OwnerId, id: &TodoId) -> Result<(), TodoError> {
        if !self.repo.delete(owner, id).await.map_err(|e| internal("delete", e))? {
            return Err(TodoError::NotFound);
        }
        tracing::info!(owner = %owner, id = %id, "deleted todo");
        Ok(())
    }
}

fn internal(operation: &'static str, err: anyhow::Error) -> TodoError {
    tracing::error!(operation, error = %format!("{err:#}"), "store operation failed");
    TodoError::Internal(err)
}
