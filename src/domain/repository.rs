use async_trait::async_trait;
use super::todo::{NewTodo, OwnerId, Todo, TodoChanges, TodoId};

/// The record store. Every method is one round trip and is scoped to `owner`.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    async fn init(&self) -> anyhow::Result<()>;
    /// Ordered by `due_date`, earliest first.
    async fn list(&self, owner: &OwnerId) -> anyhow::Result<Vec<Todo>>;
    async fn create(&self, owner: &OwnerId, input: NewTodo) -> anyhow::Result<Todo>;
    /// `None` when no row matches both `id` and `owner`.
    async fn update(&self, owner: &OwnerId, id: &TodoId, changes: TodoChanges) -> anyhow::Result<Option<Todo>>;
    /// `false` when no row matches both `id` and `owner`.
    async fn delete(&self, owner: &OwnerId, id: &TodoId) -> anyhow::Result<bool>;
}
