use thiserror::Error;

/// Every outcome a todo operation can fail with. Store failures collapse into `Internal`.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("User ID required")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    /// Also returned when the record exists but belongs to another owner.
    #[error("Todo not found")]
    NotFound,

    #[error("store failure: {0:#}")]
    Internal(#[source] anyhow::Error),
}

impl TodoError {
    pub fn validation(message: impl Into<String>) -> Self { Self::Validation(message.into()) }
}
