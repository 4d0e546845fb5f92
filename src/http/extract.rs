use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::types::ApiError;
use crate::domain::todo::OwnerId;

pub const OWNER_HEADER: &str = "x-user-id";

/// The caller's owner identifier, read from `X-User-ID`. Trusted as-is.
///
/// List it before `Path` and `Json` in a handler so a missing header wins over
/// every other rejection.
#[derive(Debug, Clone)]
pub struct Owner(pub OwnerId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.headers.get(OWNER_HEADER).and_then(|value| value.to_str().ok()).unwrap_or_default();
        Ok(Self(OwnerId::new(raw)?))
    }
}
