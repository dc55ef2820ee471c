use async_trait::async_trait;
use serde_json::Value;

use super::domain::{EntityId, EntityKind};

/// Tenant-scoped CRUD collaborator consumed by stores and controllers.
///
/// Implementations own credential attachment and base URL selection; callers
/// only see raw records or a [`RemoteError`].
#[async_trait]
pub trait RemoteCollectionClient: Send + Sync {
    /// `GET <base>/<collection>/`
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Value>, RemoteError>;

    /// `POST <base>/<collection>/`
    async fn create(&self, kind: EntityKind, body: Value) -> Result<Value, RemoteError>;

    /// `PATCH <base>/<collection>/<id>/`
    async fn update(&self, kind: EntityKind, id: EntityId, body: Value)
        -> Result<Value, RemoteError>;
}

/// Failure reported by the collaborator. Authentication failures surface as `Status`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response payload: {0}")]
    Decode(String),
}

impl RemoteError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
