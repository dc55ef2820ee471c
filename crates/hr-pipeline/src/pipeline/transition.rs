use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::domain::{CreatePayload, CreatableEntity, EntityId, EntityKind, PipelineEntity, StatusValue};
use super::remote::{RemoteCollectionClient, RemoteError};
use super::schema::SchemaError;
use super::store::{FetchError, PipelineStore, RefreshOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    Create,
    ChangeStatus { id: EntityId, to: &'static str },
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationAction::Create => write!(f, "create"),
            MutationAction::ChangeStatus { id, to } => write!(f, "move #{id} to {to}"),
        }
    }
}

/// The server rejected or never received a write. Local state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to {action} {kind}: {source}")]
pub struct MutationError {
    pub kind: EntityKind,
    pub action: MutationAction,
    #[source]
    pub source: RemoteError,
}

/// Client-side rejection; nothing is sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("{kind} #{id} cannot move from {from} to {to}")]
    InvalidTransition {
        kind: EntityKind,
        id: EntityId,
        from: &'static str,
        to: &'static str,
    },
    #[error("{kind} #{id} is not on the current board")]
    NotFound { kind: EntityKind, id: EntityId },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The write was accepted but the follow-up refresh failed, so the board is stale.
    #[error("change saved but the board could not be reloaded: {0}")]
    Resync(FetchError),
}

/// Validates and submits writes, then resynchronises the owning store.
pub struct TransitionController<C: RemoteCollectionClient + ?Sized> {
    client: Arc<C>,
}

impl<C: RemoteCollectionClient + ?Sized> TransitionController<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Post a new record with the kind's initial status and reload the board.
    pub async fn create<E>(
        &self,
        store: &mut PipelineStore<E, C>,
        draft: &E::Draft,
    ) -> Result<RefreshOutcome, PipelineError>
    where
        E: CreatableEntity,
    {
        let kind = E::kind();
        let payload = CreatePayload {
            draft,
            status: E::initial_status(),
        };
        let body = serde_json::to_value(&payload).map_err(|err| MutationError {
            kind,
            action: MutationAction::Create,
            source: RemoteError::Decode(err.to_string()),
        })?;

        self.client.create(kind, body).await.map_err(|source| {
            warn!(%kind, error = %source, "create rejected");
            MutationError {
                kind,
                action: MutationAction::Create,
                source,
            }
        })?;
        info!(%kind, "record created");

        store.refresh().await.map_err(PipelineError::Resync)
    }

    pub async fn change_status<E>(
        &self,
        store: &mut PipelineStore<E, C>,
        id: EntityId,
        to: E::Status,
    ) -> Result<RefreshOutcome, PipelineError>
    where
        E: PipelineEntity,
    {
        self.change_status_at(store, id, to, Utc::now()).await
    }

    /// Same as [`Self::change_status`] with an explicit review timestamp.
    pub async fn change_status_at<E>(
        &self,
        store: &mut PipelineStore<E, C>,
        id: EntityId,
        to: E::Status,
        at: DateTime<Utc>,
    ) -> Result<RefreshOutcome, PipelineError>
    where
        E: PipelineEntity,
    {
        let kind = E::kind();
        let from = store
            .get(id)
            .map(PipelineEntity::status)
            .ok_or(TransitionError::NotFound { kind, id })?;

        if !E::Status::permits(from, to) {
            return Err(TransitionError::InvalidTransition {
                kind,
                id,
                from: from.value(),
                to: to.value(),
            }
            .into());
        }

        let action = MutationAction::ChangeStatus { id, to: to.value() };
        self.client
            .update(kind, id, E::status_patch(to, at))
            .await
            .map_err(|source| {
                warn!(%kind, %id, error = %source, "status change rejected");
                MutationError {
                    kind,
                    action,
                    source,
                }
            })?;
        info!(%kind, %id, from = from.value(), to = to.value(), "status changed");

        store.refresh().await.map_err(PipelineError::Resync)
    }

    /// Parse a user-supplied status name, then [`Self::change_status`].
    pub async fn change_status_named<E>(
        &self,
        store: &mut PipelineStore<E, C>,
        id: EntityId,
        to: &str,
    ) -> Result<RefreshOutcome, PipelineError>
    where
        E: PipelineEntity,
    {
        let to = E::Status::parse(to.trim())?;
        self.change_status(store, id, to).await
    }
}
