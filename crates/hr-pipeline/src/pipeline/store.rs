use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::domain::{EntityId, EntityKind, PipelineEntity, StatusValue};
use super::remote::{RemoteCollectionClient, RemoteError};
use super::schema::SchemaError;

/// Records of one kind as returned by the last applied refresh.
#[derive(Debug, Clone)]
pub struct Snapshot<E> {
    entities: Vec<E>,
    diagnostics: Vec<SchemaError>,
    generation: u64,
    fetched_at: Option<DateTime<Utc>>,
}

impl<E> Default for Snapshot<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            diagnostics: Vec::new(),
            generation: 0,
            fetched_at: None,
        }
    }
}

impl<E: PipelineEntity> Snapshot<E> {
    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    /// Records the server returned that could not be placed on the board.
    pub fn diagnostics(&self) -> &[SchemaError] {
        &self.diagnostics
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn fetched_count(&self) -> usize {
        self.entities.len() + self.diagnostics.len()
    }

    fn decode(
        records: Vec<Value>,
        generation: u64,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, RemoteError> {
        let kind = E::kind();
        let mut entities: Vec<E> = Vec::with_capacity(records.len());
        let mut diagnostics = Vec::new();
        let mut seen = HashSet::new();

        for record in records {
            let id = record.get("id").and_then(Value::as_i64).map(EntityId);
            let checked = match record.get("status").and_then(Value::as_str) {
                Some(raw) => E::Status::parse(raw).map(|_| ()),
                None => Err(SchemaError::MissingStatus { kind, id: None }),
            };
            if let Err(error) = checked {
                let error = error.for_record(id);
                warn!(%kind, %error, "excluding record from board");
                diagnostics.push(error);
                continue;
            }

            let entity: E = serde_json::from_value(record).map_err(|err| {
                let subject = id.map_or_else(|| "record".to_string(), |id| format!("#{id}"));
                RemoteError::Decode(format!("{kind} {subject}: {err}"))
            })?;

            if !seen.insert(entity.id()) {
                let error = SchemaError::DuplicateId {
                    kind,
                    id: entity.id(),
                };
                warn!(%kind, %error, "excluding record from board");
                diagnostics.push(error);
                continue;
            }
            entities.push(entity);
        }

        Ok(Self {
            entities,
            diagnostics,
            generation,
            fetched_at: Some(fetched_at),
        })
    }
}

/// Selection used by list views; `All` keeps snapshot order untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S: StatusValue> StatusFilter<S> {
    pub fn parse(value: &str) -> Result<Self, SchemaError> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            S::parse(value).map(Self::Only)
        }
    }

    pub fn matches(&self, status: S) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

/// One board column: the records holding `status`, in snapshot order.
#[derive(Debug)]
pub struct StatusGroup<'a, E: PipelineEntity> {
    pub status: E::Status,
    pub entities: Vec<&'a E>,
}

impl<E: PipelineEntity> StatusGroup<'_, E> {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount<S> {
    pub status: S,
    pub count: usize,
}

/// Handed out when a refresh starts; completing with a ticket older than the
/// applied snapshot discards the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct RefreshTicket {
    generation: u64,
}

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied {
        generation: u64,
        entities: usize,
        excluded: usize,
    },
    Superseded {
        generation: u64,
        current: u64,
    },
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Collection refresh failed; the previous snapshot is still in place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to refresh {kind} collection: {source}")]
pub struct FetchError {
    pub kind: EntityKind,
    #[source]
    pub source: RemoteError,
}

/// Local snapshot of one kind's collection plus the grouping queries boards read.
///
/// Every mutating operation takes `&mut self`, so a store has exactly one writer.
pub struct PipelineStore<E: PipelineEntity, C: RemoteCollectionClient + ?Sized> {
    client: Arc<C>,
    snapshot: Snapshot<E>,
    issued: u64,
}

impl<E, C> PipelineStore<E, C>
where
    E: PipelineEntity,
    C: RemoteCollectionClient + ?Sized,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            snapshot: Snapshot::default(),
            issued: 0,
        }
    }

    pub fn kind(&self) -> EntityKind {
        E::kind()
    }

    pub fn client(&self) -> Arc<C> {
        Arc::clone(&self.client)
    }

    pub fn snapshot(&self) -> &Snapshot<E> {
        &self.snapshot
    }

    pub fn diagnostics(&self) -> &[SchemaError] {
        &self.snapshot.diagnostics
    }

    pub fn len(&self) -> usize {
        self.snapshot.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.snapshot.entities.iter().find(|entity| entity.id() == id)
    }

    /// Fetch the full collection and replace the snapshot wholesale.
    pub async fn refresh(&mut self) -> Result<RefreshOutcome, FetchError> {
        let ticket = self.begin_refresh();
        let response = self.client.fetch_all(E::kind()).await;
        self.complete_refresh(ticket, response)
    }

    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        RefreshTicket {
            generation: self.issued,
        }
    }

    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        response: Result<Vec<Value>, RemoteError>,
    ) -> Result<RefreshOutcome, FetchError> {
        let kind = E::kind();
        let records = response.map_err(|source| {
            warn!(%kind, error = %source, "collection refresh failed");
            FetchError { kind, source }
        })?;

        let current = self.snapshot.generation;
        if ticket.generation < current {
            debug!(%kind, generation = ticket.generation, current, "discarding superseded refresh");
            return Ok(RefreshOutcome::Superseded {
                generation: ticket.generation,
                current,
            });
        }

        let snapshot = Snapshot::decode(records, ticket.generation, Utc::now()).map_err(|source| {
            warn!(%kind, error = %source, "collection payload rejected");
            FetchError { kind, source }
        })?;

        let outcome = RefreshOutcome::Applied {
            generation: snapshot.generation,
            entities: snapshot.entities.len(),
            excluded: snapshot.diagnostics.len(),
        };
        self.snapshot = snapshot;
        info!(%kind, generation = ticket.generation, records = self.len(), "snapshot replaced");
        Ok(outcome)
    }

    /// Stable partition of the snapshot in schema column order.
    pub fn grouped_by_status(&self) -> Vec<StatusGroup<'_, E>> {
        let mut groups: Vec<StatusGroup<'_, E>> = E::Status::ORDERED
            .iter()
            .map(|&status| StatusGroup {
                status,
                entities: Vec::new(),
            })
            .collect();

        for entity in &self.snapshot.entities {
            if let Some(group) = groups.get_mut(entity.status().position()) {
                group.entities.push(entity);
            }
        }

        groups
    }

    pub fn group(&self, status: E::Status) -> Vec<&E> {
        self.grouped_by_status()
            .into_iter()
            .find(|group| group.status == status)
            .map(|group| group.entities)
            .unwrap_or_default()
    }

    /// Badge counts, derived from the same partition as [`Self::grouped_by_status`].
    pub fn counts_by_status(&self) -> Vec<StatusCount<E::Status>> {
        self.grouped_by_status()
            .iter()
            .map(|group| StatusCount {
                status: group.status,
                count: group.len(),
            })
            .collect()
    }

    pub fn count(&self, status: E::Status) -> usize {
        self.counts_by_status()
            .into_iter()
            .find(|entry| entry.status == status)
            .map_or(0, |entry| entry.count)
    }

    pub fn filtered_by_status(&self, filter: StatusFilter<E::Status>) -> Vec<&E> {
        self.snapshot
            .entities
            .iter()
            .filter(|entity| filter.matches(entity.status()))
            .collect()
    }
}
