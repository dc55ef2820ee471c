//! Lookup table of valid statuses per entity kind, in board order.

use serde::Serialize;

use super::candidates::CandidateStatus;
use super::domain::{ColorToken, EntityId, EntityKind, StatusValue};
use super::employees::EmployeeStatus;
use super::leave::LeaveStatus;

/// Display metadata for one status value of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusColumn {
    pub value: &'static str,
    pub label: &'static str,
    pub color: ColorToken,
}

impl StatusColumn {
    pub fn of<S: StatusValue>(status: S) -> Self {
        Self {
            value: status.value(),
            label: status.label(),
            color: status.color(),
        }
    }
}

pub struct StatusSchema;

impl StatusSchema {
    pub fn columns_for(kind: EntityKind) -> Vec<StatusColumn> {
        match kind {
            EntityKind::Employee => columns::<EmployeeStatus>(),
            EntityKind::Candidate => columns::<CandidateStatus>(),
            EntityKind::LeaveRequest => columns::<LeaveStatus>(),
        }
    }

    /// Resolve a wire value. Unknown values are an error, never a default column.
    pub fn lookup(kind: EntityKind, value: &str) -> Result<StatusColumn, SchemaError> {
        Self::columns_for(kind)
            .into_iter()
            .find(|column| column.value == value)
            .ok_or_else(|| SchemaError::UnknownStatus {
                kind,
                id: None,
                value: value.to_string(),
            })
    }
}

fn columns<S: StatusValue>() -> Vec<StatusColumn> {
    S::ORDERED.iter().copied().map(StatusColumn::of).collect()
}

/// Client/server contract drift detected while reading records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{kind} {} carries unknown status '{value}'", display_id(.id))]
    UnknownStatus {
        kind: EntityKind,
        id: Option<EntityId>,
        value: String,
    },
    #[error("{kind} {} has no status", display_id(.id))]
    MissingStatus {
        kind: EntityKind,
        id: Option<EntityId>,
    },
    #[error("{kind} #{id} appears more than once in the collection")]
    DuplicateId { kind: EntityKind, id: EntityId },
}

impl SchemaError {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::UnknownStatus { kind, .. }
            | Self::MissingStatus { kind, .. }
            | Self::DuplicateId { kind, .. } => *kind,
        }
    }

    pub fn record_id(&self) -> Option<EntityId> {
        match self {
            Self::UnknownStatus { id, .. } | Self::MissingStatus { id, .. } => *id,
            Self::DuplicateId { id, .. } => Some(*id),
        }
    }

    pub(crate) fn for_record(self, record: Option<EntityId>) -> Self {
        match self {
            Self::UnknownStatus { kind, value, .. } => Self::UnknownStatus {
                kind,
                id: record,
                value,
            },
            Self::MissingStatus { kind, .. } => Self::MissingStatus { kind, id: record },
            other => other,
        }
    }
}

fn display_id(id: &Option<EntityId>) -> String {
    match id {
        Some(id) => format!("#{id}"),
        None => "without id".to_string(),
    }
}
