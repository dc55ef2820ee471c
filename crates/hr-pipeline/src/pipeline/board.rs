use serde::Serialize;

use super::domain::{CardView, ColorToken, EntityKind, PipelineEntity, StatusValue};
use super::leave::{LeaveRequest, LeaveStatus};
use super::remote::RemoteCollectionClient;
use super::store::{PipelineStore, StatusFilter};

#[derive(Debug, Clone, Serialize)]
pub struct BoardColumnView {
    pub status: &'static str,
    pub label: &'static str,
    pub color: ColorToken,
    pub count: usize,
    pub cards: Vec<CardView>,
}

/// Kanban rendering of a store: one column per schema status.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub kind: EntityKind,
    pub title: &'static str,
    pub total: usize,
    pub generation: u64,
    pub columns: Vec<BoardColumnView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl BoardView {
    pub fn from_store<E, C>(store: &PipelineStore<E, C>) -> Self
    where
        E: PipelineEntity,
        C: RemoteCollectionClient + ?Sized,
    {
        let columns: Vec<BoardColumnView> = store
            .grouped_by_status()
            .into_iter()
            .map(|group| BoardColumnView {
                status: group.status.value(),
                label: group.status.label(),
                color: group.status.color(),
                count: group.len(),
                cards: group.entities.iter().map(|entity| entity.card()).collect(),
            })
            .collect();

        Self {
            kind: E::kind(),
            title: E::kind().label(),
            total: columns.iter().map(|column| column.count).sum(),
            generation: store.snapshot().generation(),
            columns,
            diagnostics: store
                .diagnostics()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }

    pub fn column(&self, status: &str) -> Option<&BoardColumnView> {
        self.columns.iter().find(|column| column.status == status)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalItem {
    pub card: CardView,
    pub status: LeaveStatus,
    pub status_color: ColorToken,
    pub leave_type: &'static str,
    pub leave_type_color: ColorToken,
    /// Approve/reject actions are offered only while pending.
    pub actionable: bool,
}

/// Filterable leave list with the pending badge.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalView {
    pub filter: &'static str,
    pub pending: usize,
    pub requests: Vec<ApprovalItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl ApprovalView {
    pub fn from_store<C>(
        store: &PipelineStore<LeaveRequest, C>,
        filter: StatusFilter<LeaveStatus>,
    ) -> Self
    where
        C: RemoteCollectionClient + ?Sized,
    {
        let requests = store
            .filtered_by_status(filter)
            .into_iter()
            .map(|request| ApprovalItem {
                card: request.card(),
                status: request.status,
                status_color: request.status.color(),
                leave_type: request.leave_type.label(),
                leave_type_color: request.leave_type.color(),
                actionable: !request.status.is_terminal(),
            })
            .collect();

        Self {
            filter: match filter {
                StatusFilter::All => "all",
                StatusFilter::Only(status) => status.value(),
            },
            pending: store.count(LeaveStatus::Pending),
            requests,
            diagnostics: store
                .diagnostics()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}
