//! Status pipelines shared by the employee, recruiting, and leave boards.
//!
//! Each kind declares its ordered status set once ([`StatusValue::ORDERED`]).
//! A [`PipelineStore`] holds the last server snapshot for one kind and answers
//! grouping queries; a [`TransitionController`] performs writes and always
//! reloads the store afterwards instead of patching it locally.

pub mod board;
pub mod candidates;
pub mod domain;
pub mod employees;
pub mod leave;
pub mod remote;
pub mod schema;
pub mod store;
pub mod transition;

#[cfg(test)]
mod tests;

pub use board::{ApprovalItem, ApprovalView, BoardColumnView, BoardView};
pub use candidates::{AiScore, Candidate, CandidateStatus, NewCandidate};
pub use domain::{
    CardView, ColorToken, CreatableEntity, EntityId, EntityKind, PipelineEntity, StatusValue,
};
pub use employees::{ContractType, Employee, EmployeeStatus, EmployeeUser, NewEmployee};
pub use leave::{LeaveRequest, LeaveStatus, LeaveType};
pub use remote::{RemoteCollectionClient, RemoteError};
pub use schema::{SchemaError, StatusColumn, StatusSchema};
pub use store::{
    FetchError, PipelineStore, RefreshOutcome, RefreshTicket, Snapshot, StatusCount,
    StatusFilter, StatusGroup,
};
pub use transition::{
    MutationAction, MutationError, PipelineError, TransitionController, TransitionError,
};
