use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::schema::SchemaError;

/// Server-assigned record identifier, stable for the lifetime of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three record categories managed as status pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Employee,
    Candidate,
    LeaveRequest,
}

impl EntityKind {
    pub const fn ordered() -> [Self; 3] {
        [Self::Employee, Self::Candidate, Self::LeaveRequest]
    }

    /// Collection segment below the tenant API root, without slashes.
    pub const fn collection_path(self) -> &'static str {
        match self {
            Self::Employee => "employees",
            Self::Candidate => "candidates",
            Self::LeaveRequest => "leave-requests",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Employee => "Employees",
            Self::Candidate => "Candidates",
            Self::LeaveRequest => "Leave Requests",
        }
    }

    pub fn from_collection_path(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|kind| kind.collection_path() == value.trim_matches('/'))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Employee => "employee",
            Self::Candidate => "candidate",
            Self::LeaveRequest => "leave request",
        })
    }
}

/// Display grouping color shared by board columns and badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorToken {
    Slate,
    Blue,
    Purple,
    Amber,
    Green,
    Red,
    Pink,
    Cyan,
    Gray,
}

impl ColorToken {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slate => "slate",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Amber => "amber",
            Self::Green => "green",
            Self::Red => "red",
            Self::Pink => "pink",
            Self::Cyan => "cyan",
            Self::Gray => "gray",
        }
    }
}

/// A kind-specific, finite lifecycle value.
///
/// `ORDERED` is the board column order and the only place a status set is
/// declared; parsing, labelling, and grouping all derive from it.
pub trait StatusValue:
    Copy + Eq + Hash + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: EntityKind;
    const ORDERED: &'static [Self];

    /// Wire value as sent and received by the API.
    fn value(self) -> &'static str;
    fn label(self) -> &'static str;
    fn color(self) -> ColorToken;

    /// Whether the client offers a transition from `from` to `to`.
    fn permits(_from: Self, _to: Self) -> bool {
        true
    }

    fn position(self) -> usize {
        Self::ORDERED
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(Self::ORDERED.len())
    }

    /// Exact wire-value match; callers trim user input themselves.
    fn parse(value: &str) -> Result<Self, SchemaError> {
        Self::ORDERED
            .iter()
            .copied()
            .find(|status| status.value() == value)
            .ok_or_else(|| SchemaError::UnknownStatus {
                kind: Self::KIND,
                id: None,
                value: value.to_string(),
            })
    }
}

/// Presentation-neutral summary of a record as it appears on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub id: EntityId,
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A record managed by a [`PipelineStore`](super::store::PipelineStore).
pub trait PipelineEntity:
    Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    type Status: StatusValue;

    fn id(&self) -> EntityId;
    fn status(&self) -> Self::Status;
    fn card(&self) -> CardView;

    fn kind() -> EntityKind {
        Self::Status::KIND
    }

    /// Partial update body submitted for a status change.
    fn status_patch(to: Self::Status, _at: DateTime<Utc>) -> serde_json::Value {
        json!({ "status": to })
    }
}

/// Records this client may create. The initial status is never supplied by the caller.
pub trait CreatableEntity: PipelineEntity {
    type Draft: Serialize + fmt::Debug + Send + Sync;

    fn initial_status() -> Self::Status;
}

/// Body posted on create: the draft attributes plus the kind's initial status.
#[derive(Debug, Serialize)]
pub(crate) struct CreatePayload<'a, D: Serialize, S: Serialize> {
    #[serde(flatten)]
    pub(crate) draft: &'a D,
    pub(crate) status: S,
}
