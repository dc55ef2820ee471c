use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use super::domain::{CardView, ColorToken, EntityId, EntityKind, PipelineEntity, StatusValue};

/// Approval lifecycle. `Pending` is the only state with outgoing edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl StatusValue for LeaveStatus {
    const KIND: EntityKind = EntityKind::LeaveRequest;
    const ORDERED: &'static [Self] = &[Self::Pending, Self::Approved, Self::Rejected];

    fn value(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    fn color(self) -> ColorToken {
        match self {
            Self::Pending => ColorToken::Amber,
            Self::Approved => ColorToken::Green,
            Self::Rejected => ColorToken::Red,
        }
    }

    fn permits(from: Self, to: Self) -> bool {
        matches!(
            (from, to),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Maternity,
    Paternity,
    Unpaid,
}

impl LeaveType {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Annual,
            Self::Sick,
            Self::Personal,
            Self::Maternity,
            Self::Paternity,
            Self::Unpaid,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Annual => "Annual Leave",
            Self::Sick => "Sick Leave",
            Self::Personal => "Personal Leave",
            Self::Maternity => "Maternity Leave",
            Self::Paternity => "Paternity Leave",
            Self::Unpaid => "Unpaid Leave",
        }
    }

    pub const fn color(self) -> ColorToken {
        match self {
            Self::Annual => ColorToken::Blue,
            Self::Sick => ColorToken::Red,
            Self::Personal => ColorToken::Purple,
            Self::Maternity => ColorToken::Pink,
            Self::Paternity => ColorToken::Cyan,
            Self::Unpaid => ColorToken::Gray,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub id: EntityId,
    #[serde(default)]
    pub employee: Option<i64>,
    pub employee_email: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days_requested: u32,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    pub fn is_reviewed(&self) -> bool {
        self.reviewed_at.is_some()
    }

    /// Inclusive day count between the start and end dates.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

impl PipelineEntity for LeaveRequest {
    type Status = LeaveStatus;

    fn id(&self) -> EntityId {
        self.id
    }

    fn status(&self) -> LeaveStatus {
        self.status
    }

    fn card(&self) -> CardView {
        let days = if self.days_requested == 1 { "day" } else { "days" };
        CardView {
            id: self.id,
            title: self.employee_email.clone(),
            subtitle: format!(
                "{} · {} → {} ({} {days})",
                self.leave_type.label(),
                self.start_date,
                self.end_date,
                self.days_requested
            ),
            badges: vec![self.status.label().to_string()],
            note: self.reason.as_ref().map(|reason| format!("\"{reason}\"")),
        }
    }

    fn status_patch(to: LeaveStatus, at: DateTime<Utc>) -> serde_json::Value {
        json!({
            "status": to,
            "reviewed_at": at.to_rfc3339(),
        })
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}
