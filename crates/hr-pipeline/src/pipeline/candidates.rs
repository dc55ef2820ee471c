use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{CardView, ColorToken, CreatableEntity, EntityId, EntityKind, PipelineEntity, StatusValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Applied,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl StatusValue for CandidateStatus {
    const KIND: EntityKind = EntityKind::Candidate;
    const ORDERED: &'static [Self] = &[
        Self::Applied,
        Self::Screening,
        Self::Interview,
        Self::Offer,
        Self::Hired,
        Self::Rejected,
    ];

    fn value(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Screening => "screening",
            Self::Interview => "interview",
            Self::Offer => "offer",
            Self::Hired => "hired",
            Self::Rejected => "rejected",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Screening => "Screening",
            Self::Interview => "Interview",
            Self::Offer => "Offer",
            Self::Hired => "Hired",
            Self::Rejected => "Rejected",
        }
    }

    fn color(self) -> ColorToken {
        match self {
            Self::Applied => ColorToken::Slate,
            Self::Screening => ColorToken::Blue,
            Self::Interview => ColorToken::Purple,
            Self::Offer => ColorToken::Amber,
            Self::Hired => ColorToken::Green,
            Self::Rejected => ColorToken::Red,
        }
    }
}

/// Screening score assigned by the recruiting agent. Zero means not yet scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AiScore(pub u32);

impl AiScore {
    pub const UNSCORED: Self = Self(0);

    pub fn scored(self) -> Option<u32> {
        (self.0 > 0).then_some(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    pub status: CandidateStatus,
    #[serde(default)]
    pub ai_score: AiScore,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl PipelineEntity for Candidate {
    type Status = CandidateStatus;

    fn id(&self) -> EntityId {
        self.id
    }

    fn status(&self) -> CandidateStatus {
        self.status
    }

    fn card(&self) -> CardView {
        let subtitle = [self.position.as_deref(), self.job_title.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.trim().is_empty())
            .unwrap_or("No position")
            .to_string();

        let mut badges = Vec::new();
        if let Some(score) = self.ai_score.scored() {
            badges.push(format!("AI {score}"));
        }

        CardView {
            id: self.id,
            title: self.name.clone(),
            subtitle,
            badges,
            note: Some(self.email.clone()),
        }
    }
}

/// Attributes collected by the add-candidate form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCandidate {
    pub name: String,
    pub email: String,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<String>,
}

impl NewCandidate {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            position: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = non_blank(phone.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = non_blank(position.into());
        self
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(non_blank))
}

impl CreatableEntity for Candidate {
    type Draft = NewCandidate;

    fn initial_status() -> CandidateStatus {
        CandidateStatus::Applied
    }
}
