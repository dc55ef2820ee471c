use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CardView, ColorToken, CreatableEntity, EntityId, EntityKind, PipelineEntity, StatusValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    OnLeave,
    Terminated,
}

impl StatusValue for EmployeeStatus {
    const KIND: EntityKind = EntityKind::Employee;
    const ORDERED: &'static [Self] = &[Self::Active, Self::OnLeave, Self::Terminated];

    fn value(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnLeave => "on_leave",
            Self::Terminated => "terminated",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Active => "Active Staff",
            Self::OnLeave => "On Leave",
            Self::Terminated => "Terminated",
        }
    }

    fn color(self) -> ColorToken {
        match self {
            Self::Active => ColorToken::Green,
            Self::OnLeave => ColorToken::Amber,
            Self::Terminated => ColorToken::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Intern,
}

impl ContractType {
    pub const fn ordered() -> [Self; 4] {
        [Self::FullTime, Self::PartTime, Self::Contract, Self::Intern]
    }

    pub const fn value(self) -> &'static str {
        match self {
            Self::FullTime => "full_time",
            Self::PartTime => "part_time",
            Self::Contract => "contract",
            Self::Intern => "intern",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FullTime => "Full Time",
            Self::PartTime => "Part Time",
            Self::Contract => "Contract",
            Self::Intern => "Intern",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|contract| contract.value() == value.trim())
    }
}

/// Login account nested in an employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeUser {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EntityId,
    pub user: EmployeeUser,
    #[serde(default)]
    pub department: Option<i64>,
    #[serde(default)]
    pub department_name: Option<String>,
    pub position: String,
    #[serde(default)]
    pub contract_type: ContractType,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn department_label(&self) -> &str {
        match self.department_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "No Dept",
        }
    }
}

impl PipelineEntity for Employee {
    type Status = EmployeeStatus;

    fn id(&self) -> EntityId {
        self.id
    }

    fn status(&self) -> EmployeeStatus {
        self.status
    }

    fn card(&self) -> CardView {
        CardView {
            id: self.id,
            title: self.user.email.clone(),
            subtitle: self.position.clone(),
            badges: vec![
                self.department_label().to_string(),
                self.contract_type.label().to_string(),
            ],
            note: Some(format!("hired {}", self.hire_date)),
        }
    }
}

/// Attributes collected by the add-employee form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub email: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<i64>,
    #[serde(default = "today")]
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub contract_type: ContractType,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl NewEmployee {
    pub fn new(email: impl Into<String>, position: impl Into<String>, hire_date: NaiveDate) -> Self {
        Self {
            email: email.into(),
            position: position.into(),
            department: None,
            hire_date,
            contract_type: ContractType::default(),
        }
    }

    pub fn with_department(mut self, department: i64) -> Self {
        self.department = Some(department);
        self
    }

    pub fn with_contract_type(mut self, contract_type: ContractType) -> Self {
        self.contract_type = contract_type;
        self
    }
}

impl CreatableEntity for Employee {
    type Draft = NewEmployee;

    fn initial_status() -> EmployeeStatus {
        EmployeeStatus::Active
    }
}
