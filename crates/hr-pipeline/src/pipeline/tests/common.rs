use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::pipeline::{
    Candidate, Employee, EntityId, EntityKind, LeaveRequest, PipelineStore,
    RemoteCollectionClient, RemoteError,
};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Call {
    Fetch(EntityKind),
    Create(EntityKind, Value),
    Update(EntityKind, EntityId, Value),
}

/// Server double: holds raw records per kind, assigns ids on create, merges patches.
#[derive(Default, Clone)]
pub(super) struct MemoryCollection {
    records: Arc<Mutex<HashMap<EntityKind, Vec<Value>>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    write_failure: Arc<Mutex<Option<RemoteError>>>,
    fetch_failure: Arc<Mutex<Option<RemoteError>>>,
}

impl MemoryCollection {
    pub(super) fn with_records(kind: EntityKind, records: Vec<Value>) -> Self {
        let collection = Self::default();
        collection.seed(kind, records);
        collection
    }

    pub(super) fn seed(&self, kind: EntityKind, records: Vec<Value>) {
        self.records
            .lock()
            .expect("records mutex poisoned")
            .insert(kind, records);
    }

    pub(super) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(super) fn clear_calls(&self) {
        self.calls.lock().expect("calls mutex poisoned").clear();
    }

    pub(super) fn reject_writes(&self, error: RemoteError) {
        *self.write_failure.lock().expect("failure mutex poisoned") = Some(error);
    }

    pub(super) fn fail_fetches(&self, error: RemoteError) {
        *self.fetch_failure.lock().expect("failure mutex poisoned") = Some(error);
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls mutex poisoned").push(call);
    }
}

#[async_trait]
impl RemoteCollectionClient for MemoryCollection {
    async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Value>, RemoteError> {
        self.record(Call::Fetch(kind));
        if let Some(error) = self.fetch_failure.lock().expect("failure mutex poisoned").clone() {
            return Err(error);
        }
        let guard = self.records.lock().expect("records mutex poisoned");
        Ok(guard.get(&kind).cloned().unwrap_or_default())
    }

    async fn create(&self, kind: EntityKind, body: Value) -> Result<Value, RemoteError> {
        self.record(Call::Create(kind, body.clone()));
        if let Some(error) = self.write_failure.lock().expect("failure mutex poisoned").clone() {
            return Err(error);
        }

        let mut guard = self.records.lock().expect("records mutex poisoned");
        let records = guard.entry(kind).or_default();
        let next_id = records
            .iter()
            .filter_map(|record| record.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;

        let mut created = body;
        if let Value::Object(fields) = &mut created {
            fields.insert("id".to_string(), json!(next_id));
            if kind == EntityKind::Employee {
                if let Some(email) = fields.remove("email") {
                    fields.insert("user".to_string(), json!({ "email": email }));
                }
            }
        }
        records.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        kind: EntityKind,
        id: EntityId,
        body: Value,
    ) -> Result<Value, RemoteError> {
        self.record(Call::Update(kind, id, body.clone()));
        if let Some(error) = self.write_failure.lock().expect("failure mutex poisoned").clone() {
            return Err(error);
        }

        let mut guard = self.records.lock().expect("records mutex poisoned");
        let record = guard
            .get_mut(&kind)
            .and_then(|records| {
                records
                    .iter_mut()
                    .find(|record| record.get("id").and_then(Value::as_i64) == Some(id.0))
            })
            .ok_or_else(|| RemoteError::Status {
                status: 404,
                body: r#"{"detail":"Not found."}"#.to_string(),
            })?;

        if let (Value::Object(fields), Value::Object(patch)) = (record, body) {
            fields.extend(patch);
            return Ok(Value::Object(fields.clone()));
        }
        Err(RemoteError::Decode("patch body must be an object".to_string()))
    }
}

pub(super) fn employee(id: i64, email: &str, status: &str) -> Value {
    json!({
        "id": id,
        "user": { "email": email },
        "department": 2,
        "department_name": "Operations",
        "position": "Coordinator",
        "contract_type": "full_time",
        "hire_date": "2024-03-01",
        "status": status,
        "phone": null,
        "profile_photo": null,
        "created_at": "2024-03-01T09:00:00Z"
    })
}

pub(super) fn candidate(id: i64, name: &str, status: &str, ai_score: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_ascii_lowercase().replace(' ', ".")),
        "phone": null,
        "position": "Leasing Agent",
        "linkedin_url": null,
        "job_title": null,
        "status": status,
        "ai_score": ai_score,
        "created_at": "2025-01-10T12:00:00Z"
    })
}

pub(super) fn leave(id: i64, email: &str, status: &str) -> Value {
    let reviewed_at = if status == "pending" {
        Value::Null
    } else {
        json!("2025-02-02T08:30:00Z")
    };
    json!({
        "id": id,
        "employee": id,
        "employee_email": email,
        "leave_type": "annual",
        "start_date": "2025-02-10",
        "end_date": "2025-02-12",
        "days_requested": 3,
        "reason": "Family visit",
        "status": status,
        "created_at": "2025-02-01T10:00:00Z",
        "reviewed_at": reviewed_at
    })
}

pub(super) fn employee_roster() -> Vec<Value> {
    vec![
        employee(1, "ana@acme.com", "active"),
        employee(2, "ben@acme.com", "terminated"),
        employee(3, "cho@acme.com", "active"),
    ]
}

pub(super) fn candidate_pipeline() -> Vec<Value> {
    vec![
        candidate(4, "Dana Reyes", "applied", 0),
        candidate(5, "Eli Park", "screening", 82),
        candidate(6, "Fay Moss", "offer", 67),
        candidate(7, "Gus Hale", "screening", 0),
    ]
}

pub(super) fn leave_queue() -> Vec<Value> {
    vec![
        leave(10, "ana@acme.com", "pending"),
        leave(11, "ben@acme.com", "approved"),
        leave(12, "cho@acme.com", "pending"),
    ]
}

pub(super) async fn loaded_employees(
    collection: &Arc<MemoryCollection>,
) -> PipelineStore<Employee, MemoryCollection> {
    let mut store = PipelineStore::new(Arc::clone(collection));
    store.refresh().await.expect("employee refresh");
    store
}

pub(super) async fn loaded_candidates(
    collection: &Arc<MemoryCollection>,
) -> PipelineStore<Candidate, MemoryCollection> {
    let mut store = PipelineStore::new(Arc::clone(collection));
    store.refresh().await.expect("candidate refresh");
    store
}

pub(super) async fn loaded_leave(
    collection: &Arc<MemoryCollection>,
) -> PipelineStore<LeaveRequest, MemoryCollection> {
    let mut store = PipelineStore::new(Arc::clone(collection));
    store.refresh().await.expect("leave refresh");
    store
}

pub(super) fn ids<'a, E>(entities: impl IntoIterator<Item = &'a E>) -> Vec<i64>
where
    E: crate::pipeline::PipelineEntity + 'a,
{
    entities.into_iter().map(|entity| entity.id().0).collect()
}
