use crate::infra::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use hr_pipeline::error::AppError;
use hr_pipeline::pipeline::{
    ApprovalView, BoardView, Candidate, CreatableEntity, Employee, EntityId, LeaveRequest,
    LeaveStatus, PipelineEntity, PipelineError, PipelineStore, RemoteCollectionClient,
    StatusFilter, TransitionController,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChangeRequest {
    pub(crate) status: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApprovalQuery {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

/// Board endpoints. Every request builds and refreshes its own store.
pub(crate) fn board_router<C>(client: Arc<C>) -> Router
where
    C: RemoteCollectionClient + 'static,
{
    Router::new()
        .route(
            "/api/v1/boards/employees",
            get(board_handler::<Employee, C>).post(create_handler::<Employee, C>),
        )
        .route(
            "/api/v1/boards/candidates",
            get(board_handler::<Candidate, C>).post(create_handler::<Candidate, C>),
        )
        .route(
            "/api/v1/boards/leave-requests",
            get(board_handler::<LeaveRequest, C>),
        )
        .route(
            "/api/v1/boards/employees/:id/status",
            post(status_handler::<Employee, C>),
        )
        .route(
            "/api/v1/boards/candidates/:id/status",
            post(status_handler::<Candidate, C>),
        )
        .route(
            "/api/v1/boards/leave-requests/:id/status",
            post(status_handler::<LeaveRequest, C>),
        )
        .route("/api/v1/leave-requests", get(approvals_handler::<C>))
        .with_state(client)
}

pub(crate) fn with_board_routes<C>(client: Arc<C>) -> Router
where
    C: RemoteCollectionClient + 'static,
{
    board_router(client)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

async fn loaded_store<E, C>(client: Arc<C>) -> Result<PipelineStore<E, C>, AppError>
where
    E: PipelineEntity,
    C: RemoteCollectionClient + 'static,
{
    let mut store = PipelineStore::new(client);
    store.refresh().await.map_err(PipelineError::from)?;
    Ok(store)
}

pub(crate) async fn board_handler<E, C>(
    State(client): State<Arc<C>>,
) -> Result<Json<BoardView>, AppError>
where
    E: PipelineEntity,
    C: RemoteCollectionClient + 'static,
{
    let store = loaded_store::<E, C>(client).await?;
    Ok(Json(BoardView::from_store(&store)))
}

pub(crate) async fn create_handler<E, C>(
    State(client): State<Arc<C>>,
    Json(draft): Json<E::Draft>,
) -> Result<(StatusCode, Json<BoardView>), AppError>
where
    E: CreatableEntity,
    E::Draft: DeserializeOwned,
    C: RemoteCollectionClient + 'static,
{
    let mut store = loaded_store::<E, C>(Arc::clone(&client)).await?;
    TransitionController::new(client)
        .create(&mut store, &draft)
        .await?;
    Ok((StatusCode::CREATED, Json(BoardView::from_store(&store))))
}

pub(crate) async fn status_handler<E, C>(
    State(client): State<Arc<C>>,
    Path(id): Path<i64>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<BoardView>, AppError>
where
    E: PipelineEntity,
    C: RemoteCollectionClient + 'static,
{
    let mut store = loaded_store::<E, C>(Arc::clone(&client)).await?;
    TransitionController::new(client)
        .change_status_named(&mut store, EntityId(id), &request.status)
        .await?;
    Ok(Json(BoardView::from_store(&store)))
}

pub(crate) async fn approvals_handler<C>(
    State(client): State<Arc<C>>,
    Query(query): Query<ApprovalQuery>,
) -> Result<Json<ApprovalView>, AppError>
where
    C: RemoteCollectionClient + 'static,
{
    let filter = match query.status.as_deref() {
        Some(raw) => StatusFilter::<LeaveStatus>::parse(raw).map_err(PipelineError::from)?,
        None => StatusFilter::All,
    };
    let store = loaded_store::<LeaveRequest, C>(client).await?;
    Ok(Json(ApprovalView::from_store(&store, filter)))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use hr_pipeline::pipeline::{EntityKind, RemoteError};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Minimal API double: serves seeded collections, applies patches, records writes.
    #[derive(Default)]
    struct SeededCollection {
        records: Mutex<HashMap<EntityKind, Vec<Value>>>,
        writes: Mutex<Vec<(EntityKind, Value)>>,
        reject_creates: bool,
    }

    impl SeededCollection {
        fn with(kind: EntityKind, records: Vec<Value>) -> Self {
            let collection = Self::default();
            collection
                .records
                .lock()
                .expect("records mutex poisoned")
                .insert(kind, records);
            collection
        }

        fn writes(&self) -> Vec<(EntityKind, Value)> {
            self.writes.lock().expect("writes mutex poisoned").clone()
        }
    }

    #[async_trait]
    impl RemoteCollectionClient for SeededCollection {
        async fn fetch_all(&self, kind: EntityKind) -> Result<Vec<Value>, RemoteError> {
            let guard = self.records.lock().expect("records mutex poisoned");
            Ok(guard.get(&kind).cloned().unwrap_or_default())
        }

        async fn create(&self, kind: EntityKind, body: Value) -> Result<Value, RemoteError> {
            self.writes
                .lock()
                .expect("writes mutex poisoned")
                .push((kind, body.clone()));
            if self.reject_creates {
                return Err(RemoteError::Status {
                    status: 400,
                    body: r#"{"email":["Enter a valid email address."]}"#.to_string(),
                });
            }
            let mut guard = self.records.lock().expect("records mutex poisoned");
            let records = guard.entry(kind).or_default();
            let mut created = body;
            created["id"] = json!(records.len() as i64 + 100);
            records.push(created.clone());
            Ok(created)
        }

        async fn update(
            &self,
            kind: EntityKind,
            id: EntityId,
            body: Value,
        ) -> Result<Value, RemoteError> {
            self.writes
                .lock()
                .expect("writes mutex poisoned")
                .push((kind, body.clone()));
            let mut guard = self.records.lock().expect("records mutex poisoned");
            let record = guard
                .get_mut(&kind)
                .and_then(|records| {
                    records
                        .iter_mut()
                        .find(|record| record["id"].as_i64() == Some(id.0))
                })
                .ok_or_else(|| RemoteError::Status {
                    status: 404,
                    body: "not found".to_string(),
                })?;
            if let (Value::Object(fields), Value::Object(patch)) = (record, body) {
                fields.extend(patch);
                return Ok(Value::Object(fields.clone()));
            }
            Err(RemoteError::Decode("patch must be an object".to_string()))
        }
    }

    fn candidates() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "Ada", "email": "ada@example.com", "status": "applied", "ai_score": 0}),
            json!({"id": 2, "name": "Bo", "email": "bo@example.com", "status": "offer", "ai_score": 74}),
        ]
    }

    fn leave_requests() -> Vec<Value> {
        ["pending", "approved"]
            .iter()
            .enumerate()
            .map(|(index, status)| {
                json!({
                    "id": index + 1,
                    "employee_email": "ana@acme.com",
                    "leave_type": "personal",
                    "start_date": "2025-05-05",
                    "end_date": "2025-05-06",
                    "days_requested": 2,
                    "status": status,
                    "created_at": "2025-05-01T08:00:00Z"
                })
            })
            .collect()
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn candidate_board_lists_every_column() {
        let client = Arc::new(SeededCollection::with(EntityKind::Candidate, candidates()));
        let response = board_router(client)
            .oneshot(
                Request::get("/api/v1/boards/candidates")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["title"], "Candidates");
        assert_eq!(body["columns"].as_array().map(Vec::len), Some(6));
        assert_eq!(body["columns"][3]["cards"][0]["badges"], json!(["AI 74"]));
        assert!(body["columns"][0]["cards"][0].get("badges").is_none());
    }

    #[tokio::test]
    async fn create_returns_created_board() {
        let client = Arc::new(SeededCollection::with(EntityKind::Candidate, candidates()));
        let response = board_router(Arc::clone(&client))
            .oneshot(post_json(
                "/api/v1/boards/candidates",
                json!({"name": "Cy", "email": "cy@example.com", "phone": ""}),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            client.writes(),
            vec![(
                EntityKind::Candidate,
                json!({"name": "Cy", "email": "cy@example.com", "status": "applied"})
            )]
        );
        let body = read_json_body(response).await;
        assert_eq!(body["total"], 3);
    }

    #[tokio::test]
    async fn rejected_create_is_unprocessable() {
        let client = Arc::new(SeededCollection {
            reject_creates: true,
            ..SeededCollection::with(EntityKind::Candidate, candidates())
        });
        let response = board_router(client)
            .oneshot(post_json(
                "/api/v1/boards/candidates",
                json!({"name": "", "email": "bad"}),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = read_json_body(response).await;
        assert!(body["error"]
            .as_str()
            .is_some_and(|message| message.contains("valid email")));
    }

    #[tokio::test]
    async fn terminal_leave_request_cannot_be_moved() {
        let client = Arc::new(SeededCollection::with(
            EntityKind::LeaveRequest,
            leave_requests(),
        ));
        let response = board_router(Arc::clone(&client))
            .oneshot(post_json(
                "/api/v1/boards/leave-requests/2/status",
                json!({"status": "rejected"}),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(client.writes().is_empty());
    }

    #[tokio::test]
    async fn unknown_status_name_is_unprocessable() {
        let client = Arc::new(SeededCollection::with(EntityKind::Candidate, candidates()));
        let response = board_router(Arc::clone(&client))
            .oneshot(post_json(
                "/api/v1/boards/candidates/1/status",
                json!({"status": "ghosted"}),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(client.writes().is_empty());
    }

    #[tokio::test]
    async fn moving_an_absent_record_is_not_found() {
        let client = Arc::new(SeededCollection::with(EntityKind::Candidate, candidates()));
        let response = board_router(Arc::clone(&client))
            .oneshot(post_json(
                "/api/v1/boards/candidates/404/status",
                json!({"status": "screening"}),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(client.writes().is_empty());
    }

    #[tokio::test]
    async fn approval_list_filters_by_status() {
        let client = Arc::new(SeededCollection::with(
            EntityKind::LeaveRequest,
            leave_requests(),
        ));
        let response = board_router(client)
            .oneshot(
                Request::get("/api/v1/leave-requests?status=pending")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["filter"], "pending");
        assert_eq!(body["pending"], 1);
        assert_eq!(body["requests"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["requests"][0]["actionable"], true);
    }

    #[tokio::test]
    async fn approving_pending_request_returns_refreshed_board() {
        let client = Arc::new(SeededCollection::with(
            EntityKind::LeaveRequest,
            leave_requests(),
        ));
        let response = board_router(Arc::clone(&client))
            .oneshot(post_json(
                "/api/v1/boards/leave-requests/1/status",
                json!({"status": "approved"}),
            ))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json_body(response).await;
        assert_eq!(body["columns"][0]["count"], 0);
        assert_eq!(body["columns"][1]["count"], 2);

        let writes = client.writes();
        assert_eq!(writes.len(), 1);
        assert!(writes[0].1["reviewed_at"].is_string());
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_tracks_startup_flag() {
        let readiness = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let state = AppState {
            readiness: Arc::clone(&readiness),
            metrics: Arc::new(
                metrics_exporter_prometheus::PrometheusBuilder::new()
                    .build_recorder()
                    .handle(),
            ),
        };
        let app = with_board_routes(Arc::new(SeededCollection::default()))
            .layer(Extension(state));

        let response = app
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        readiness.store(true, std::sync::atomic::Ordering::Release);
        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request builds"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json_body(response).await["status"], "ready");
    }
}
