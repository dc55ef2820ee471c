use crate::infra::{connect, parse_date};
use crate::views::{render_approvals, render_board};
use chrono::{NaiveDate, Utc};
use clap::{Args, ValueEnum};
use hr_pipeline::client::{self, host_of, resolve_tenant, HttpCollectionClient};
use hr_pipeline::config::AppConfig;
use hr_pipeline::error::AppError;
use hr_pipeline::export::write_board_csv;
use hr_pipeline::pipeline::{
    ApprovalView, BoardView, Candidate, ContractType, CreatableEntity, Employee, EntityId,
    EntityKind, LeaveRequest, LeaveStatus, NewCandidate, NewEmployee, PipelineEntity,
    PipelineError, PipelineStore, StatusFilter, TransitionController,
};
use hr_pipeline::telemetry;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum BoardKind {
    Employees,
    Candidates,
    LeaveRequests,
}

impl BoardKind {
    pub(crate) const fn entity_kind(self) -> EntityKind {
        match self {
            Self::Employees => EntityKind::Employee,
            Self::Candidates => EntityKind::Candidate,
            Self::LeaveRequests => EntityKind::LeaveRequest,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct EmployeeDraftArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) position: String,
    /// Department id
    #[arg(long)]
    pub(crate) department: Option<i64>,
    /// Hire date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) hire_date: Option<NaiveDate>,
    /// full_time, part_time, contract, or intern
    #[arg(long, default_value = "full_time", value_parser = parse_contract_type)]
    pub(crate) contract_type: ContractType,
}

impl EmployeeDraftArgs {
    fn into_draft(self, today: NaiveDate) -> NewEmployee {
        let mut draft = NewEmployee::new(self.email, self.position, self.hire_date.unwrap_or(today))
            .with_contract_type(self.contract_type);
        if let Some(department) = self.department {
            draft = draft.with_department(department);
        }
        draft
    }
}

#[derive(Args, Debug)]
pub(crate) struct CandidateDraftArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) phone: Option<String>,
    #[arg(long)]
    pub(crate) position: Option<String>,
}

impl CandidateDraftArgs {
    fn into_draft(self) -> NewCandidate {
        let mut draft = NewCandidate::new(self.name, self.email);
        if let Some(phone) = self.phone {
            draft = draft.with_phone(phone);
        }
        if let Some(position) = self.position {
            draft = draft.with_position(position);
        }
        draft
    }
}

fn parse_contract_type(raw: &str) -> Result<ContractType, String> {
    ContractType::parse(raw).ok_or_else(|| {
        format!("unknown contract type '{raw}' (expected full_time, part_time, contract, or intern)")
    })
}

fn session() -> Result<Arc<HttpCollectionClient>, AppError> {
    let (config, client) = connect()?;
    telemetry::init(&config.telemetry)?;
    Ok(client)
}

async fn load<E: PipelineEntity>(
    client: Arc<HttpCollectionClient>,
) -> Result<PipelineStore<E, HttpCollectionClient>, AppError> {
    let mut store = PipelineStore::new(client);
    store.refresh().await.map_err(PipelineError::from)?;
    Ok(store)
}

async fn board_for<E: PipelineEntity>(
    client: Arc<HttpCollectionClient>,
) -> Result<BoardView, AppError> {
    let store = load::<E>(client).await?;
    Ok(BoardView::from_store(&store))
}

async fn board_of(kind: BoardKind, client: Arc<HttpCollectionClient>) -> Result<BoardView, AppError> {
    match kind {
        BoardKind::Employees => board_for::<Employee>(client).await,
        BoardKind::Candidates => board_for::<Candidate>(client).await,
        BoardKind::LeaveRequests => board_for::<LeaveRequest>(client).await,
    }
}

async fn create_in<E: CreatableEntity>(
    client: Arc<HttpCollectionClient>,
    draft: &E::Draft,
) -> Result<BoardView, AppError> {
    let mut store = load::<E>(Arc::clone(&client)).await?;
    TransitionController::new(client)
        .create(&mut store, draft)
        .await?;
    Ok(BoardView::from_store(&store))
}

async fn move_in<E: PipelineEntity>(
    client: Arc<HttpCollectionClient>,
    id: EntityId,
    status: &str,
) -> Result<BoardView, AppError> {
    let mut store = load::<E>(Arc::clone(&client)).await?;
    TransitionController::new(client)
        .change_status_named(&mut store, id, status)
        .await?;
    Ok(BoardView::from_store(&store))
}

fn print_board(board: &BoardView, format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Text => print!("{}", render_board(board)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(board)?),
    }
    Ok(())
}

pub(crate) async fn show_board(kind: BoardKind, format: OutputFormat) -> Result<(), AppError> {
    let client = session()?;
    let board = board_of(kind, client).await?;
    print_board(&board, format)
}

pub(crate) async fn add_employee(
    args: EmployeeDraftArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = session()?;
    let draft = args.into_draft(Utc::now().date_naive());
    let board = create_in::<Employee>(client, &draft).await?;
    if format == OutputFormat::Text {
        println!("Added {} as {}\n", draft.email, draft.position);
    }
    print_board(&board, format)
}

pub(crate) async fn add_candidate(
    args: CandidateDraftArgs,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = session()?;
    let draft = args.into_draft();
    let board = create_in::<Candidate>(client, &draft).await?;
    if format == OutputFormat::Text {
        println!("Added candidate {}\n", draft.name);
    }
    print_board(&board, format)
}

pub(crate) async fn move_record(
    kind: BoardKind,
    id: i64,
    status: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = session()?;
    let id = EntityId(id);
    let board = match kind {
        BoardKind::Employees => move_in::<Employee>(client, id, status).await?,
        BoardKind::Candidates => move_in::<Candidate>(client, id, status).await?,
        BoardKind::LeaveRequests => move_in::<LeaveRequest>(client, id, status).await?,
    };
    if format == OutputFormat::Text {
        println!("Moved {} #{id} to {status}\n", kind.entity_kind());
    }
    print_board(&board, format)
}

pub(crate) async fn list_leave(status: &str, format: OutputFormat) -> Result<(), AppError> {
    let filter = StatusFilter::<LeaveStatus>::parse(status).map_err(PipelineError::from)?;
    let client = session()?;
    let store = load::<LeaveRequest>(client).await?;
    let view = ApprovalView::from_store(&store, filter);
    match format {
        OutputFormat::Text => print!("{}", render_approvals(&view)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }
    Ok(())
}

pub(crate) async fn export_board(kind: BoardKind, output: Option<PathBuf>) -> Result<(), AppError> {
    let client = session()?;
    let board = board_of(kind, client).await?;

    let rows = match &output {
        Some(path) => write_board_csv(&board, BufWriter::new(File::create(path)?))?,
        None => write_board_csv(&board, io::stdout().lock())?,
    };
    info!(kind = %board.kind, rows, path = ?output, "board exported");
    Ok(())
}

pub(crate) async fn show_tenant(base_domain: &str) -> Result<(), AppError> {
    let client = session()?;
    let info = client.tenant_info().await?;
    println!("Organization: {}", info.name);
    println!("Schema:       {}", info.schema_name);

    if let Some(host) = host_of(client.base_url()) {
        let resolved = resolve_tenant(&host, base_domain);
        println!("Host {host} routes to schema '{}'", resolved.schema_name());
    }
    Ok(())
}

pub(crate) async fn login(email: &str, password: &str) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let credential = client::login(
        &config.api.base_url,
        email,
        password,
        config.api.auth_scheme,
        config.api.timeout,
    )
    .await?;
    info!(scheme = ?credential.scheme(), "login succeeded");
    println!("APP_API_TOKEN={}", credential.token());
    Ok(())
}
