use crate::commands::{self, BoardKind, EmployeeDraftArgs, CandidateDraftArgs, OutputFormat};
use crate::server;
use clap::{Args, Parser, Subcommand};
use hr_pipeline::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "hr-board",
    about = "Employee, recruiting, and leave boards for a tenant HR workspace",
    version
)]
struct Cli {
    /// Print boards as JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Employee roster grouped by employment status
    Employees {
        #[command(subcommand)]
        command: EmployeeCommand,
    },
    /// Recruiting pipeline grouped by candidate stage
    Candidates {
        #[command(subcommand)]
        command: CandidateCommand,
    },
    /// Leave approval queue
    Leave {
        #[command(subcommand)]
        command: LeaveCommand,
    },
    /// Write a board to CSV
    Export {
        kind: BoardKind,
        /// Destination file (defaults to stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Show the organization behind the configured API host
    Tenant {
        /// Domain under which tenants are served as subdomains
        #[arg(long, default_value = "copilothq.com")]
        base_domain: String,
    },
    /// Exchange account credentials for an API token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand, Debug)]
enum EmployeeCommand {
    /// Show the employee board
    Board,
    /// Add an employee (starts as active)
    Add(EmployeeDraftArgs),
    /// Move an employee to another status
    Move(MoveArgs),
}

#[derive(Subcommand, Debug)]
enum CandidateCommand {
    /// Show the candidate board
    Board,
    /// Add a candidate (starts as applied)
    Add(CandidateDraftArgs),
    /// Move a candidate to another stage
    Move(MoveArgs),
}

#[derive(Subcommand, Debug)]
enum LeaveCommand {
    /// List leave requests
    List {
        /// all, pending, approved, or rejected
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// Approve a pending request
    Approve { id: i64 },
    /// Reject a pending request
    Reject { id: i64 },
}

#[derive(Args, Debug)]
struct MoveArgs {
    id: i64,
    /// Target status value, e.g. `on_leave` or `interview`
    status: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Employees { command } => match command {
            EmployeeCommand::Board => commands::show_board(BoardKind::Employees, format).await,
            EmployeeCommand::Add(args) => commands::add_employee(args, format).await,
            EmployeeCommand::Move(MoveArgs { id, status }) => {
                commands::move_record(BoardKind::Employees, id, &status, format).await
            }
        },
        Command::Candidates { command } => match command {
            CandidateCommand::Board => commands::show_board(BoardKind::Candidates, format).await,
            CandidateCommand::Add(args) => commands::add_candidate(args, format).await,
            CandidateCommand::Move(MoveArgs { id, status }) => {
                commands::move_record(BoardKind::Candidates, id, &status, format).await
            }
        },
        Command::Leave { command } => match command {
            LeaveCommand::List { status } => commands::list_leave(&status, format).await,
            LeaveCommand::Approve { id } => {
                commands::move_record(BoardKind::LeaveRequests, id, "approved", format).await
            }
            LeaveCommand::Reject { id } => {
                commands::move_record(BoardKind::LeaveRequests, id, "rejected", format).await
            }
        },
        Command::Export { kind, output } => commands::export_board(kind, output).await,
        Command::Tenant { base_domain } => commands::show_tenant(&base_domain).await,
        Command::Login { email, password } => commands::login(&email, &password).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definitions_are_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_move_and_export_commands() {
        let cli = Cli::try_parse_from(["hr-board", "candidates", "move", "5", "interview"])
            .expect("move parses");
        assert!(matches!(
            cli.command,
            Some(Command::Candidates {
                command: CandidateCommand::Move(MoveArgs { id: 5, ref status })
            }) if status == "interview"
        ));

        let cli = Cli::try_parse_from(["hr-board", "--json", "export", "leave-requests", "-o", "leave.csv"])
            .expect("export parses");
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Some(Command::Export {
                kind: BoardKind::LeaveRequests,
                output: Some(_)
            })
        ));
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["hr-board"]).expect("bare invocation parses");
        assert!(cli.command.is_none());
    }
}
