mod commands;
mod config;
mod render;

use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use entity::EmployeeStatus;
use platform_api::{ApiError, EmployeeForm};
use platform_authn::AuthnService;
use platform_db::FileSlot;
use platform_obs::{ObsConfig, init_tracing, shutdown_tracing};
use products_hr::EmployeeFilter;
use tracing::{debug, error, warn};

use crate::{commands::Console, config::AppConfig};

#[derive(Parser, Debug)]
#[command(name = "hr-console", version, about = "Employee management console")]
struct Cli {
    /// Directory holding the persisted slots (overrides HR_DATA_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with one of the configured accounts.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the signed-in user.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// List employees, optionally filtered.
    List(ListCommand),
    /// Show one employee with tenure.
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Create an employee.
    Add(FormArgs),
    /// Change fields of an employee; omitted fields are left alone.
    Update {
        id: String,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete an employee.
    Delete { id: String },
    /// Dashboard statistics.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Replace the employee list with the example records.
    Seed,
}

#[derive(Args, Debug)]
struct ListCommand {
    /// Case-insensitive match on name, email or position.
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    department: Option<String>,
    /// Status name, English or Spanish.
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    json: bool,
}

impl ListCommand {
    fn filter(&self) -> EmployeeFilter {
        let mut filter = EmployeeFilter::default();
        if let Some(search) = &self.search {
            filter = filter.search(search.as_str());
        }
        if let Some(department) = &self.department {
            filter = filter.department(department.as_str());
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            filter = filter.status(EmployeeStatus::parse(status));
        }
        filter
    }
}

#[derive(Args, Debug, Default)]
struct FormArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    salary: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    hire_date: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    emergency_contact: Option<String>,
    #[arg(long)]
    emergency_phone: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

impl From<FormArgs> for EmployeeForm {
    fn from(args: FormArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            position: args.position,
            department: args.department,
            salary: args.salary,
            hire_date: args.hire_date,
            status: args.status,
            address: args.address,
            emergency_contact: args.emergency_contact,
            emergency_phone: args.emergency_phone,
            notes: args.notes,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::load()?.with_data_dir(cli.data_dir.clone());

    init_tracing(ObsConfig {
        env_filter: config.log_filter.clone(),
        otlp_endpoint: config.otlp_endpoint.clone(),
        ..ObsConfig::default()
    })?;
    debug!(data_dir = %config.data_dir.display(), "opening data directory");

    let slot = FileSlot::open(&config.data_dir)?;
    let mut console = Console::new(config, AuthnService::default(), slot);
    let outcome = run(&mut console, cli.command);
    report(outcome, &mut std::io::stdout().lock(), shutdown_tracing)
}

/// Print the command result, then flush tracing. A failed flush is logged
/// and never turns a finished command into an error.
fn report(
    outcome: Result<String, ApiError>,
    out: &mut impl Write,
    shutdown: impl FnOnce() -> Result<()>,
) -> Result<()> {
    let result = match outcome {
        Ok(output) => writeln!(out, "{output}").context("write command output"),
        Err(err) => {
            if let Some(source) = err.source_error() {
                error!(error = ?source, "command failed");
            }
            Err(anyhow!("{} ({})", err, err.code()))
        }
    };
    if let Err(err) = shutdown() {
        warn!(error = ?err, "tracing shutdown failed");
    }
    result
}

fn run(console: &mut Console<FileSlot>, command: Command) -> Result<String, ApiError> {
    match command {
        Command::Login { email, password } => console.login(&email, &password),
        Command::Logout => console.logout(),
        Command::Whoami => console.whoami(),
        Command::List(args) => console.list(&args.filter(), args.json),
        Command::Show { id, json } => console.show(&id, Utc::now().date_naive(), json),
        Command::Add(form) => console.add(form.into()),
        Command::Update { id, form } => console.update(&id, form.into()),
        Command::Delete { id } => console.delete(&id),
        Command::Stats { json } => console.stats(json),
        Command::Seed => console.seed(),
    }
}
