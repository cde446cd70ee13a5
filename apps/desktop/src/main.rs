use std::fmt::Write as _;

use anyhow::{Context, Result};
use calendar::{bind_assignments, shifts_on, MonthCursor, MonthMatrix, ShiftsByDay, WEEKDAY_LABELS};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client_core::{SchedulerApi, SchedulerClient};
use shared::{
    domain::{Role, Session, ShiftId},
    protocol::{AssignmentRecord, NewWorkerProfile, Shift, WorkerProfile},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Command-line client for the shift scheduling service")]
struct Args {
    /// Scheduling API base URL; overrides scheduler.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, env = "SCHEDULER_EMAIL")]
    email: String,
    #[arg(long, env = "SCHEDULER_PASSWORD", hide_env_values = true)]
    password: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the signed-in worker's profile.
    Profile,
    /// Create the worker profile for this account.
    Register {
        #[arg(long)]
        name: String,
        /// floor, floor-manager, administration or manager
        #[arg(long)]
        role: Role,
    },
    /// Print a month of assigned shifts.
    Calendar {
        #[arg(long)]
        year: Option<i32>,
        /// 1-12
        #[arg(long)]
        month: Option<u32>,
    },
    /// List every shift, open or taken.
    Shifts,
    /// List open shifts, filtered to the worker's role unless --all is given.
    Unassigned {
        #[arg(long)]
        all: bool,
    },
    /// Take an open shift.
    Assign {
        #[arg(long)]
        shift_id: ShiftId,
    },
    /// Give back an assigned shift.
    Unassign {
        #[arg(long)]
        shift_id: ShiftId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = client_core::load_settings();
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    let client = SchedulerClient::new(&settings).context("invalid client settings")?;
    info!(
        command = ?args.command,
        api_url = client.api_url(),
        "running scheduler command"
    );
    let session = client
        .login(&args.email, &args.password)
        .await
        .with_context(|| format!("sign-in against {} failed", client.api_url()))?;

    let today = chrono::Local::now().date_naive();
    let output = run(&client, &session, args.command, today).await?;
    print!("{output}");
    Ok(())
}

async fn run(
    api: &dyn SchedulerApi,
    session: &Session,
    command: Command,
    today: NaiveDate,
) -> Result<String> {
    match command {
        Command::Profile => {
            let profile = api
                .fetch_profile(session)
                .await
                .context("no worker profile; create one with `register`")?;
            Ok(format_profile(&profile))
        }
        Command::Register { name, role } => {
            api.create_profile(session, &NewWorkerProfile { name, role })
                .await
                .context("failed to create worker profile")?;
            let profile = api
                .fetch_profile(session)
                .await
                .context("profile was created but could not be read back")?;
            Ok(format_profile(&profile))
        }
        Command::Calendar { year, month } => {
            let cursor = month_cursor(year, month, today)?;
            let profile = api
                .fetch_profile(session)
                .await
                .context("failed to load worker profile")?;
            let records = api
                .list_assignments(session, profile.id)
                .await
                .context("failed to load assigned shifts")?;
            let by_day = bind_assignments(&records);
            let matrix = cursor.build(Some(today))?;
            Ok(render_month(&matrix, &by_day))
        }
        Command::Shifts => {
            let shifts = api
                .list_shifts(session)
                .await
                .context("failed to load shifts")?;
            Ok(format_all_shifts(&shifts))
        }
        Command::Unassigned { all } => {
            let shifts = if all {
                api.list_unassigned_shifts(session)
                    .await
                    .context("failed to load open shifts")?
            } else {
                let (profile, shifts) = futures::try_join!(
                    api.fetch_profile(session),
                    api.list_unassigned_shifts(session)
                )
                .context("failed to load profile and open shifts")?;
                shifts
                    .into_iter()
                    .filter(|shift| shift.is_for_role(profile.role))
                    .collect()
            };
            Ok(format_shifts(&shifts))
        }
        Command::Assign { shift_id } => {
            let profile = api
                .fetch_profile(session)
                .await
                .context("failed to load worker profile")?;
            api.assign_shift(session, shift_id, profile.id)
                .await
                .with_context(|| format!("could not assign shift {shift_id}"))?;
            Ok(format!("Assigned shift {shift_id} to {}\n", profile.name))
        }
        Command::Unassign { shift_id } => {
            let profile = api
                .fetch_profile(session)
                .await
                .context("failed to load worker profile")?;
            api.unassign_shift(session, shift_id, profile.id)
                .await
                .with_context(|| format!("could not release shift {shift_id}"))?;
            Ok(format!("Released shift {shift_id}\n"))
        }
    }
}

fn month_cursor(year: Option<i32>, month: Option<u32>, today: NaiveDate) -> Result<MonthCursor> {
    let current = MonthCursor::containing(today);
    let year = year.unwrap_or(current.year);
    let month0 = match month {
        Some(month @ 1..=12) => month - 1,
        Some(other) => anyhow::bail!("month must be between 1 and 12, got {other}"),
        None => current.month0,
    };
    Ok(MonthCursor::new(year, month0))
}

fn format_profile(profile: &WorkerProfile) -> String {
    format!("{} ({})\nworker id: {}\n", profile.name, profile.role.label(), profile.id)
}

fn format_shifts(shifts: &[Shift]) -> String {
    if shifts.is_empty() {
        return "No open shifts.\n".to_string();
    }
    let mut out = String::new();
    for shift in shifts {
        let _ = writeln!(
            out,
            "{}  {}  {:<15} {}",
            shift.date,
            shift.time_range_label(),
            shift.required_role,
            shift.id
        );
    }
    out
}

fn format_all_shifts(shifts: &[Shift]) -> String {
    if shifts.is_empty() {
        return "No shifts.\n".to_string();
    }
    let mut out = String::new();
    for shift in shifts {
        let status = if shift.worker_id.is_some() { "taken" } else { "open" };
        let _ = writeln!(
            out,
            "{}  {}  {:<15} {:<5}  {}",
            shift.date,
            shift.time_range_label(),
            shift.required_role,
            status,
            shift.id
        );
    }
    out
}

/// Wide enough for the busiest cell, e.g. `*28(10)`.
const CELL_WIDTH: usize = 8;

/// Month grid with the number of assigned shifts per day, followed by the
/// assignments themselves.
fn render_month(matrix: &MonthMatrix, by_day: &ShiftsByDay) -> String {
    let mut out = String::new();
    let width = CELL_WIDTH * WEEKDAY_LABELS.len();
    let _ = writeln!(out, "{:^width$}", matrix.title());
    for label in WEEKDAY_LABELS {
        let _ = write!(out, "{label:>CELL_WIDTH$}");
    }
    out.push('\n');

    for week in matrix.weeks() {
        for cell in week {
            let text = match cell.date {
                Some(date) => {
                    let count = shifts_on(by_day, date).len();
                    let marker = if cell.is_today { "*" } else { "" };
                    if count > 0 {
                        format!("{marker}{}({count})", date.format("%-d"))
                    } else {
                        format!("{marker}{}", date.format("%-d"))
                    }
                }
                None => String::new(),
            };
            let _ = write!(out, "{text:>CELL_WIDTH$}");
        }
        out.push('\n');
    }

    let in_month: Vec<(NaiveDate, &AssignmentRecord)> = matrix
        .dates()
        .flat_map(|date| shifts_on(by_day, date).iter().map(move |record| (date, record)))
        .collect();
    if !in_month.is_empty() {
        out.push('\n');
    }
    for (date, record) in in_month {
        let times = record.time_range_label().unwrap_or_else(|| "--:--".to_string());
        let role = record.effective_role().unwrap_or("-");
        let shift_id = record
            .effective_shift_id()
            .map(|id| id.to_string())
            .unwrap_or_default();
        let _ = writeln!(out, "{date}  {times}  {role:<15} {shift_id}");
    }
    out
}
