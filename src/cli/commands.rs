use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::dates;
use crate::error::Result;

#[derive(Parser)]
#[command(
    name = "aide",
    about = concat!("aide v", env!("CARGO_PKG_VERSION"), " - tasks, habits and a character sheet"),
    version
)]
pub struct Cli {
    /// No subcommand launches the interactive dashboard
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use a different configuration file
    #[arg(short = 'C', long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new task
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Modify fields of an existing task
    Mod(ModArgs),
    /// Mark a task as closed
    Close(CloseArgs),
    /// Permanently delete a task
    Delete(DeleteArgs),
    /// Total weight of a day's tasks
    Report(ReportArgs),
    /// Add a note for a given day
    Note(NoteArgs),
    /// Quests, awards and character progression
    Rpg(RpgArgs),
}

// Validation runs in the value parsers, before any store call.

fn parse_due(token: &str) -> Result<String> {
    dates::resolve(token).map(|_| token.to_string())
}

fn parse_time(time: &str) -> Result<String> {
    dates::ensure_time(time)
}

fn parse_period(period: &str) -> Result<String> {
    dates::ensure_period(period)
}

fn parse_date(date: &str) -> Result<String> {
    dates::ensure_date(date).map(|_| date.to_string())
}

#[derive(Args)]
pub struct AddArgs {
    /// Name of the task
    pub name: String,
    /// Priority of the task (higher = more urgent)
    #[arg(short, long, default_value_t = 0)]
    pub priority: i64,
    /// Due time, HH:MM; adds the time-bound priority boost
    #[arg(short, long, value_parser = parse_time)]
    pub time: Option<String>,
    /// Weight: user-assigned effort/value unit
    #[arg(short, long, default_value_t = 0.0)]
    pub weight: f64,
    /// Repetition period: 'N days|months|years' or workdays
    #[arg(short, long, value_parser = parse_period)]
    pub repeat: Option<String>,
    /// Due date: YYYY-MM-DD, today, tomorrow, '+N days|months|years', no
    #[arg(short, long, default_value = "today", value_parser = parse_due)]
    pub date: String,
    /// Attach to a project
    #[arg(long, value_name = "ID")]
    pub project: Option<i64>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only the highest-priority task due now or earlier
    #[arg(short, long, conflicts_with_all = ["all", "overdue"])]
    pub top: bool,
    /// Due-date filter (same formats as add --date)
    #[arg(short, long, value_parser = parse_due)]
    pub date: Option<String>,
    /// Include closed tasks
    #[arg(short, long)]
    pub all: bool,
    /// Widen the date filter to "on or before"
    #[arg(short, long)]
    pub overdue: bool,
    /// Scope to a project
    #[arg(long, value_name = "ID")]
    pub project: Option<i64>,
}

#[derive(Args)]
pub struct ModArgs {
    /// ID of the task to modify
    pub id: i64,
    /// New name
    #[arg(short, long)]
    pub name: Option<String>,
    /// New priority
    #[arg(short, long)]
    pub priority: Option<i64>,
    /// New due time, HH:MM
    #[arg(short, long, value_parser = parse_time)]
    pub time: Option<String>,
    /// New weight
    #[arg(short, long)]
    pub weight: Option<f64>,
    /// New repetition period
    #[arg(short, long, value_parser = parse_period)]
    pub repeat: Option<String>,
    /// Postpone (or clear with 'no') the due date
    #[arg(short, long, value_parser = parse_due)]
    pub date: Option<String>,
    /// New status: 0 closed, 1 open
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..=1))]
    pub status: Option<i64>,
    /// Move to a project
    #[arg(long, value_name = "ID")]
    pub project: Option<i64>,
    /// Ordering key within the project
    #[arg(long, value_name = "N")]
    pub project_priority: Option<i64>,
}

#[derive(Args)]
pub struct CloseArgs {
    /// ID of the task to close; without it, the current top task
    pub id: Option<i64>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// ID of the task to delete
    pub id: i64,
}

#[derive(Args)]
pub struct ReportArgs {
    /// Date to report on, YYYY-MM-DD (default: today)
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<String>,
    /// Weight of closed tasks only
    #[arg(short, long)]
    pub closed: bool,
}

#[derive(Args)]
pub struct NoteArgs {
    /// The text of the note
    pub text: String,
    /// Associate the note with a date (default: today)
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<String>,
}

#[derive(Args)]
#[command(group = ArgGroup::new("action").args(
    ["list_quests", "finish_quest", "list_awards", "claim_award", "character"]
))]
pub struct RpgArgs {
    /// List open quests
    #[arg(short = 'l', long)]
    pub list_quests: bool,
    /// Consume a quest and apply its rewards
    #[arg(short = 'f', long, value_name = "ID")]
    pub finish_quest: Option<i64>,
    /// List available awards
    #[arg(short = 'a', long)]
    pub list_awards: bool,
    /// Claim an award, paying its gold price
    #[arg(short = 'c', long, value_name = "ID")]
    pub claim_award: Option<i64>,
    /// Show character stats
    #[arg(short = 'p', long)]
    pub character: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bad_date_fails_at_parse_time() {
        assert!(Cli::try_parse_from(["aide", "add", "x", "-d", "someday"]).is_err());
        assert!(Cli::try_parse_from(["aide", "add", "x", "-d", "+2 months"]).is_ok());
    }

    #[test]
    fn bad_time_and_period_fail_at_parse_time() {
        assert!(Cli::try_parse_from(["aide", "add", "x", "-t", "25:00"]).is_err());
        assert!(Cli::try_parse_from(["aide", "add", "x", "-r", "2 weeks"]).is_err());
        assert!(Cli::try_parse_from(["aide", "mod", "1", "-s", "2"]).is_err());
    }

    #[test]
    fn rpg_actions_are_mutually_exclusive() {
        assert!(Cli::try_parse_from(["aide", "rpg", "-l", "-a"]).is_err());
        assert!(Cli::try_parse_from(["aide", "rpg", "-f", "3"]).is_ok());
    }
}
