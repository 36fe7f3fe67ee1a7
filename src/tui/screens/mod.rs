//! One module per screen. Screens never call each other; they return a
//! `Nav` transition and the driver reshuffles the stack.

pub mod awards;
pub mod home;
pub mod modify;
pub mod project_tasks;
pub mod projects;
pub mod quests;
pub mod tasks;

use chrono::Local;
use ratatui::Frame;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::rpg::{Character, QuestOutcome};
use crate::model::task::NewTask;
use crate::store::Store;
use crate::store::tasks::WeightScope;

use super::stack::{Nav, Screen};
use super::surface::{LineEntry, Panes, Surface};
use super::wizard::{self, Entry, FieldSpec, Outcome};

/// Everything a screen needs besides its own frame arguments.
pub struct Ctx<'a> {
    pub store: &'a Store,
    pub config: &'a Config,
    pub surface: &'a mut Surface,
}

pub fn run_screen(ctx: &mut Ctx, screen: &mut Screen) -> Result<Nav> {
    match screen {
        Screen::Home => home::run(ctx),
        Screen::Tasks(args) => tasks::run(ctx, args),
        Screen::Modify(args) => modify::run(ctx, args),
        Screen::Quests(selection) => quests::run(ctx, selection),
        Screen::Awards(selection) => awards::run(ctx, selection),
        Screen::Projects(selection) => projects::run(ctx, selection),
        Screen::ProjectTasks(args) => project_tasks::run(ctx, args),
    }
}

/// Data for the status bar, reloaded on every redraw.
fn status_data(store: &Store) -> Result<((f64, f64), Character)> {
    let today = Local::now().date_naive();
    let closed = store.total_weight(WeightScope::Closed, today)?;
    let total = store.total_weight(WeightScope::All, today)?;
    Ok(((closed, total), store.character()?))
}

/// Run a fallible command on behalf of a screen. Recoverable failures
/// become the message line; anything else unwinds the dashboard. Returns
/// whether the command succeeded.
fn attempt(message: &mut Option<String>, result: Result<String>) -> Result<bool> {
    match result {
        Ok(text) => {
            *message = Some(text);
            Ok(true)
        }
        Err(e) if e.is_recoverable() => {
            *message = Some(e.to_string());
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Drive a wizard flow with prompts in the message pane, over whatever the
/// screen keeps drawing underneath.
fn run_wizard(
    surface: &mut Surface,
    fields: &[FieldSpec],
    draw: &mut dyn FnMut(&mut Frame, &Panes),
) -> Result<Outcome> {
    wizard::fill(fields, |field| {
        let prompt = if field.default.is_empty() {
            field.label.to_string()
        } else {
            format!("{} [{}]", field.label, field.default)
        };
        Ok(match surface.read_line(&prompt, &mut *draw)? {
            LineEntry::Text(text) => Entry::Text(text),
            LineEntry::Cancel => Entry::Cancel,
            LineEntry::FinishEarly => Entry::FinishEarly,
        })
    })
}

fn parse_i64(text: &str) -> Result<()> {
    text.parse::<i64>().map(|_| ()).map_err(|_| Error::Format {
        what: "number",
        input: text.to_string(),
        expected: "an integer",
    })
}

fn parse_f64(text: &str) -> Result<()> {
    text.parse::<f64>().map(|_| ()).map_err(|_| Error::Format {
        what: "number",
        input: text.to_string(),
        expected: "a number",
    })
}

fn task_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::free("name", ""),
        FieldSpec::new("priority", "0", parse_i64),
        FieldSpec::new("due date", "today", |s| {
            crate::dates::resolve(s).map(|_| ())
        }),
        FieldSpec::new("due time", "", |s| crate::dates::ensure_time(s).map(|_| ())),
        FieldSpec::new("weight", "0", parse_f64),
        FieldSpec::new("repeat", "", |s| crate::dates::ensure_period(s).map(|_| ())),
    ]
}

/// Turn collected task-wizard values into a `NewTask`. Every value has
/// already passed field validation; the name is the only thing that can
/// still be missing.
fn new_task_from(values: &[String], project: Option<i64>) -> Result<NewTask> {
    if values[0].is_empty() {
        return Err(Error::Format {
            what: "name",
            input: String::new(),
            expected: "a non-empty name",
        });
    }
    let opt = |v: &String| (!v.is_empty()).then(|| v.clone());
    Ok(NewTask {
        name: values[0].clone(),
        priority: values[1].parse().map_err(|_| Error::Format {
            what: "number",
            input: values[1].clone(),
            expected: "an integer",
        })?,
        due: Some(crate::dates::resolve(&values[2])?),
        due_time: opt(&values[3]),
        weight: values[4].parse().map_err(|_| Error::Format {
            what: "number",
            input: values[4].clone(),
            expected: "a number",
        })?,
        repeat: opt(&values[5]),
        project,
    })
}

/// Close each target in turn. Partial completion on failure is visible,
/// not rolled back.
fn close_tasks(store: &Store, ids: &[i64]) -> Result<String> {
    let mut parts = Vec::new();
    for &id in ids {
        let (name, outcome) = store.close_task(id)?;
        parts.push(format!("closed '{name}'"));
        if let Some(outcome) = outcome {
            parts.push(outcome_summary(&outcome));
        }
    }
    Ok(parts.join("; "))
}

fn outcome_summary(outcome: &QuestOutcome) -> String {
    let mut parts = vec![format!("quest '{}' complete", outcome.quest_name)];
    if outcome.leveled_up {
        parts.push("level up!".to_string());
    }
    if let Some(skill) = &outcome.skill {
        if skill.increased {
            parts.push(format!("{} is now {}", skill.name, skill.level));
        }
    }
    parts.join(", ")
}
