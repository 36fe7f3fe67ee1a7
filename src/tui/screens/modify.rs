//! Bulk field editing over a precomputed id list.
//!
//! Every command edits one field across all targets. The typed value is
//! validated before any task is touched, so a format error commits
//! nothing; fields applied by earlier commands stay applied.

use crossterm::event::KeyCode;
use ratatui::Frame;

use crate::dates;
use crate::error::{Error, Result};
use crate::model::task::{Task, TaskStatus, TaskUpdate};
use crate::store::Store;
use crate::tui::render;
use crate::tui::stack::{ModifyArgs, Nav};
use crate::tui::surface::{Input, LineEntry, Panes};

use super::{Ctx, attempt, status_data};

const LEGEND: &[(&str, &str)] = &[
    ("n", "name"),
    ("p", "priority"),
    ("w", "weight"),
    ("d", "due date"),
    ("t", "due time"),
    ("e", "repeat"),
    ("s", "status"),
    ("j", "project"),
    ("i", "rank in project"),
    ("r", "return"),
    ("q", "quit"),
];

pub fn run(ctx: &mut Ctx, args: &mut ModifyArgs) -> Result<Nav> {
    let mut message: Option<String> = None;
    loop {
        let tasks = load_targets(ctx.store, &args.ids)?;
        let (progress, character) = status_data(ctx.store)?;

        let title = format!("modify {} task(s)", tasks.len());
        let lines = render::task_lines(&tasks, None);
        let mut background = |frame: &mut Frame, panes: &Panes| {
            render::draw_list(frame, panes, &title, &lines);
            render::draw_legend(frame, panes, LEGEND);
            render::draw_status(frame, panes, progress, &character);
        };
        ctx.surface.draw(&mut |frame, panes| {
            background(frame, panes);
            render::draw_message(frame, panes, message.as_deref());
        })?;

        let field = match ctx.surface.read_key()? {
            Input::Resize => continue,
            Input::Key(KeyCode::Char('q')) => return Ok(Nav::Quit),
            Input::Key(KeyCode::Char('r')) => return Ok(Nav::Pop),
            Input::Key(KeyCode::Char(c)) => c,
            Input::Key(_) => continue,
        };
        let Some((label, build)) = field_command(field) else {
            continue;
        };

        let text = match ctx.surface.read_line(label, &mut background)? {
            LineEntry::Text(text) if !text.is_empty() => text,
            _ => continue,
        };
        attempt(&mut message, {
            let store = ctx.store;
            let ids = &args.ids;
            build(&text).and_then(|update| apply_all(store, ids, &update))
        })?;
    }
}

type BuildUpdate = fn(&str) -> Result<TaskUpdate>;

/// Per-key field editors: prompt label plus the validated update builder.
fn field_command(key: char) -> Option<(&'static str, BuildUpdate)> {
    match key {
        'n' => Some(("name", |text| {
            Ok(TaskUpdate {
                name: Some(text.to_string()),
                ..TaskUpdate::default()
            })
        })),
        'p' => Some(("priority", |text| {
            Ok(TaskUpdate::priority(parse_int(text)?))
        })),
        'w' => Some(("weight", |text| {
            let weight = text.parse().map_err(|_| Error::Format {
                what: "number",
                input: text.to_string(),
                expected: "a number",
            })?;
            Ok(TaskUpdate {
                weight: Some(weight),
                ..TaskUpdate::default()
            })
        })),
        'd' => Some(("due date", |text| {
            Ok(TaskUpdate::due(dates::resolve(text)?))
        })),
        't' => Some(("due time", |text| {
            Ok(TaskUpdate {
                due_time: Some(dates::ensure_time(text)?),
                ..TaskUpdate::default()
            })
        })),
        'e' => Some(("repeat", |text| {
            Ok(TaskUpdate {
                repeat: Some(dates::ensure_period(text)?),
                ..TaskUpdate::default()
            })
        })),
        's' => Some(("status (0|1)", |text| {
            let status = parse_int(text).ok().and_then(TaskStatus::from_int);
            match status {
                Some(status) => Ok(TaskUpdate {
                    status: Some(status),
                    ..TaskUpdate::default()
                }),
                None => Err(Error::Format {
                    what: "status",
                    input: text.to_string(),
                    expected: "0 or 1",
                }),
            }
        })),
        'j' => Some(("project id", |text| {
            Ok(TaskUpdate {
                project: Some(parse_int(text)?),
                ..TaskUpdate::default()
            })
        })),
        'i' => Some(("rank in project", |text| {
            Ok(TaskUpdate {
                priority_in_project: Some(parse_int(text)?),
                ..TaskUpdate::default()
            })
        })),
        _ => None,
    }
}

fn parse_int(text: &str) -> Result<i64> {
    text.parse().map_err(|_| Error::Format {
        what: "number",
        input: text.to_string(),
        expected: "an integer",
    })
}

fn apply_all(store: &Store, ids: &[i64], update: &TaskUpdate) -> Result<String> {
    for &id in ids {
        store.modify_task(id, update)?;
    }
    Ok(format!("modified {} task(s)", ids.len()))
}

/// Targets deleted since the list was captured are simply not shown.
fn load_targets(store: &Store, ids: &[i64]) -> Result<Vec<Task>> {
    let mut tasks = Vec::with_capacity(ids.len());
    for &id in ids {
        match store.get_task(id) {
            Ok(task) => tasks.push(task),
            Err(e) if e.is_recoverable() => {}
            Err(e) => return Err(e),
        }
    }
    Ok(tasks)
}
