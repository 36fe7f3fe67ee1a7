//! Tasks scoped to one project: due today, overdue, and undated, ranked by
//! the project-local priority.

use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::Frame;

use crate::dates::DateConstraint;
use crate::error::Result;
use crate::model::task::{Task, TaskUpdate};
use crate::store::Store;
use crate::store::tasks::TaskQuery;
use crate::tui::render;
use crate::tui::stack::{ModifyArgs, Nav, ProjectTasksArgs, Screen};
use crate::tui::surface::{Input, LineEntry, Panes};
use crate::tui::wizard::Outcome;

use super::{Ctx, attempt, close_tasks, new_task_from, run_wizard, status_data, task_fields};

const LEGEND: &[(&str, &str)] = &[
    ("j/k", "move"),
    ("space", "mark"),
    ("s", "due today"),
    ("u", "clear date"),
    ("p", "rank"),
    ("x", "close"),
    ("m", "modify"),
    ("n", "new task"),
    ("r", "return"),
    ("q", "quit"),
];

pub fn run(ctx: &mut Ctx, args: &mut ProjectTasksArgs) -> Result<Nav> {
    let mut message: Option<String> = None;
    loop {
        let tasks = load(ctx.store, args.project, ctx.config.list_limit)?;
        args.selection.clamp(tasks.len());
        let (progress, character) = status_data(ctx.store)?;

        let title = format!("project: {}", args.project_name);
        let lines = render::task_lines(&tasks, Some(&args.selection));
        let mut background = |frame: &mut Frame, panes: &Panes| {
            render::draw_list(frame, panes, &title, &lines);
            render::draw_legend(frame, panes, LEGEND);
            render::draw_status(frame, panes, progress, &character);
        };
        ctx.surface.draw(&mut |frame, panes| {
            background(frame, panes);
            render::draw_message(frame, panes, message.as_deref());
        })?;

        let under_cursor = tasks.get(args.selection.cursor).map(|t| t.id);
        match ctx.surface.read_key()? {
            Input::Resize => {}
            Input::Key(KeyCode::Char('q')) => return Ok(Nav::Quit),
            Input::Key(KeyCode::Char('r')) => return Ok(Nav::Pop),
            Input::Key(KeyCode::Char('j') | KeyCode::Down) => args.selection.down(tasks.len()),
            Input::Key(KeyCode::Char('k') | KeyCode::Up) => args.selection.up(tasks.len()),
            Input::Key(KeyCode::Char(' ')) => {
                if let Some(id) = under_cursor {
                    args.selection.toggle(id);
                }
            }
            Input::Key(KeyCode::Char('s')) => {
                let targets = args.selection.targets(under_cursor);
                if !targets.is_empty() {
                    let today = DateConstraint::On(Local::now().date_naive());
                    attempt(
                        &mut message,
                        retarget(ctx.store, &targets, TaskUpdate::due(today)),
                    )?;
                    args.selection.clear_marks();
                }
            }
            Input::Key(KeyCode::Char('u')) => {
                let targets = args.selection.targets(under_cursor);
                if !targets.is_empty() {
                    attempt(
                        &mut message,
                        retarget(ctx.store, &targets, TaskUpdate::due(DateConstraint::Unset)),
                    )?;
                    args.selection.clear_marks();
                }
            }
            Input::Key(KeyCode::Char('p')) => {
                let targets = args.selection.targets(under_cursor);
                if targets.is_empty() {
                    continue;
                }
                let text = match ctx.surface.read_line("rank in project", &mut background)? {
                    LineEntry::Text(text) if !text.is_empty() => text,
                    _ => continue,
                };
                let Ok(rank) = text.parse::<i64>() else {
                    message = Some(format!("wrong number format: {text:?}"));
                    continue;
                };
                let update = TaskUpdate {
                    priority_in_project: Some(rank),
                    ..TaskUpdate::default()
                };
                attempt(&mut message, retarget(ctx.store, &targets, update))?;
                args.selection.clear_marks();
            }
            Input::Key(KeyCode::Char('x')) => {
                let targets = args.selection.targets(under_cursor);
                if !targets.is_empty() {
                    attempt(&mut message, close_tasks(ctx.store, &targets))?;
                    args.selection.clear_marks();
                }
            }
            Input::Key(KeyCode::Char('m')) => {
                let targets = args.selection.targets(under_cursor);
                if !targets.is_empty() {
                    return Ok(Nav::Push(Screen::Modify(ModifyArgs { ids: targets })));
                }
            }
            Input::Key(KeyCode::Char('n')) => {
                match run_wizard(ctx.surface, &task_fields(), &mut background)? {
                    Outcome::Cancelled => message = Some("cancelled".into()),
                    Outcome::Complete(values) => {
                        attempt(&mut message, {
                            let store = ctx.store;
                            let project = args.project;
                            new_task_from(&values, Some(project))
                                .and_then(|task| store.add_task(&task))
                                .map(|id| format!("created task {id}"))
                        })?;
                    }
                }
            }
            Input::Key(_) => {}
        }
    }
}

/// Today-or-earlier plus undated, both scoped to the project and ranked by
/// the project-local priority.
fn load(store: &Store, project: i64, limit: usize) -> Result<Vec<Task>> {
    let today = Local::now().date_naive();
    let mut tasks = store.list_tasks(&TaskQuery {
        project: Some(project),
        due: Some(DateConstraint::On(today)),
        include_overdue: true,
        limit,
        ..TaskQuery::default()
    })?;
    let undated = store.list_tasks(&TaskQuery {
        project: Some(project),
        due: Some(DateConstraint::Unset),
        limit,
        ..TaskQuery::default()
    })?;
    tasks.extend(undated);
    tasks.truncate(limit);
    Ok(tasks)
}

fn retarget(store: &Store, ids: &[i64], update: TaskUpdate) -> Result<String> {
    for &id in ids {
        store.modify_task(id, &update)?;
    }
    Ok(format!("updated {} task(s)", ids.len()))
}
