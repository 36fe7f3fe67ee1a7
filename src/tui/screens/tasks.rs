//! Today's tasks, with overdue/closed toggles and bulk operations.

use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::Frame;

use crate::dates::DateConstraint;
use crate::error::Result;
use crate::model::task::Task;
use crate::store::Store;
use crate::store::tasks::TaskQuery;
use crate::tui::render;
use crate::tui::stack::{ModifyArgs, Nav, Screen, TasksArgs};
use crate::tui::surface::{Input, Panes};
use crate::tui::wizard::Outcome;

use super::{Ctx, attempt, close_tasks, new_task_from, run_wizard, status_data, task_fields};

const LEGEND: &[(&str, &str)] = &[
    ("j/k", "move"),
    ("space", "mark"),
    ("o", "overdue"),
    ("c", "closed"),
    ("x", "close"),
    ("d", "delete"),
    ("m", "modify"),
    ("n", "new task"),
    ("r", "return"),
    ("q", "quit"),
];

pub fn run(ctx: &mut Ctx, args: &mut TasksArgs) -> Result<Nav> {
    let mut message: Option<String> = None;
    loop {
        let tasks = load(ctx.store, args, ctx.config.list_limit)?;
        args.selection.clamp(tasks.len());
        let (progress, character) = status_data(ctx.store)?;

        let mut title = String::from("tasks: today");
        if args.include_overdue {
            title.push_str(" +overdue");
        }
        if args.include_closed {
            title.push_str(" +closed");
        }
        let lines = render::task_lines(&tasks, Some(&args.selection));
        let selection = &args.selection;
        let mut background = |frame: &mut Frame, panes: &Panes| {
            render::draw_list(frame, panes, &title, &lines);
            render::draw_legend(frame, panes, LEGEND);
            render::draw_status(frame, panes, progress, &character);
        };
        ctx.surface.draw(&mut |frame, panes| {
            background(frame, panes);
            render::draw_message(frame, panes, message.as_deref());
        })?;

        let under_cursor = tasks.get(selection.cursor).map(|t| t.id);
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
            Input::Key(KeyCode::Char('o')) => args.include_overdue = !args.include_overdue,
            Input::Key(KeyCode::Char('c')) => args.include_closed = !args.include_closed,
            Input::Key(KeyCode::Char('x')) => {
                let targets = args.selection.targets(under_cursor);
                if !targets.is_empty() {
                    attempt(&mut message, close_tasks(ctx.store, &targets))?;
                    args.selection.clear_marks();
                }
            }
            Input::Key(KeyCode::Char('d')) => {
                let targets = args.selection.targets(under_cursor);
                if targets.is_empty() {
                    continue;
                }
                let prompt = format!("delete {} task(s)?", targets.len());
                if ctx.surface.confirm(&prompt, false, &mut background)? {
                    attempt(&mut message, delete_tasks(ctx.store, &targets))?;
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
                            new_task_from(&values, None)
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

/// Today's tasks, widened to everything due on or before today when the
/// overdue toggle is on. Widening never drops the today rows.
fn load(store: &Store, args: &TasksArgs, limit: usize) -> Result<Vec<Task>> {
    let today = Local::now().date_naive();
    store.list_tasks(&TaskQuery {
        include_closed: args.include_closed,
        due: Some(DateConstraint::On(today)),
        include_overdue: args.include_overdue,
        limit,
        ..TaskQuery::default()
    })
}

fn delete_tasks(store: &Store, ids: &[i64]) -> Result<String> {
    for &id in ids {
        store.delete_task(id)?;
    }
    Ok(format!("deleted {} task(s)", ids.len()))
}
