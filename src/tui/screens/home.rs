//! Entry screen: the single most urgent task and the global menu.

use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::Frame;
use ratatui::text::Line;

use crate::dates::{self, DATE_FORMAT};
use crate::error::{Error, Result};
use crate::store::tasks::TaskQuery;
use crate::tui::render;
use crate::tui::stack::{ModifyArgs, Nav, Screen, Selection, TasksArgs};
use crate::tui::surface::{Input, Panes};
use crate::tui::wizard::{FieldSpec, Outcome};

use super::{Ctx, attempt, close_tasks, new_task_from, run_wizard, status_data, task_fields};

const LEGEND: &[(&str, &str)] = &[
    ("t", "tasks"),
    ("p", "projects"),
    ("u", "quests"),
    ("a", "awards"),
    ("n", "new task"),
    ("c", "close top"),
    ("m", "modify top"),
    ("d", "delete top"),
    ("o", "note"),
    ("q", "quit"),
];

pub fn run(ctx: &mut Ctx) -> Result<Nav> {
    let mut message: Option<String> = None;
    loop {
        let top = ctx.store.list_tasks(&TaskQuery::top())?;
        let (progress, character) = status_data(ctx.store)?;
        let lines: Vec<Line<'static>> = match top.first() {
            Some(task) => vec![
                Line::from("next up:"),
                Line::from(format!(
                    "  #{} {} (priority {}{})",
                    task.id,
                    task.name,
                    task.priority,
                    task.due_time
                        .as_deref()
                        .map(|t| format!(", at {t}"))
                        .unwrap_or_default(),
                )),
            ],
            None => vec![Line::from("nothing is due right now")],
        };

        let mut background = |frame: &mut Frame, panes: &Panes| {
            render::draw_list(frame, panes, "aide", &lines);
            render::draw_legend(frame, panes, LEGEND);
            render::draw_status(frame, panes, progress, &character);
        };

        ctx.surface.draw(&mut |frame, panes| {
            background(frame, panes);
            render::draw_message(frame, panes, message.as_deref());
        })?;

        match ctx.surface.read_key()? {
            Input::Resize => {}
            Input::Key(KeyCode::Char('q')) => return Ok(Nav::Quit),
            Input::Key(KeyCode::Char('t')) => {
                return Ok(Nav::Push(Screen::Tasks(TasksArgs::default())));
            }
            Input::Key(KeyCode::Char('p')) => {
                return Ok(Nav::Push(Screen::Projects(Selection::default())));
            }
            Input::Key(KeyCode::Char('u')) => {
                return Ok(Nav::Push(Screen::Quests(Selection::default())));
            }
            Input::Key(KeyCode::Char('a')) => {
                return Ok(Nav::Push(Screen::Awards(Selection::default())));
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
            Input::Key(KeyCode::Char('o')) => {
                let today = Local::now().date_naive().format(DATE_FORMAT).to_string();
                let fields = vec![
                    FieldSpec::free("note", ""),
                    FieldSpec::new("date", today, |s| dates::ensure_date(s).map(|_| ())),
                ];
                match run_wizard(ctx.surface, &fields, &mut background)? {
                    Outcome::Cancelled => message = Some("cancelled".into()),
                    Outcome::Complete(values) => {
                        attempt(&mut message, add_note(ctx.store, &values))?;
                    }
                }
            }
            Input::Key(KeyCode::Char('c')) => {
                if let Some(task) = top.first() {
                    let prompt = format!("close '{}'?", task.name);
                    if ctx.surface.confirm(&prompt, false, &mut background)? {
                        attempt(&mut message, close_tasks(ctx.store, &[task.id]))?;
                    }
                } else {
                    message = Some("nothing to close".into());
                }
            }
            Input::Key(KeyCode::Char('m')) => match top.first() {
                Some(task) => {
                    return Ok(Nav::Push(Screen::Modify(ModifyArgs {
                        ids: vec![task.id],
                    })));
                }
                None => message = Some("nothing to modify".into()),
            },
            Input::Key(KeyCode::Char('d')) => {
                if let Some(task) = top.first() {
                    let prompt = format!("delete '{}'?", task.name);
                    if ctx.surface.confirm(&prompt, false, &mut background)? {
                        let deleted = ctx
                            .store
                            .delete_task(task.id)
                            .map(|()| format!("deleted '{}'", task.name));
                        attempt(&mut message, deleted)?;
                    }
                } else {
                    message = Some("nothing to delete".into());
                }
            }
            Input::Key(_) => {}
        }
    }
}

fn add_note(store: &crate::store::Store, values: &[String]) -> Result<String> {
    if values[0].is_empty() {
        return Err(Error::Format {
            what: "note",
            input: String::new(),
            expected: "some text",
        });
    }
    let date = dates::ensure_date(&values[1])?;
    store.add_note(Some(date), &values[0])?;
    Ok("noted".to_string())
}
