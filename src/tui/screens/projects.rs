//! Active projects. Entering one pushes its task view; archiving moves a
//! project to the hall of fame (it never gets deleted).

use crossterm::event::KeyCode;
use ratatui::Frame;

use crate::error::{Error, Result};
use crate::model::project::ProjectUpdate;
use crate::store::Store;
use crate::tui::render;
use crate::tui::stack::{Nav, ProjectTasksArgs, Screen, Selection};
use crate::tui::surface::{Input, LineEntry, Panes};
use crate::tui::wizard::{FieldSpec, Outcome};

use super::{Ctx, attempt, parse_i64, run_wizard, status_data};

const LEGEND: &[(&str, &str)] = &[
    ("j/k", "move"),
    ("enter", "open"),
    ("n", "new project"),
    ("p", "priority"),
    ("h", "archive"),
    ("r", "return"),
    ("q", "quit"),
];

pub fn run(ctx: &mut Ctx, selection: &mut Selection) -> Result<Nav> {
    let mut message: Option<String> = None;
    loop {
        let projects = ctx.store.list_projects()?;
        selection.clamp(projects.len());
        let (progress, character) = status_data(ctx.store)?;

        let lines = render::project_lines(&projects, selection);
        let mut background = |frame: &mut Frame, panes: &Panes| {
            render::draw_list(frame, panes, "projects", &lines);
            render::draw_legend(frame, panes, LEGEND);
            render::draw_status(frame, panes, progress, &character);
        };
        ctx.surface.draw(&mut |frame, panes| {
            background(frame, panes);
            render::draw_message(frame, panes, message.as_deref());
        })?;

        let current = projects.get(selection.cursor);
        match ctx.surface.read_key()? {
            Input::Resize => {}
            Input::Key(KeyCode::Char('q')) => return Ok(Nav::Quit),
            Input::Key(KeyCode::Char('r')) => return Ok(Nav::Pop),
            Input::Key(KeyCode::Char('j') | KeyCode::Down) => selection.down(projects.len()),
            Input::Key(KeyCode::Char('k') | KeyCode::Up) => selection.up(projects.len()),
            Input::Key(KeyCode::Enter | KeyCode::Char('l')) => {
                if let Some(project) = current {
                    return Ok(Nav::Push(Screen::ProjectTasks(ProjectTasksArgs {
                        project: project.id,
                        project_name: project.name.clone(),
                        selection: Selection::default(),
                    })));
                }
            }
            Input::Key(KeyCode::Char('n')) => {
                let fields = vec![
                    FieldSpec::free("name", ""),
                    FieldSpec::new("priority", "1", parse_i64),
                ];
                match run_wizard(ctx.surface, &fields, &mut background)? {
                    Outcome::Cancelled => message = Some("cancelled".into()),
                    Outcome::Complete(values) => {
                        attempt(&mut message, add_project(ctx.store, &values))?;
                    }
                }
            }
            Input::Key(KeyCode::Char('p')) => {
                let Some(project) = current else { continue };
                let text = match ctx.surface.read_line("priority", &mut background)? {
                    LineEntry::Text(text) if !text.is_empty() => text,
                    _ => continue,
                };
                attempt(&mut message, set_priority(ctx.store, project.id, &text))?;
            }
            Input::Key(KeyCode::Char('h')) => {
                let Some(project) = current else { continue };
                let prompt = format!("archive '{}'?", project.name);
                if ctx.surface.confirm(&prompt, false, &mut background)? {
                    let update = ProjectUpdate {
                        open: Some(false),
                        ..ProjectUpdate::default()
                    };
                    attempt(
                        &mut message,
                        ctx.store
                            .modify_project(project.id, &update)
                            .map(|()| format!("archived '{}'", project.name)),
                    )?;
                }
            }
            Input::Key(_) => {}
        }
    }
}

fn add_project(store: &Store, values: &[String]) -> Result<String> {
    if values[0].is_empty() {
        return Err(Error::Format {
            what: "name",
            input: String::new(),
            expected: "a non-empty name",
        });
    }
    let priority = values[1].parse().map_err(|_| Error::Format {
        what: "number",
        input: values[1].clone(),
        expected: "an integer",
    })?;
    let id = store.add_project(&values[0], priority)?;
    Ok(format!("created project {id}"))
}

fn set_priority(store: &Store, id: i64, text: &str) -> Result<String> {
    let priority = text.parse().map_err(|_| Error::Format {
        what: "number",
        input: text.to_string(),
        expected: "an integer",
    })?;
    let update = ProjectUpdate {
        priority: Some(priority),
        ..ProjectUpdate::default()
    };
    store.modify_project(id, &update)?;
    Ok(format!("project {id} priority set to {priority}"))
}
