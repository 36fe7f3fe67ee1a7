//! Open quests and the skills they train.

use crossterm::event::KeyCode;
use ratatui::Frame;
use ratatui::text::Line;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::tui::render;
use crate::tui::stack::{Nav, Selection};
use crate::tui::surface::{Input, Panes};
use crate::tui::wizard::{FieldSpec, Outcome};

use super::{Ctx, attempt, outcome_summary, parse_i64, run_wizard, status_data};

const LEGEND: &[(&str, &str)] = &[
    ("j/k", "move"),
    ("space", "mark"),
    ("f", "finish"),
    ("n", "new quest"),
    ("s", "new skill"),
    ("r", "return"),
    ("q", "quit"),
];

pub fn run(ctx: &mut Ctx, selection: &mut Selection) -> Result<Nav> {
    let mut message: Option<String> = None;
    loop {
        let quests = ctx.store.list_quests()?;
        let skills = ctx.store.list_skills()?;
        selection.clamp(quests.len());
        let (progress, character) = status_data(ctx.store)?;

        let mut lines = render::quest_lines(&quests, selection);
        if !skills.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from("skills:"));
            lines.extend(render::skill_lines(&skills));
        }
        let mut background = |frame: &mut Frame, panes: &Panes| {
            render::draw_list(frame, panes, "quests", &lines);
            render::draw_legend(frame, panes, LEGEND);
            render::draw_status(frame, panes, progress, &character);
        };
        ctx.surface.draw(&mut |frame, panes| {
            background(frame, panes);
            render::draw_message(frame, panes, message.as_deref());
        })?;

        let under_cursor = quests.get(selection.cursor).map(|q| q.id);
        match ctx.surface.read_key()? {
            Input::Resize => {}
            Input::Key(KeyCode::Char('q')) => return Ok(Nav::Quit),
            Input::Key(KeyCode::Char('r')) => return Ok(Nav::Pop),
            Input::Key(KeyCode::Char('j') | KeyCode::Down) => selection.down(quests.len()),
            Input::Key(KeyCode::Char('k') | KeyCode::Up) => selection.up(quests.len()),
            Input::Key(KeyCode::Char(' ')) => {
                if let Some(id) = under_cursor {
                    selection.toggle(id);
                }
            }
            Input::Key(KeyCode::Char('f')) => {
                let targets = selection.targets(under_cursor);
                if !targets.is_empty() {
                    attempt(&mut message, finish_quests(ctx.store, &targets))?;
                    selection.clear_marks();
                }
            }
            Input::Key(KeyCode::Char('n')) => {
                let fields = vec![
                    FieldSpec::free("name", ""),
                    FieldSpec::new("xp", "10", parse_i64),
                    FieldSpec::new("willingness (0-10)", "5", parse_i64),
                    FieldSpec::new("time cost", "1", parse_i64),
                    FieldSpec::new("trained skill id", "", parse_i64),
                ];
                match run_wizard(ctx.surface, &fields, &mut background)? {
                    Outcome::Cancelled => message = Some("cancelled".into()),
                    Outcome::Complete(values) => {
                        attempt(&mut message, add_quest(ctx.store, &values))?;
                    }
                }
            }
            Input::Key(KeyCode::Char('s')) => {
                let fields = vec![FieldSpec::free("skill name", "")];
                match run_wizard(ctx.surface, &fields, &mut background)? {
                    Outcome::Cancelled => message = Some("cancelled".into()),
                    Outcome::Complete(values) => {
                        attempt(&mut message, add_skill(ctx.store, &values))?;
                    }
                }
            }
            Input::Key(_) => {}
        }
    }
}

fn finish_quests(store: &Store, ids: &[i64]) -> Result<String> {
    let mut parts = Vec::new();
    for &id in ids {
        parts.push(outcome_summary(&store.close_quest(id)?));
    }
    Ok(parts.join("; "))
}

fn add_quest(store: &Store, values: &[String]) -> Result<String> {
    if values[0].is_empty() {
        return Err(Error::Format {
            what: "name",
            input: String::new(),
            expected: "a non-empty name",
        });
    }
    let int = |v: &String| -> Result<i64> {
        v.parse().map_err(|_| Error::Format {
            what: "number",
            input: v.clone(),
            expected: "an integer",
        })
    };
    let trained_skill = if values[4].is_empty() {
        None
    } else {
        Some(int(&values[4])?)
    };
    let id = store.add_quest(&values[0], int(&values[1])?, int(&values[2])?, int(&values[3])?, trained_skill)?;
    Ok(format!("created quest {id}"))
}

fn add_skill(store: &Store, values: &[String]) -> Result<String> {
    if values[0].is_empty() {
        return Err(Error::Format {
            what: "name",
            input: String::new(),
            expected: "a non-empty name",
        });
    }
    let id = store.add_skill(&values[0])?;
    Ok(format!("created skill {id}"))
}
