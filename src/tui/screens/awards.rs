//! Awards gold can buy. Claiming debits unconditionally.

use crossterm::event::KeyCode;
use ratatui::Frame;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::tui::render;
use crate::tui::stack::{Nav, Selection};
use crate::tui::surface::{Input, Panes};
use crate::tui::wizard::{FieldSpec, Outcome};

use super::{Ctx, attempt, parse_i64, run_wizard, status_data};

const LEGEND: &[(&str, &str)] = &[
    ("j/k", "move"),
    ("space", "mark"),
    ("c", "claim"),
    ("n", "new award"),
    ("r", "return"),
    ("q", "quit"),
];

pub fn run(ctx: &mut Ctx, selection: &mut Selection) -> Result<Nav> {
    let mut message: Option<String> = None;
    loop {
        let awards = ctx.store.list_awards()?;
        selection.clamp(awards.len());
        let (progress, character) = status_data(ctx.store)?;

        let lines = render::award_lines(&awards, selection);
        let mut background = |frame: &mut Frame, panes: &Panes| {
            render::draw_list(frame, panes, "awards", &lines);
            render::draw_legend(frame, panes, LEGEND);
            render::draw_status(frame, panes, progress, &character);
        };
        ctx.surface.draw(&mut |frame, panes| {
            background(frame, panes);
            render::draw_message(frame, panes, message.as_deref());
        })?;

        let under_cursor = awards.get(selection.cursor).map(|a| a.id);
        match ctx.surface.read_key()? {
            Input::Resize => {}
            Input::Key(KeyCode::Char('q')) => return Ok(Nav::Quit),
            Input::Key(KeyCode::Char('r')) => return Ok(Nav::Pop),
            Input::Key(KeyCode::Char('j') | KeyCode::Down) => selection.down(awards.len()),
            Input::Key(KeyCode::Char('k') | KeyCode::Up) => selection.up(awards.len()),
            Input::Key(KeyCode::Char(' ')) => {
                if let Some(id) = under_cursor {
                    selection.toggle(id);
                }
            }
            Input::Key(KeyCode::Char('c')) => {
                let targets = selection.targets(under_cursor);
                if targets.is_empty() {
                    continue;
                }
                let prompt = format!("claim {} award(s)?", targets.len());
                if ctx.surface.confirm(&prompt, false, &mut background)? {
                    attempt(&mut message, claim_awards(ctx.store, &targets))?;
                    selection.clear_marks();
                }
            }
            Input::Key(KeyCode::Char('n')) => {
                let fields = vec![
                    FieldSpec::free("name", ""),
                    FieldSpec::new("price", "50", parse_i64),
                ];
                match run_wizard(ctx.surface, &fields, &mut background)? {
                    Outcome::Cancelled => message = Some("cancelled".into()),
                    Outcome::Complete(values) => {
                        attempt(&mut message, add_award(ctx.store, &values))?;
                    }
                }
            }
            Input::Key(_) => {}
        }
    }
}

fn claim_awards(store: &Store, ids: &[i64]) -> Result<String> {
    let mut parts = Vec::new();
    for &id in ids {
        let outcome = store.claim_award(id)?;
        parts.push(format!(
            "claimed '{}' for {} gold ({} left)",
            outcome.award_name, outcome.price, outcome.gold_remaining
        ));
    }
    Ok(parts.join("; "))
}

fn add_award(store: &Store, values: &[String]) -> Result<String> {
    if values[0].is_empty() {
        return Err(Error::Format {
            what: "name",
            input: String::new(),
            expected: "a non-empty name",
        });
    }
    let price = values[1].parse().map_err(|_| Error::Format {
        what: "number",
        input: values[1].clone(),
        expected: "an integer",
    })?;
    let id = store.add_award(&values[0], price)?;
    Ok(format!("created award {id}"))
}
