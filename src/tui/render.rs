//! Pane widgets shared by every screen: entity lists, the command legend,
//! the message line, and the status bar.

use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::project::Project;
use crate::model::rpg::{Award, Character, Quest, Skill};
use crate::model::task::Task;

use super::stack::Selection;
use super::surface::Panes;

const DIM: Style = Style::new().fg(Color::DarkGray);
const CURSOR: Style = Style::new().add_modifier(Modifier::REVERSED);

fn entry(selected: bool, under_cursor: bool, text: String) -> Line<'static> {
    let marker = if selected { '*' } else { ' ' };
    let line = Line::from(format!("{marker} {text}"));
    if under_cursor { line.style(CURSOR) } else { line }
}

/// Task rows; pass no selection for cursorless listings.
pub fn task_lines(tasks: &[Task], selection: Option<&Selection>) -> Vec<Line<'static>> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let status = if task.status.is_open() { "[ ]" } else { "[x]" };
            entry(
                selection.is_some_and(|s| s.marked.contains(&task.id)),
                selection.is_some_and(|s| i == s.cursor),
                format!(
                    "{status} {:>4}  {:>4}  {:<10}  {:<5}  {:>5.1}  {}",
                    task.id,
                    task.priority,
                    task.due_date.as_deref().unwrap_or("-"),
                    task.due_time.as_deref().unwrap_or("-"),
                    task.weight,
                    task.name,
                ),
            )
        })
        .collect()
}

pub fn project_lines(projects: &[Project], selection: &Selection) -> Vec<Line<'static>> {
    projects
        .iter()
        .enumerate()
        .map(|(i, project)| {
            entry(
                selection.marked.contains(&project.id),
                i == selection.cursor,
                format!(
                    "{} {:>4}  {:>4}  {}",
                    project.marker(),
                    project.id,
                    project.priority,
                    project.name,
                ),
            )
        })
        .collect()
}

pub fn quest_lines(quests: &[Quest], selection: &Selection) -> Vec<Line<'static>> {
    quests
        .iter()
        .enumerate()
        .map(|(i, quest)| {
            entry(
                selection.marked.contains(&quest.id),
                i == selection.cursor,
                format!(
                    "{:>4}  {:>4}xp  will {:>2}  time {:>2}  {}",
                    quest.id, quest.xp, quest.willingness, quest.time_cost, quest.name,
                ),
            )
        })
        .collect()
}

pub fn skill_lines(skills: &[Skill]) -> Vec<Line<'static>> {
    skills
        .iter()
        .map(|skill| {
            Line::from(format!(
                "    {:>4}  {} {} ({}/{} xp)",
                skill.id,
                skill.name,
                skill.level,
                skill.xp,
                Skill::LEVEL_XP,
            ))
            .style(DIM)
        })
        .collect()
}

pub fn award_lines(awards: &[Award], selection: &Selection) -> Vec<Line<'static>> {
    awards
        .iter()
        .enumerate()
        .map(|(i, award)| {
            entry(
                selection.marked.contains(&award.id),
                i == selection.cursor,
                format!("{:>4}  {:>5} gold  {}", award.id, award.price, award.name),
            )
        })
        .collect()
}

pub fn draw_list(frame: &mut Frame, panes: &Panes, title: &str, lines: &[Line<'static>]) {
    let body: Vec<Line> = if lines.is_empty() {
        vec![Line::from("(empty)").style(DIM)]
    } else {
        lines.to_vec()
    };
    let widget = Paragraph::new(body).block(
        Block::new()
            .borders(Borders::BOTTOM)
            .title(title.to_string()),
    );
    frame.render_widget(widget, panes.list);
}

pub fn draw_message(frame: &mut Frame, panes: &Panes, message: Option<&str>) {
    if let Some(message) = message {
        frame.render_widget(Paragraph::new(message.to_string()), panes.message);
    }
}

/// The boxed per-screen command legend. Entries are laid out over the
/// three content rows inside the border.
pub fn draw_legend(frame: &mut Frame, panes: &Panes, entries: &[(&str, &str)]) {
    let per_row = entries.len().div_ceil(3).max(1);
    let lines: Vec<Line> = entries
        .chunks(per_row)
        .map(|row| {
            Line::from(
                row.iter()
                    .map(|(key, what)| format!("{key} {what}"))
                    .collect::<Vec<_>>()
                    .join("   "),
            )
        })
        .collect();
    let widget =
        Paragraph::new(lines).block(Block::new().borders(Borders::ALL).title("commands"));
    frame.render_widget(widget, panes.legend);
}

/// Status bar: today's weight progress on the left, character stats on
/// the right.
pub fn draw_status(frame: &mut Frame, panes: &Panes, progress: (f64, f64), character: &Character) {
    let (closed, total) = progress;
    let left = format!("today {closed:.1}/{total:.1}");
    let right = format!(
        "lvl {}  xp {}/{}  gold {}",
        character.level, character.xp, character.xp_for_next_level, character.gold
    );
    frame.render_widget(Paragraph::new(left).style(DIM), panes.status);
    frame.render_widget(
        Paragraph::new(right).style(DIM).alignment(Alignment::Right),
        panes.status,
    );
}
