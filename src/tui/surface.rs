//! Terminal ownership: raw mode, pane geometry, key and line input.
//!
//! Screens consume panes; they never touch the terminal directly. Geometry
//! is recomputed from the frame area on every draw, so a resize only needs
//! a redraw, never a stack change.

use std::io::{self, Stdout};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use crate::error::Result;

/// Fixed pane regions: the main list, a 2-row message/input line, the
/// 5-row boxed command legend, and a 1-row status bar.
#[derive(Debug, Clone, Copy)]
pub struct Panes {
    pub list: Rect,
    pub message: Rect,
    pub legend: Rect,
    pub status: Rect,
}

impl Panes {
    pub fn compute(area: Rect) -> Self {
        let [list, message, legend, status] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(2),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .areas(area);
        Panes {
            list,
            message,
            legend,
            status,
        }
    }
}

/// A key press, or a resize the caller should answer with a redraw.
pub enum Input {
    Key(KeyCode),
    Resize,
}

/// What the user did at a line prompt.
pub enum LineEntry {
    Text(String),
    /// Esc: discard the surrounding flow.
    Cancel,
    /// Tab: accept defaults for everything that remains.
    FinishEarly,
}

pub struct Surface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Surface {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;
        Ok(Surface { terminal })
    }

    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    pub fn draw(&mut self, draw: &mut dyn FnMut(&mut Frame, &Panes)) -> Result<()> {
        self.terminal.draw(|frame| {
            let panes = Panes::compute(frame.area());
            draw(frame, &panes);
        })?;
        Ok(())
    }

    /// Block for the next key press. A terminal resize surfaces as its own
    /// event instead of being swallowed.
    pub fn read_key(&mut self) -> Result<Input> {
        loop {
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) => return Ok(Input::Key(code)),
                Event::Resize(..) => return Ok(Input::Resize),
                _ => {}
            }
        }
    }

    /// Prompt for one line in the message pane, echoing over the screen the
    /// caller keeps drawing underneath. Enter submits (possibly empty), Esc
    /// cancels, Tab finishes early.
    pub fn read_line(
        &mut self,
        prompt: &str,
        draw: &mut dyn FnMut(&mut Frame, &Panes),
    ) -> Result<LineEntry> {
        let mut buffer = String::new();
        loop {
            self.terminal.draw(|frame| {
                let panes = Panes::compute(frame.area());
                draw(frame, &panes);
                let echo = Line::from(format!("{prompt}: {buffer}_"));
                frame.render_widget(Paragraph::new(echo), panes.message);
            })?;
            match self.read_key()? {
                Input::Resize => {}
                Input::Key(KeyCode::Enter) => return Ok(LineEntry::Text(buffer)),
                Input::Key(KeyCode::Esc) => return Ok(LineEntry::Cancel),
                Input::Key(KeyCode::Tab) => return Ok(LineEntry::FinishEarly),
                Input::Key(KeyCode::Backspace) => {
                    buffer.pop();
                }
                Input::Key(KeyCode::Char(c)) => buffer.push(c),
                Input::Key(_) => {}
            }
        }
    }

    /// y/n prompt in the message pane; Enter takes the default, Esc
    /// declines.
    pub fn confirm(
        &mut self,
        prompt: &str,
        default: bool,
        draw: &mut dyn FnMut(&mut Frame, &Panes),
    ) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            self.terminal.draw(|frame| {
                let panes = Panes::compute(frame.area());
                draw(frame, &panes);
                let echo = Line::from(format!("{prompt} [{hint}]"));
                frame.render_widget(Paragraph::new(echo), panes.message);
            })?;
            match self.read_key()? {
                Input::Resize => {}
                Input::Key(KeyCode::Char('y' | 'Y')) => return Ok(true),
                Input::Key(KeyCode::Char('n' | 'N') | KeyCode::Esc) => return Ok(false),
                Input::Key(KeyCode::Enter) => return Ok(default),
                Input::Key(_) => {}
            }
        }
    }
}
