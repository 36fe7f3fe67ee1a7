//! Driver: terminal lifecycle and the navigation loop.

use std::io;
use std::path::Path;

use crossterm::execute;
use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};

use crate::config::{self, Config};
use crate::error::Result;
use crate::store::Store;

use super::screens::{self, Ctx};
use super::stack::{self, Screen};
use super::surface::Surface;

/// Run the dashboard until the navigation stack empties.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config::default_path);
    let config = config::read_config(&path)?;
    let store = Store::open(&config.db_path)?;

    let mut surface = Surface::new()?;

    // Leave the terminal usable even if a screen panics.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    let result = drive(&store, &config, &mut surface);
    let restored = surface.restore();
    result.and(restored)
}

fn drive(store: &Store, config: &Config, surface: &mut Surface) -> Result<()> {
    let mut stack = vec![Screen::Home];
    while let Some(top) = stack.last_mut() {
        let mut ctx = Ctx {
            store,
            config,
            surface: &mut *surface,
        };
        let nav = screens::run_screen(&mut ctx, top)?;
        stack::apply(&mut stack, nav);
    }
    Ok(())
}
