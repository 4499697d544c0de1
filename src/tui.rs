use crate::app::{App, AppResult};
use crate::event::EventHandler;
use crate::ui;
use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
#[cfg(not(target_os = "windows"))]
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::io;
use std::panic;
use tracing::{debug, error};

/// Owns the terminal while the chat is on screen.
///
/// Raw mode and the alternate screen are entered in [`Tui::init`] and always
/// undone by [`Tui::exit`] or, on panic, by the installed hook.
#[derive(Debug)]
pub struct Tui<B: Backend> {
    terminal: Terminal<B>,
    /// Terminal event handler.
    pub events: EventHandler,
}

impl<B: Backend> Tui<B>
where
    B::Error: Send + Sync + 'static,
{
    pub fn new(terminal: Terminal<B>, events: EventHandler) -> Self {
        Self { terminal, events }
    }

    pub fn init(&mut self) -> AppResult<()> {
        terminal::enable_raw_mode().context("Could not enable raw mode")?;
        // Keyboard enhancement lets modified Enter reach us as a distinct key.
        #[cfg(not(target_os = "windows"))]
        crossterm::execute!(
            io::stderr(),
            EnterAlternateScreen,
            EnableMouseCapture,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )
        .context("Could not initialize terminal")?;

        #[cfg(target_os = "windows")]
        crossterm::execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)
            .context("Could not initialize terminal")?;

        let panic_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            error!(%info, "panic, restoring terminal");
            if let Err(e) = reset() {
                eprintln!("failed to reset the terminal: {e:#}");
            }
            panic_hook(info);
        }));

        self.terminal
            .hide_cursor()
            .context("Error when hiding terminal cursor")?;
        self.terminal.clear().context("Could not clear terminal")?;
        debug!("terminal initialized");
        Ok(())
    }

    /// Draws one frame through [`ui::render`].
    pub fn draw(&mut self, app: &mut App) -> AppResult<()> {
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .context("Failed to render the user interface")?;
        Ok(())
    }

    /// Stops the event reader and hands the terminal back to the shell.
    pub fn exit(&mut self) -> AppResult<()> {
        self.events.stop();
        reset().context("Failed to reset terminal")?;
        self.terminal
            .show_cursor()
            .context("Failed to show cursor")?;
        debug!("terminal restored");
        Ok(())
    }
}

/// Leaves raw mode and the alternate screen. Also run from the panic hook.
fn reset() -> AppResult<()> {
    terminal::disable_raw_mode().context("Failed to disable raw mode")?;
    #[cfg(not(target_os = "windows"))]
    crossterm::execute!(
        io::stderr(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        PopKeyboardEnhancementFlags
    )
    .context("Failed resetting terminal")?;
    #[cfg(target_os = "windows")]
    crossterm::execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture)
        .context("Failed resetting terminal")?;
    Ok(())
}
