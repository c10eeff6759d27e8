//! Terminal session guard.
//!
//! [`TerminalSession::acquire`] switches the terminal into raw mode and the
//! alternate screen; dropping the session switches both back, whichever way
//! the event loop exits. A panic hook restores the terminal before the panic
//! message is printed so it stays readable.

use std::io::{self, Stdout};
use std::sync::Once;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

pub type DashboardTerminal = Terminal<CrosstermBackend<Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// Owns the terminal for the lifetime of the dashboard.
pub struct TerminalSession {
    terminal: DashboardTerminal,
}

impl TerminalSession {
    pub fn acquire() -> anyhow::Result<Self> {
        install_panic_hook();

        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(io::stdout())) {
            Ok(t) => t,
            Err(e) => {
                release();
                return Err(e.into());
            }
        };

        tracing::debug!("terminal acquired");
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut DashboardTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        release();
        let _ = self.terminal.show_cursor();
        tracing::debug!("terminal released");
    }
}

fn release() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            release();
            original(info);
        }));
    });
}
