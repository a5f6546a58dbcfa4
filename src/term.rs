use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Whether this process currently owns the terminal modes. `suspend` and
/// `restore` are no-ops outside an active session.
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Enter raw mode and the alternate screen, and install a panic hook that
/// puts the terminal back before the process dies. The hook also exits the
/// process: a dead worker would otherwise livelock the foreground, so any
/// panic anywhere is fatal to the whole UI.
pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, Hide)?;
    ACTIVE.store(true, Ordering::SeqCst);

    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore();
        hook(info);
        std::process::exit(1);
    }));

    Ok(Terminal::new(CrosstermBackend::new(io::stdout()))?)
}

/// Leave the alternate screen and return to cooked mode. Idempotent, so the
/// panic hook can race a normal shutdown safely.
pub fn restore() -> Result<()> {
    if !ACTIVE.swap(false, Ordering::SeqCst) {
        return Ok(());
    }
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    disable_raw_mode()?;
    Ok(())
}

/// Yield the terminal to a child process for the duration of `f`, then take
/// the modes back. Only the foreground actor may call this; the session
/// stays active throughout.
pub fn suspend<T>(f: impl FnOnce() -> T) -> Result<T> {
    if !ACTIVE.load(Ordering::SeqCst) {
        return Ok(f());
    }
    execute!(io::stdout(), LeaveAlternateScreen, Show)?;
    disable_raw_mode()?;
    let value = f();
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, Hide)?;
    Ok(value)
}
