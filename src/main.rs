mod app;
mod config;
mod event;
mod git;
mod input;
mod queue;
mod term;
mod ui;
mod worker;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use app::{BaseState, HandleCtx, StateStack};
use config::ShConfig;
use event::Event;
use queue::{LockstepQueue, UnboundedQueue};

fn main() -> Result<()> {
    init_logging();
    let config = config::load_config();

    // Resolve the working tree before touching the terminal, so "not a
    // repository" is an ordinary error message rather than a garbled screen.
    let repo_root = git::get_repo_root()?;
    let initial = git::load_status(&repo_root)?;

    let mut terminal = term::init()?;

    let events = Arc::new(LockstepQueue::new());
    let jobs = Arc::new(UnboundedQueue::new());

    worker::spawn_input(Arc::clone(&events));
    worker::spawn_refresh(
        Arc::clone(&events),
        repo_root.clone(),
        Duration::from_secs(config.refresh.interval_secs),
    );
    worker::spawn_jobs(Arc::clone(&events), Arc::clone(&jobs), repo_root.clone());

    let base = BaseState::new(Arc::clone(&jobs), Some(initial), !config.ui.start_collapsed);
    let mut stack = StateStack::new(Box::new(base));

    let result = run(&mut terminal, &mut stack, &events, &repo_root, &config);

    term::restore()?;
    result
}

/// The foreground loop: paint the whole stack, take exactly one event,
/// route it through the stack, acknowledge. Producers stay blocked until
/// the acknowledge, which is what makes each paint observe a settled
/// snapshot.
fn run(
    terminal: &mut term::Tui,
    stack: &mut StateStack,
    events: &LockstepQueue<Event>,
    repo_root: &str,
    config: &ShConfig,
) -> Result<()> {
    loop {
        terminal.draw(|f| stack.paint_all(f))?;

        let mut event = events.take();
        let mut ctx = HandleCtx {
            repo_root,
            config,
            full_redraw: false,
        };
        let keep_going = stack.dispatch(&mut ctx, &mut event);
        if ctx.full_redraw {
            terminal.clear()?;
        }
        events.advance();

        if !keep_going {
            return Ok(());
        }
    }
}

/// Append tracing output to the file named by STAGEHAND_LOG. Writing logs
/// to the controlled terminal would corrupt the paint, so no file means no
/// logging at all.
fn init_logging() {
    let Some(path) = std::env::var_os("STAGEHAND_LOG") else {
        return;
    };
    let Ok(file) = std::fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
}
