use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CtEvent, KeyEventKind};

use crate::event::{Event, Job};
use crate::git;
use crate::input::Input;
use crate::queue::{LockstepQueue, UnboundedQueue};

/// Worker errors are fatal: the foreground assumes a steady supply of
/// events, and a silently stalled producer would livelock it. The panic
/// hook restores the terminal and exits the process.
fn fatal(worker: &str, err: anyhow::Error) -> ! {
    tracing::error!("{worker} worker failed: {err:#}");
    panic!("{worker} worker failed: {err:#}");
}

/// Blocking-read terminal input, decoded into `Event::Input`. Key presses
/// only; resize and release events are skipped — the window size is
/// re-queried on every paint anyway.
pub fn spawn_input(events: Arc<LockstepQueue<Event>>) -> JoinHandle<()> {
    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    events.put(Event::Input(Input::from_key_event(key)));
                }
                Ok(_) => {}
                Err(err) => fatal("input", err.into()),
            }
        })
        .expect("failed to spawn input worker")
}

/// Re-parse the repository on a fixed interval and publish the snapshot.
pub fn spawn_refresh(
    events: Arc<LockstepQueue<Event>>,
    repo_root: String,
    interval: Duration,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("refresh".to_string())
        .spawn(move || loop {
            thread::sleep(interval);
            match git::load_status(&repo_root) {
                Ok(state) => events.put(Event::RepoState(state)),
                Err(err) => fatal("refresh", err),
            }
        })
        .expect("failed to spawn refresh worker")
}

/// Drain the job queue serially. After every job — including the no-op
/// `Refresh` — reload the repository and publish it, so the UI converges on
/// the real state no matter what the optimistic update guessed.
pub fn spawn_jobs(
    events: Arc<LockstepQueue<Event>>,
    jobs: Arc<UnboundedQueue<Job>>,
    repo_root: String,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("jobs".to_string())
        .spawn(move || loop {
            let job = jobs.take();
            if let Err(err) = run_job(&repo_root, job) {
                fatal("job", err);
            }
            match git::load_status(&repo_root) {
                Ok(state) => events.put(Event::RepoState(state)),
                Err(err) => fatal("job", err),
            }
        })
        .expect("failed to spawn job worker")
}

fn run_job(repo_root: &str, job: Job) -> Result<()> {
    match job {
        Job::Stage(paths) => git::stage_paths(repo_root, &paths),
        Job::Unstage(paths) => git::unstage_paths(repo_root, &paths),
        Job::Push { remote, branch } => {
            tracing::info!("pushing {branch} to {remote}");
            git::push(repo_root, &remote, &branch)
        }
        Job::Refresh => Ok(()),
    }
}
