use crate::git::RepoState;
use crate::input::Input;

/// What the worker threads feed the foreground loop.
#[derive(Debug, PartialEq)]
pub enum Event {
    Input(Input),
    /// A freshly parsed repository snapshot. Ownership transfers across the
    /// event queue; the consumer takes the payload out when adopting it.
    RepoState(RepoState),
}

/// Work for the job worker. Path payloads are owned and freed by the worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    Stage(Vec<String>),
    Unstage(Vec<String>),
    Push { remote: String, branch: String },
    /// No direct action; exists to force the post-job reload that follows
    /// every job, e.g. after an interactive commit.
    Refresh,
}
