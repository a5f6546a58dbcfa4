use std::sync::Arc;

use ratatui::Frame;

use crate::app::{HandleCtx, InputModalState, Section, SectionCounts, State, Transition, UiState};
use crate::config::PushConfig;
use crate::event::{Event, Job};
use crate::git::{self, FileEntry, RepoState};
use crate::input::{Input, InputMap, Key};
use crate::queue::UnboundedQueue;
use crate::term;
use crate::ui;

type BaseHandler = fn(&mut BaseState, &mut HandleCtx<'_>) -> Transition;

/// The root state: owns the current repository snapshot, the selection, and
/// the key bindings. Sits at the bottom of the stack and is never popped.
pub struct BaseState {
    keymap: InputMap<BaseHandler>,
    /// Chord cursor: the inputs consumed so far toward a multi-key binding.
    pending: Vec<Input>,
    pub repo: Option<RepoState>,
    pub ui: UiState,
    jobs: Arc<UnboundedQueue<Job>>,
}

impl BaseState {
    pub fn new(jobs: Arc<UnboundedQueue<Job>>, repo: Option<RepoState>, expanded: bool) -> Self {
        let mut keymap: InputMap<BaseHandler> = InputMap::new();
        keymap.add(&[Input::plain(Key::Up)], Self::arrow_up);
        keymap.add(&[Input::plain(Key::Down)], Self::arrow_down);
        keymap.add(&[Input::plain(Key::Tab)], Self::toggle_expand);
        keymap.add(&[Input::ch('s')], Self::stage);
        keymap.add(&[Input::ch('u')], Self::unstage);
        keymap.add(&[Input::ch('p')], Self::push_remote);
        keymap.add(&[Input::ch('b')], Self::branch);
        keymap.add(&[Input::ch('c'), Input::ch('c')], Self::commit);

        Self {
            keymap,
            pending: Vec::new(),
            repo,
            ui: UiState::new(expanded),
            jobs,
        }
    }

    fn counts(&self) -> SectionCounts {
        match &self.repo {
            Some(repo) => SectionCounts {
                untracked: repo.untracked.len(),
                unstaged: repo.unstaged.len(),
                staged: repo.staged.len(),
            },
            None => SectionCounts::default(),
        }
    }

    // ── Input routing ──

    fn on_input(&mut self, ctx: &mut HandleCtx, input: Input) -> Transition {
        // Escape first unwinds a half-typed chord, and only then quits.
        if input.key == Key::Esc && !self.pending.is_empty() {
            self.pending.clear();
            return Transition::Stop;
        }
        if is_exit_key(input) {
            return Transition::Exit;
        }

        self.pending.push(input);
        let handler = match self.keymap.node_at(&self.pending) {
            None => {
                self.pending.clear();
                return Transition::Stop;
            }
            Some(node) => node.handler(),
        };
        match handler {
            Some(handler) => {
                self.pending.clear();
                handler(self, ctx)
            }
            // A bound prefix: hold the cursor and wait for the next key.
            None => Transition::Stop,
        }
    }

    // ── Handlers ──

    fn arrow_up(&mut self, _ctx: &mut HandleCtx) -> Transition {
        let counts = self.counts();
        self.ui.move_up(&counts);
        Transition::Stop
    }

    fn arrow_down(&mut self, _ctx: &mut HandleCtx) -> Transition {
        let counts = self.counts();
        self.ui.move_down(&counts);
        Transition::Stop
    }

    fn toggle_expand(&mut self, _ctx: &mut HandleCtx) -> Transition {
        self.ui.toggle_expand();
        Transition::Stop
    }

    /// Optimistically move the selected entries into `staged`, then hand the
    /// real work to the job worker. On the header row the whole section is
    /// the target.
    fn stage(&mut self, _ctx: &mut HandleCtx) -> Transition {
        let Some(repo) = self.repo.as_mut() else {
            return Transition::Stop;
        };
        let from_untracked = match self.ui.section {
            Section::Untracked => true,
            Section::Unstaged => false,
            _ => return Transition::Stop,
        };
        let pos = self.ui.pos;
        let source = if from_untracked {
            &mut repo.untracked
        } else {
            &mut repo.unstaged
        };
        let targets: Vec<FileEntry> = if pos == 0 {
            std::mem::take(source)
        } else if pos <= source.len() {
            vec![source.remove(pos - 1)]
        } else {
            Vec::new()
        };
        if targets.is_empty() {
            return Transition::Stop;
        }

        // The worktree-side label is a placeholder until the next reload
        // brings the parsed truth back.
        let label = if from_untracked { "added" } else { "modified" };
        let paths: Vec<String> = targets.iter().map(|e| e.path.clone()).collect();
        for entry in targets {
            insert_sorted(&mut repo.staged, FileEntry::new(entry.path, label));
        }

        let counts = self.counts();
        self.ui.clamp(&counts);
        self.jobs.put(Job::Stage(paths));
        Transition::Stop
    }

    /// Collect the selected staged paths and enqueue the unstage. No
    /// optimistic removal: the post-job reload moves the rows back.
    fn unstage(&mut self, _ctx: &mut HandleCtx) -> Transition {
        let Some(repo) = self.repo.as_ref() else {
            return Transition::Stop;
        };
        if self.ui.section != Section::Staged {
            return Transition::Stop;
        }
        let paths: Vec<String> = if self.ui.pos == 0 {
            repo.staged.iter().map(|e| e.path.clone()).collect()
        } else {
            repo.staged
                .get(self.ui.pos - 1)
                .map(|e| vec![e.path.clone()])
                .unwrap_or_default()
        };
        if paths.is_empty() {
            return Transition::Stop;
        }

        let counts = self.counts();
        self.ui.clamp(&counts);
        self.jobs.put(Job::Unstage(paths));
        Transition::Stop
    }

    fn push_remote(&mut self, ctx: &mut HandleCtx) -> Transition {
        let (remote, branch) = push_target(self.repo.as_ref(), &ctx.config.push);
        self.jobs.put(Job::Push { remote, branch });
        Transition::Stop
    }

    /// Load the branch listing synchronously and layer a prompt over it.
    fn branch(&mut self, ctx: &mut HandleCtx) -> Transition {
        match git::list_branches(ctx.repo_root) {
            Ok(refs) => {
                let options: Vec<String> = refs.into_iter().map(|r| r.refname).collect();
                Transition::Push(Box::new(InputModalState::new("branch", options)))
            }
            Err(err) => {
                tracing::warn!("branch listing failed: {err:#}");
                Transition::Stop
            }
        }
    }

    /// Hand the terminal back to cooked mode for the editor-driven commit,
    /// then re-enter raw mode and queue a reload. Runs on the foreground
    /// actor on purpose: nothing else may touch terminal modes.
    fn commit(&mut self, ctx: &mut HandleCtx) -> Transition {
        match term::suspend(|| git::commit_interactive(ctx.repo_root)) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!("commit did not complete: {err:#}"),
            Err(err) => tracing::warn!("terminal suspend failed: {err:#}"),
        }
        ctx.full_redraw = true;
        self.jobs.put(Job::Refresh);
        Transition::Stop
    }
}

impl State for BaseState {
    fn paint(&mut self, f: &mut Frame) {
        ui::draw(f, self.repo.as_ref(), &self.ui);
    }

    fn handle(&mut self, ctx: &mut HandleCtx, event: &mut Event) -> Transition {
        match event {
            Event::Input(input) => self.on_input(ctx, *input),
            Event::RepoState(new) => {
                // Adopt the fresh snapshot; the old one drops here. Selection
                // survives, clamped into the new list bounds.
                self.repo = Some(std::mem::take(new));
                let counts = self.counts();
                self.ui.clamp(&counts);
                Transition::Stop
            }
        }
    }
}

fn is_exit_key(input: Input) -> bool {
    match input.key {
        Key::Esc => true,
        Key::Char('q') => !input.modifiers.ctrl && !input.modifiers.alt,
        Key::Char('c') => input.modifiers.ctrl,
        _ => false,
    }
}

/// Insert keeping lexicographic path order; an existing row for the same
/// path is replaced.
fn insert_sorted(list: &mut Vec<FileEntry>, entry: FileEntry) {
    match list.binary_search_by(|e| e.path.as_str().cmp(&entry.path)) {
        Ok(i) => list[i] = entry,
        Err(i) => list.insert(i, entry),
    }
}

/// Where `p` pushes: the head branch, to the upstream's remote when one is
/// configured, falling back to the configured defaults.
fn push_target(repo: Option<&RepoState>, config: &PushConfig) -> (String, String) {
    let remote = repo
        .and_then(|r| r.branch_upstream.as_deref())
        .and_then(|upstream| upstream.split_once('/'))
        .map(|(remote, _)| remote.to_string())
        .unwrap_or_else(|| config.remote.clone());
    let branch = repo
        .and_then(|r| r.branch_head.clone())
        .unwrap_or_else(|| config.branch.clone());
    (remote, branch)
}
