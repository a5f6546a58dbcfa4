mod base;
mod modal;
mod state;

pub use base::BaseState;
pub use modal::InputModalState;
pub use state::{Section, SectionCounts, UiState};

use ratatui::Frame;

use crate::config::ShConfig;
use crate::event::Event;

/// What a state's `handle` tells the foreground loop to do next.
pub enum Transition {
    /// Terminate the foreground loop.
    Exit,
    /// Not handled here; offer the event to the state below.
    Pass,
    /// Remove and drop the top state (never the base).
    Pop,
    /// Layer a new state on top of the stack.
    Push(Box<dyn State>),
    /// Event consumed; nothing else this tick.
    Stop,
}

/// Per-dispatch context handed to state handlers.
pub struct HandleCtx<'a> {
    pub repo_root: &'a str,
    pub config: &'a ShConfig,
    /// Set by handlers that hand the terminal to a child process; tells the
    /// orchestrator to drop ratatui's back buffer before the next paint.
    pub full_redraw: bool,
}

/// A modal UI state. Paints are layered bottom-up, events dispatched
/// top-down. Teardown is `Drop`: popping a state drops its box.
pub trait State {
    fn paint(&mut self, f: &mut Frame);
    fn handle(&mut self, ctx: &mut HandleCtx, event: &mut Event) -> Transition;
}

/// Ordered stack of modal states with a non-removable base.
pub struct StateStack {
    states: Vec<Box<dyn State>>,
}

impl StateStack {
    pub fn new(base: Box<dyn State>) -> Self {
        Self { states: vec![base] }
    }

    /// Paint every state, bottom first, so overlays land on top.
    pub fn paint_all(&mut self, f: &mut Frame) {
        for state in self.states.iter_mut() {
            state.paint(f);
        }
    }

    /// Offer the event to each state from the top down and apply the first
    /// transition that is not `Pass`. Returns `false` when the loop should
    /// exit.
    pub fn dispatch(&mut self, ctx: &mut HandleCtx, event: &mut Event) -> bool {
        for i in (0..self.states.len()).rev() {
            match self.states[i].handle(ctx, event) {
                Transition::Pass => continue,
                Transition::Stop => break,
                Transition::Exit => return false,
                Transition::Push(state) => {
                    self.states.push(state);
                    break;
                }
                Transition::Pop => {
                    if self.states.len() > 1 {
                        self.states.pop();
                    }
                    break;
                }
            }
        }
        true
    }

    #[allow(dead_code)]
    pub fn depth(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Input, Key};

    /// Test state that applies a fixed transition to every event.
    struct Scripted {
        next: Option<Transition>,
    }

    impl Scripted {
        fn new(transition: Transition) -> Self {
            Self {
                next: Some(transition),
            }
        }
    }

    impl State for Scripted {
        fn paint(&mut self, _f: &mut Frame) {}

        fn handle(&mut self, _ctx: &mut HandleCtx, _event: &mut Event) -> Transition {
            self.next.take().unwrap_or(Transition::Pass)
        }
    }

    fn input_event() -> Event {
        Event::Input(Input::plain(Key::Enter))
    }

    fn dispatch_one(stack: &mut StateStack) -> bool {
        let config = ShConfig::default();
        let mut ctx = HandleCtx {
            repo_root: "",
            config: &config,
            full_redraw: false,
        };
        stack.dispatch(&mut ctx, &mut input_event())
    }

    #[test]
    fn push_grows_the_stack() {
        let mut stack = StateStack::new(Box::new(Scripted::new(Transition::Push(Box::new(
            Scripted::new(Transition::Stop),
        )))));
        assert!(dispatch_one(&mut stack));
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn pop_removes_the_top_state() {
        let mut stack = StateStack::new(Box::new(Scripted::new(Transition::Stop)));
        stack.states.push(Box::new(Scripted::new(Transition::Pop)));
        assert!(dispatch_one(&mut stack));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn pop_never_removes_the_base() {
        let mut stack = StateStack::new(Box::new(Scripted::new(Transition::Pop)));
        assert!(dispatch_one(&mut stack));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn pass_falls_through_to_the_state_below() {
        let mut stack = StateStack::new(Box::new(Scripted::new(Transition::Exit)));
        stack.states.push(Box::new(Scripted::new(Transition::Pass)));
        // The overlay passes; the base exits.
        assert!(!dispatch_one(&mut stack));
    }

    #[test]
    fn unconsumed_event_is_dropped() {
        let mut stack = StateStack::new(Box::new(Scripted::new(Transition::Pass)));
        assert!(dispatch_one(&mut stack));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut stack = StateStack::new(Box::new(Scripted::new(Transition::Exit)));
        assert!(!dispatch_one(&mut stack));
    }
}
