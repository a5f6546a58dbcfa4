use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, List, ListItem, Paragraph};
use ratatui::Frame;

use crate::app::{HandleCtx, State, Transition};
use crate::event::Event;
use crate::input::Key;
use crate::ui::styles;

/// Maximum option rows rendered under the input box.
const VISIBLE_OPTIONS: usize = 8;

/// A labeled prompt box layered over the underlying paint. Collects
/// printable characters until Enter or Escape pops it; everything else
/// falls through to the state below.
pub struct InputModalState {
    title: String,
    contents: String,
    options: Vec<String>,
}

impl InputModalState {
    pub fn new(title: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            title: title.into(),
            contents: String::new(),
            options,
        }
    }

    /// Options whose text contains the typed input, case-insensitively.
    fn filtered(&self) -> Vec<&str> {
        let needle = self.contents.to_ascii_lowercase();
        self.options
            .iter()
            .filter(|o| o.to_ascii_lowercase().contains(&needle))
            .take(VISIBLE_OPTIONS)
            .map(String::as_str)
            .collect()
    }
}

impl State for InputModalState {
    fn paint(&mut self, f: &mut Frame) {
        let area = f.area();
        let width = ((self.contents.len().max(50) + 4) as u16).min(area.width);
        let rect = centered(width, 3, area);

        f.render_widget(Clear, rect);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(styles::modal_border_style())
            .title(Span::styled(
                format!(" {} ", self.title),
                styles::modal_title_style(),
            ));
        let prompt = Line::from(vec![
            Span::raw(self.contents.clone()),
            Span::styled("█", styles::cursor_style()),
        ]);
        f.render_widget(
            Paragraph::new(prompt)
                .style(styles::modal_style())
                .block(block),
            rect,
        );

        let filtered = self.filtered();
        let room = area.bottom().saturating_sub(rect.bottom());
        if filtered.is_empty() || room == 0 {
            return;
        }
        let below = Rect {
            x: rect.x,
            y: rect.bottom(),
            width: rect.width,
            height: (filtered.len() as u16).min(room),
        };
        f.render_widget(Clear, below);
        let items: Vec<ListItem> = filtered
            .into_iter()
            .map(|o| ListItem::new(format!("  {o}")))
            .collect();
        f.render_widget(List::new(items).style(styles::modal_style()), below);
    }

    fn handle(&mut self, _ctx: &mut HandleCtx, event: &mut Event) -> Transition {
        let Event::Input(input) = event else {
            // Passive overlay: repository updates belong to the base.
            return Transition::Pass;
        };
        match input.key {
            Key::Esc | Key::Enter => Transition::Pop,
            Key::Backspace => {
                self.contents.pop();
                Transition::Stop
            }
            Key::Char(c)
                if (c.is_ascii_alphanumeric() || c == ' ')
                    && !input.modifiers.ctrl
                    && !input.modifiers.alt =>
            {
                self.contents.push(if input.modifiers.shift {
                    c.to_ascii_uppercase()
                } else {
                    c
                });
                Transition::Stop
            }
            _ => Transition::Pass,
        }
    }
}

fn centered(width: u16, height: u16, area: Rect) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShConfig;
    use crate::git::RepoState;
    use crate::input::Input;

    fn press(modal: &mut InputModalState, input: Input) -> Transition {
        let config = ShConfig::default();
        let mut ctx = HandleCtx {
            repo_root: "",
            config: &config,
            full_redraw: false,
        };
        modal.handle(&mut ctx, &mut Event::Input(input))
    }

    #[test]
    fn typing_collects_characters_then_enter_pops() {
        let mut modal = InputModalState::new("branch", vec![]);
        for c in ['f', 'o', 'o'] {
            assert!(matches!(press(&mut modal, Input::ch(c)), Transition::Stop));
        }
        assert_eq!(modal.contents, "foo");
        assert!(matches!(
            press(&mut modal, Input::plain(Key::Enter)),
            Transition::Pop
        ));
    }

    #[test]
    fn escape_pops() {
        let mut modal = InputModalState::new("branch", vec![]);
        assert!(matches!(
            press(&mut modal, Input::plain(Key::Esc)),
            Transition::Pop
        ));
    }

    #[test]
    fn shift_uppercases() {
        let mut modal = InputModalState::new("branch", vec![]);
        let mut input = Input::ch('a');
        input.modifiers.shift = true;
        press(&mut modal, input);
        press(&mut modal, Input::ch('b'));
        assert_eq!(modal.contents, "Ab");
    }

    #[test]
    fn backspace_drops_last_byte_and_survives_empty() {
        let mut modal = InputModalState::new("branch", vec![]);
        press(&mut modal, Input::ch('x'));
        assert!(matches!(
            press(&mut modal, Input::plain(Key::Backspace)),
            Transition::Stop
        ));
        assert_eq!(modal.contents, "");
        assert!(matches!(
            press(&mut modal, Input::plain(Key::Backspace)),
            Transition::Stop
        ));
    }

    #[test]
    fn unhandled_keys_pass_to_the_state_below() {
        let mut modal = InputModalState::new("branch", vec![]);
        assert!(matches!(
            press(&mut modal, Input::plain(Key::Up)),
            Transition::Pass
        ));
        assert!(matches!(
            press(&mut modal, Input::ctrl('c')),
            Transition::Pass
        ));
    }

    #[test]
    fn repo_state_events_pass_through() {
        let mut modal = InputModalState::new("branch", vec![]);
        let config = ShConfig::default();
        let mut ctx = HandleCtx {
            repo_root: "",
            config: &config,
            full_redraw: false,
        };
        let result = modal.handle(&mut ctx, &mut Event::RepoState(RepoState::default()));
        assert!(matches!(result, Transition::Pass));
        assert_eq!(modal.contents, "");
    }

    #[test]
    fn options_filter_by_typed_substring() {
        let mut modal = InputModalState::new(
            "branch",
            vec![
                "refs/heads/main".to_string(),
                "refs/heads/feature".to_string(),
                "refs/heads/FEAT-123".to_string(),
            ],
        );
        press(&mut modal, Input::ch('f'));
        press(&mut modal, Input::ch('e'));
        press(&mut modal, Input::ch('a'));
        let filtered = modal.filtered();
        assert_eq!(filtered, vec!["refs/heads/feature", "refs/heads/FEAT-123"]);
    }
}
