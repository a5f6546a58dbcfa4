use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ── Key model ──

/// A decoded key. `Char` always carries the lowercased character; uppercase
/// input is represented as the lowercase char plus `Modifiers::shift`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Tab,
    Enter,
    Backspace,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Input {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Input {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    /// A plain character input (lowercased).
    pub fn ch(c: char) -> Self {
        Self::plain(Key::Char(c.to_ascii_lowercase()))
    }

    #[allow(dead_code)]
    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c.to_ascii_lowercase()),
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        }
    }

    /// Decode a crossterm key event into the crate's input model.
    pub fn from_key_event(event: KeyEvent) -> Self {
        let mut modifiers = Modifiers {
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            alt: event.modifiers.contains(KeyModifiers::ALT),
        };
        let key = match event.code {
            KeyCode::Char(c) => {
                if c.is_ascii_uppercase() {
                    modifiers.shift = true;
                }
                Key::Char(c.to_ascii_lowercase())
            }
            KeyCode::Tab => Key::Tab,
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc => Key::Esc,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            _ => Key::Unknown,
        };
        Self { key, modifiers }
    }
}

// ── InputMap ──

/// One trie node: edges per `Input`, plus an optional handler on the node
/// reached by a complete bound sequence.
pub struct MapNode<H> {
    children: HashMap<Input, MapNode<H>>,
    handler: Option<H>,
}

impl<H: Copy> MapNode<H> {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            handler: None,
        }
    }

    /// Step one edge.
    pub fn get(&self, input: Input) -> Option<&MapNode<H>> {
        self.children.get(&input)
    }

    pub fn handler(&self) -> Option<H> {
        self.handler
    }
}

/// Prefix trie over `Input` sequences. Generic over the handler type so the
/// same trie can drive states with different handler signatures; `H` is a
/// function pointer in practice, hence `Copy` — callers copy the handler out
/// and release the trie borrow before invoking it.
pub struct InputMap<H> {
    root: MapNode<H>,
}

impl<H: Copy> InputMap<H> {
    pub fn new() -> Self {
        Self {
            root: MapNode::new(),
        }
    }

    /// Bind `sequence` to `handler`, creating intermediate nodes as needed.
    /// Re-binding an existing sequence overwrites its handler.
    pub fn add(&mut self, sequence: &[Input], handler: H) {
        let mut node = &mut self.root;
        for input in sequence {
            node = node.children.entry(*input).or_insert_with(MapNode::new);
        }
        node.handler = Some(handler);
    }

    /// Replay a pending prefix from the root. `None` means the prefix is not
    /// bound, not even as the start of a longer chord.
    pub fn node_at(&self, prefix: &[Input]) -> Option<&MapNode<H>> {
        let mut node = &self.root;
        for input in prefix {
            node = node.get(*input)?;
        }
        Some(node)
    }
}

impl<H: Copy> Default for InputMap<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Handler = fn() -> u32;

    fn one() -> u32 {
        1
    }
    fn two() -> u32 {
        2
    }

    // ── decode ──

    #[test]
    fn decode_lowercase_char() {
        let input = Input::from_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE));
        assert_eq!(input, Input::ch('s'));
    }

    #[test]
    fn decode_uppercase_char_sets_shift() {
        let input = Input::from_key_event(KeyEvent::new(KeyCode::Char('S'), KeyModifiers::SHIFT));
        assert_eq!(input.key, Key::Char('s'));
        assert!(input.modifiers.shift);
    }

    #[test]
    fn decode_ctrl_c() {
        let input = Input::from_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(input, Input::ctrl('c'));
    }

    #[test]
    fn decode_unrecognized_key_is_unknown() {
        let input = Input::from_key_event(KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE));
        assert_eq!(input.key, Key::Unknown);
    }

    // ── trie ──

    #[test]
    fn add_then_walk_single_key() {
        let mut map: InputMap<Handler> = InputMap::new();
        map.add(&[Input::ch('p')], one);
        let node = map.node_at(&[Input::ch('p')]).unwrap();
        assert_eq!(node.handler().unwrap()(), 1);
    }

    #[test]
    fn add_then_walk_chord_one_step_at_a_time() {
        let mut map: InputMap<Handler> = InputMap::new();
        map.add(&[Input::ch('c'), Input::ch('c')], two);

        let first = map.node_at(&[Input::ch('c')]).unwrap();
        assert!(first.handler().is_none());

        let second = first.get(Input::ch('c')).unwrap();
        assert_eq!(second.handler().unwrap()(), 2);
    }

    #[test]
    fn unbound_prefix_misses() {
        let mut map: InputMap<Handler> = InputMap::new();
        map.add(&[Input::ch('c'), Input::ch('c')], one);
        assert!(map.node_at(&[Input::ch('x')]).is_none());
        assert!(map.node_at(&[Input::ch('c'), Input::ch('x')]).is_none());
    }

    #[test]
    fn rebinding_overwrites_handler() {
        let mut map: InputMap<Handler> = InputMap::new();
        map.add(&[Input::ch('p')], one);
        map.add(&[Input::ch('p')], two);
        let node = map.node_at(&[Input::ch('p')]).unwrap();
        assert_eq!(node.handler().unwrap()(), 2);
    }

    #[test]
    fn chord_prefix_does_not_shadow_sibling_binding() {
        let mut map: InputMap<Handler> = InputMap::new();
        map.add(&[Input::ch('c'), Input::ch('c')], one);
        map.add(&[Input::ch('s')], two);
        assert!(map.node_at(&[Input::ch('s')]).unwrap().handler().is_some());
        assert!(map.node_at(&[Input::ch('c')]).unwrap().handler().is_none());
    }

    #[test]
    fn inputs_differing_only_in_modifiers_are_distinct_edges() {
        let mut map: InputMap<Handler> = InputMap::new();
        map.add(&[Input::ch('c')], one);
        map.add(&[Input::ctrl('c')], two);
        assert_eq!(map.node_at(&[Input::ch('c')]).unwrap().handler().unwrap()(), 1);
        assert_eq!(map.node_at(&[Input::ctrl('c')]).unwrap().handler().unwrap()(), 2);
    }
}
