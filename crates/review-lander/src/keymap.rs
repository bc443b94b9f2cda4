//! Keybinding system
//!
//! Maps keyboard input to commands. Supports single keys, modifier
//! combinations and two-key sequences such as `g g`.
//!
//! Key patterns are textual:
//! - Single char: "q", "G" (case-sensitive)
//! - With modifiers: "ctrl+d", "shift+tab"
//! - Special keys: "tab", "enter", "esc", "up", "pagedown", ...
//! - Two-key sequence: "z a" (space-separated)

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use review_diff_engine::{DiffAction, FooterHint};
use std::time::{Duration, Instant};

/// Columns moved per horizontal scroll step.
const HORIZONTAL_STEP: usize = 8;

const SEQUENCE_TIMEOUT: Duration = Duration::from_secs(2);

/// Everything a key can trigger in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandId {
    NavigateNext,
    NavigatePrevious,
    NavigateToTop,
    NavigateToBottom,
    NextHunk,
    PrevHunk,
    HalfPageDown,
    HalfPageUp,
    PageDown,
    PageUp,
    ScrollLeft,
    ScrollRight,
    ToggleFold,
    FoldAll,
    UnfoldAll,
    ToggleLayout,
    ToggleBlame,
    SearchStart,
    SearchNext,
    SearchPrevious,
    SearchClear,
    GoToLineStart,
    Close,
}

impl CommandId {
    /// The view action for this command.
    ///
    /// Prompt commands have none: they open a text prompt in the host and
    /// the action is only known once the prompt is confirmed.
    pub fn to_action(self) -> Option<DiffAction> {
        use CommandId::*;

        let action = match self {
            NavigateNext => DiffAction::CursorDown,
            NavigatePrevious => DiffAction::CursorUp,
            NavigateToTop => DiffAction::CursorFirst,
            NavigateToBottom => DiffAction::CursorLast,
            NextHunk => DiffAction::NextHunk,
            PrevHunk => DiffAction::PrevHunk,
            HalfPageDown => DiffAction::ScrollHalfDown,
            HalfPageUp => DiffAction::ScrollHalfUp,
            PageDown => DiffAction::ScrollPageDown,
            PageUp => DiffAction::ScrollPageUp,
            ScrollLeft => DiffAction::ScrollLeft(HORIZONTAL_STEP),
            ScrollRight => DiffAction::ScrollRight(HORIZONTAL_STEP),
            ToggleFold => DiffAction::ToggleFold,
            FoldAll => DiffAction::FoldAll,
            UnfoldAll => DiffAction::UnfoldAll,
            ToggleLayout => DiffAction::ToggleLayout,
            ToggleBlame => DiffAction::ToggleBlame,
            SearchNext => DiffAction::NextMatch,
            SearchPrevious => DiffAction::PrevMatch,
            SearchClear => DiffAction::ClearSearch,
            Close => DiffAction::Close,
            SearchStart | GoToLineStart => return None,
        };
        Some(action)
    }
}

/// A single keybinding that maps a key pattern to a command
#[derive(Debug, Clone)]
pub struct KeyBinding {
    /// Textual representation of the key(s)
    pub keys: String,
    /// Display hint for the UI
    pub hint: String,
    /// The command this binding triggers
    pub command: CommandId,
}

impl KeyBinding {
    pub fn new(keys: impl Into<String>, hint: impl Into<String>, command: CommandId) -> Self {
        Self {
            keys: keys.into(),
            hint: hint.into(),
            command,
        }
    }
}

/// Parsed key pattern for matching
#[derive(Debug, Clone, PartialEq)]
enum ParsedKeyPattern {
    Single {
        code: KeyCode,
        modifiers: KeyModifiers,
    },
    Sequence {
        first: char,
        second: char,
    },
}

fn parse_key_pattern(pattern: &str) -> Option<ParsedKeyPattern> {
    let pattern = pattern.trim();

    if pattern.contains(' ') {
        let parts: Vec<&str> = pattern.split_whitespace().collect();
        return match parts.as_slice() {
            [a, b] if a.chars().count() == 1 && b.chars().count() == 1 => {
                Some(ParsedKeyPattern::Sequence {
                    first: a.chars().next()?,
                    second: b.chars().next()?,
                })
            }
            _ => None,
        };
    }

    // Single characters keep their case; uppercase letters arrive with SHIFT
    if pattern.chars().count() == 1 {
        let c = pattern.chars().next()?;
        let modifiers = if c.is_ascii_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::NONE
        };
        return Some(ParsedKeyPattern::Single {
            code: KeyCode::Char(c),
            modifiers,
        });
    }

    let lower = pattern.to_lowercase();
    let mut modifiers = KeyModifiers::NONE;
    let mut key_part = lower.as_str();
    while let Some((modifier, rest)) = key_part.split_once('+') {
        match modifier {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => break,
        }
        key_part = rest;
    }

    let code = parse_key_code(key_part)?;
    Some(ParsedKeyPattern::Single { code, modifiers })
}

fn parse_key_code(s: &str) -> Option<KeyCode> {
    match s {
        "tab" => Some(KeyCode::Tab),
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "backspace" => Some(KeyCode::Backspace),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "space" => Some(KeyCode::Char(' ')),
        s if s.chars().count() == 1 => s.chars().next().map(KeyCode::Char),
        _ => None,
    }
}

/// First key of a sequence waiting for its second key
#[derive(Debug, Clone)]
pub struct PendingKey {
    pub key: char,
    pub timestamp: Instant,
}

/// Result of matching one key event
#[derive(Debug, Clone, PartialEq)]
pub enum KeyMatch {
    /// The key triggers a command.
    Command(CommandId),
    /// The key starts a sequence; wait for the next one.
    Pending(char),
    /// Nothing bound.
    Unbound,
}

/// The keymap - a collection of keybindings with matching logic
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: Vec<(KeyBinding, ParsedKeyPattern)>,
}

impl Keymap {
    /// Create a keymap, dropping bindings whose pattern does not parse
    pub fn new(bindings: Vec<KeyBinding>) -> Self {
        let parsed = bindings
            .into_iter()
            .filter_map(|binding| match parse_key_pattern(&binding.keys) {
                Some(pattern) => Some((binding, pattern)),
                None => {
                    log::warn!("Ignoring unparsable key binding {:?}", binding.keys);
                    None
                }
            })
            .collect();
        Self { bindings: parsed }
    }

    /// Match a key event, completing `pending` when it forms a sequence
    pub fn match_key(&self, key: &KeyEvent, pending: Option<&PendingKey>) -> KeyMatch {
        let current_char = match key.code {
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(c)
            }
            _ => None,
        };

        let pending = pending.filter(|p| p.timestamp.elapsed() < SEQUENCE_TIMEOUT);
        if let (Some(pending), Some(current)) = (pending, current_char) {
            let completed = self.bindings.iter().find(|(_, pattern)| {
                matches!(pattern, ParsedKeyPattern::Sequence { first, second }
                    if *first == pending.key && *second == current)
            });
            if let Some((binding, _)) = completed {
                return KeyMatch::Command(binding.command);
            }
        }

        let single = self.bindings.iter().find(|(_, pattern)| {
            matches!(pattern, ParsedKeyPattern::Single { code, modifiers }
                if key.code == *code && key.modifiers == *modifiers)
        });
        if let Some((binding, _)) = single {
            return KeyMatch::Command(binding.command);
        }

        let starts_sequence = current_char.filter(|c| {
            self.bindings.iter().any(|(_, pattern)| {
                matches!(pattern, ParsedKeyPattern::Sequence { first, .. } if first == c)
            })
        });
        match starts_sequence {
            Some(c) => KeyMatch::Pending(c),
            None => KeyMatch::Unbound,
        }
    }

    /// Compact hint for a command, e.g. "j/↓"
    pub fn compact_hint_for_command(&self, command: CommandId) -> Option<String> {
        let mut hints: Vec<&str> = Vec::new();
        for (binding, _) in self.bindings.iter().filter(|(b, _)| b.command == command) {
            if !hints.contains(&binding.hint.as_str()) {
                hints.push(&binding.hint);
            }
        }
        (!hints.is_empty()).then(|| hints.join("/"))
    }

    /// Footer hints for the given commands, skipping unbound ones
    pub fn footer_hints(&self, commands: &[(CommandId, &str)]) -> Vec<FooterHint> {
        commands
            .iter()
            .filter_map(|(command, description)| {
                self.compact_hint_for_command(*command)
                    .map(|key| FooterHint::new(key, *description))
            })
            .collect()
    }
}

/// Get the default keymap
pub fn default_keymap() -> Keymap {
    use CommandId::*;

    Keymap::new(vec![
        // Cursor
        KeyBinding::new("j", "j", NavigateNext),
        KeyBinding::new("down", "↓", NavigateNext),
        KeyBinding::new("k", "k", NavigatePrevious),
        KeyBinding::new("up", "↑", NavigatePrevious),
        KeyBinding::new("g g", "gg", NavigateToTop),
        KeyBinding::new("home", "Home", NavigateToTop),
        KeyBinding::new("G", "G", NavigateToBottom),
        KeyBinding::new("end", "End", NavigateToBottom),
        // Hunks
        KeyBinding::new("]", "]", NextHunk),
        KeyBinding::new("[", "[", PrevHunk),
        // Scrolling
        KeyBinding::new("ctrl+d", "Ctrl+D", HalfPageDown),
        KeyBinding::new("ctrl+u", "Ctrl+U", HalfPageUp),
        KeyBinding::new("pagedown", "PgDn", PageDown),
        KeyBinding::new("ctrl+f", "Ctrl+F", PageDown),
        KeyBinding::new("pageup", "PgUp", PageUp),
        KeyBinding::new("ctrl+b", "Ctrl+B", PageUp),
        KeyBinding::new("h", "h", ScrollLeft),
        KeyBinding::new("left", "←", ScrollLeft),
        KeyBinding::new("l", "l", ScrollRight),
        KeyBinding::new("right", "→", ScrollRight),
        // Folding
        KeyBinding::new("enter", "Enter", ToggleFold),
        KeyBinding::new("z a", "za", ToggleFold),
        KeyBinding::new("z M", "zM", FoldAll),
        KeyBinding::new("z R", "zR", UnfoldAll),
        // View
        KeyBinding::new("s", "s", ToggleLayout),
        KeyBinding::new("b", "b", ToggleBlame),
        // Search
        KeyBinding::new("/", "/", SearchStart),
        KeyBinding::new("n", "n", SearchNext),
        KeyBinding::new("N", "N", SearchPrevious),
        KeyBinding::new("esc", "Esc", SearchClear),
        KeyBinding::new(":", ":", GoToLineStart),
        // General
        KeyBinding::new("q", "q", Close),
        KeyBinding::new("ctrl+c", "Ctrl+C", Close),
    ])
}
