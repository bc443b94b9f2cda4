//! Key event routing.
//!
//! Two layers, checked in order:
//! 1. An open prompt (search or go-to-line) consumes text input.
//! 2. Otherwise the keymap resolves the key, tracking two-key sequences.

use crate::keymap::{CommandId, KeyMatch, Keymap, PendingKey};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use review_diff_engine::DiffAction;
use std::time::Instant;

/// What an open prompt collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Search,
    GoToLine,
}

impl PromptKind {
    /// Leading character shown in the status line.
    pub fn marker(self) -> char {
        match self {
            PromptKind::Search => '/',
            PromptKind::GoToLine => ':',
        }
    }
}

/// Text typed into an open prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
}

/// Turns key events into view actions.
#[derive(Debug)]
pub struct InputHandler {
    keymap: Keymap,
    pending_key: Option<PendingKey>,
    prompt: Option<Prompt>,
}

impl InputHandler {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            pending_key: None,
            prompt: None,
        }
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// The open prompt, if any.
    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// Handle one key press, returning the action to dispatch.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<DiffAction> {
        if self.prompt.is_some() {
            self.pending_key = None;
            return self.handle_prompt_key(key);
        }

        match self.keymap.match_key(&key, self.pending_key.as_ref()) {
            KeyMatch::Pending(c) => {
                log::debug!("Waiting for second key in sequence (first: {})", c);
                self.pending_key = Some(PendingKey {
                    key: c,
                    timestamp: Instant::now(),
                });
                None
            }
            KeyMatch::Command(command) => {
                self.pending_key = None;
                self.run_command(command)
            }
            KeyMatch::Unbound => {
                self.pending_key = None;
                None
            }
        }
    }

    fn run_command(&mut self, command: CommandId) -> Option<DiffAction> {
        let kind = match command {
            CommandId::SearchStart => PromptKind::Search,
            CommandId::GoToLineStart => PromptKind::GoToLine,
            _ => return command.to_action(),
        };
        self.prompt = Some(Prompt {
            kind,
            text: String::new(),
        });
        None
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Option<DiffAction> {
        let prompt = self.prompt.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.prompt = None;
                None
            }
            KeyCode::Enter => {
                let prompt = self.prompt.take()?;
                confirm(prompt)
            }
            KeyCode::Backspace => {
                if prompt.text.pop().is_none() {
                    self.prompt = None;
                }
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                prompt.text.clear();
                None
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                if prompt.kind == PromptKind::Search || c.is_ascii_digit() {
                    prompt.text.push(c);
                }
                None
            }
            _ => None,
        }
    }
}

fn confirm(prompt: Prompt) -> Option<DiffAction> {
    match prompt.kind {
        PromptKind::Search if prompt.text.is_empty() => Some(DiffAction::ClearSearch),
        PromptKind::Search => Some(DiffAction::Search(prompt.text)),
        PromptKind::GoToLine => match prompt.text.parse() {
            Ok(line) => Some(DiffAction::GoToLine(line)),
            Err(_) => {
                log::debug!("Ignoring go-to-line input {:?}", prompt.text);
                None
            }
        },
    }
}
