//! Single-line text field used by the login form and the list filters.

use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg};
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;

/// How typed characters are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    /// Characters are shown as typed.
    #[default]
    Normal,
    /// Every character is shown as `•`.
    Password,
}

/// A single-line text input.
///
/// Handles printable characters, backspace and `ctrl+u`; anything else is
/// left to the owning screen.
#[derive(Debug, Clone)]
pub struct Model {
    /// Drawn before the value.
    pub prompt: String,
    /// Shown while the value is empty.
    pub placeholder: String,
    /// Plain or masked display.
    pub echo_mode: EchoMode,
    /// Maximum number of characters; zero means unlimited.
    pub char_limit: usize,
    value: String,
    focus: bool,
    invalid: bool,
    /// Prompt style.
    pub prompt_style: Style,
    /// Placeholder style.
    pub placeholder_style: Style,
    /// Prompt style while marked invalid.
    pub invalid_style: Style,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// An empty, unfocused input with a `> ` prompt.
    pub fn new() -> Self {
        Self {
            prompt: "> ".to_string(),
            placeholder: String::new(),
            echo_mode: EchoMode::Normal,
            char_limit: 0,
            value: String::new(),
            focus: false,
            invalid: false,
            prompt_style: Style::new().foreground(Color::from("#7D56F4")),
            placeholder_style: Style::new().foreground(Color::from("240")),
            invalid_style: Style::new().foreground(Color::from("#FF5F87")),
        }
    }

    /// Sets the prompt.
    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = prompt.to_string();
        self
    }

    /// Sets the placeholder.
    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    /// Sets the echo mode.
    pub fn with_echo_mode(mut self, mode: EchoMode) -> Self {
        self.echo_mode = mode;
        self
    }

    /// Sets the character limit.
    pub fn with_char_limit(mut self, limit: usize) -> Self {
        self.char_limit = limit;
        self
    }

    /// Current text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replaces the text, truncated to the character limit.
    pub fn set_value(&mut self, value: &str) {
        self.value = if self.char_limit > 0 {
            value.chars().take(self.char_limit).collect()
        } else {
            value.to_string()
        };
    }

    /// Clears the text and the invalid mark.
    pub fn reset(&mut self) {
        self.value.clear();
        self.invalid = false;
    }

    /// Marks the field for inline error highlighting.
    pub fn set_invalid(&mut self, invalid: bool) {
        self.invalid = invalid;
    }

    /// Whether the field is marked invalid.
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    /// Applies an editing key. Returns true when the value changed.
    pub fn update(&mut self, key: &KeyMsg) -> bool {
        if !self.focus {
            return false;
        }
        match key.key {
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let changed = !self.value.is_empty();
                self.value.clear();
                changed
            }
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                if self.char_limit > 0 && self.value.chars().count() >= self.char_limit {
                    return false;
                }
                self.value.push(c);
                self.invalid = false;
                true
            }
            KeyCode::Backspace => {
                let changed = self.value.pop().is_some();
                if changed {
                    self.invalid = false;
                }
                changed
            }
            _ => false,
        }
    }

    /// Renders prompt and value, or the placeholder when empty.
    pub fn view(&self) -> String {
        let prompt = if self.invalid {
            self.invalid_style.render(&self.prompt)
        } else {
            self.prompt_style.render(&self.prompt)
        };

        if self.value.is_empty() && !self.placeholder.is_empty() {
            let cursor = if self.focus { "█" } else { "" };
            return format!(
                "{}{}{}",
                prompt,
                cursor,
                self.placeholder_style.render(&self.placeholder)
            );
        }

        let shown = match self.echo_mode {
            EchoMode::Normal => self.value.clone(),
            EchoMode::Password => "•".repeat(self.value.chars().count()),
        };
        let cursor = if self.focus { "█" } else { "" };
        format!("{}{}{}", prompt, shown, cursor)
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
