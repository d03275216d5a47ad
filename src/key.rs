//! Type-safe key bindings shared by every screen.
//!
//! A [`Binding`] groups the key presses that trigger one action together with
//! the short help text shown in the footer. Screens collect their bindings in
//! a keymap struct and implement [`KeyMap`] so the footer can be rendered
//! uniformly with [`short_help_view`].
//!
//! ```rust
//! use admin_panel::key::{Binding, KeyPress};
//! use bubbletea_rs::KeyMsg;
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let refresh = Binding::new(vec![KeyCode::Char('r')]).with_help("r", "refresh");
//! let quit = Binding::new(vec![KeyPress::from((KeyCode::Char('c'), KeyModifiers::CONTROL))]);
//!
//! let msg = KeyMsg { key: KeyCode::Char('r'), modifiers: KeyModifiers::NONE };
//! assert!(refresh.matches(&msg));
//! assert!(!quit.matches(&msg));
//! ```

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};
use lipgloss_extras::prelude::*;

/// A single key press: a key code plus the modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifiers that must be held for the press to match.
    pub mods: KeyModifiers,
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::NONE,
        }
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, mods): (KeyCode, KeyModifiers)) -> Self {
        Self { code, mods }
    }
}

/// Help text attached to a binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Human readable key label, e.g. `"←/h"`.
    pub key: String,
    /// What the binding does, e.g. `"prev page"`.
    pub desc: String,
}

/// A set of key presses bound to one action.
#[derive(Debug, Clone)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    enabled: bool,
}

impl Binding {
    /// Creates a binding from anything convertible to [`KeyPress`].
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            help: Help::default(),
            enabled: true,
        }
    }

    /// Sets the footer help text (builder pattern).
    pub fn with_help(mut self, key: &str, desc: &str) -> Self {
        self.help = Help {
            key: key.to_string(),
            desc: desc.to_string(),
        };
        self
    }

    /// Enables or disables the binding. Disabled bindings never match and are
    /// left out of the help footer.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns whether the binding is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled && !self.keys.is_empty()
    }

    /// The help text of this binding.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// The key presses of this binding.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// Returns true when `msg` is one of this binding's key presses.
    ///
    /// Shift is ignored for character keys because terminals already report
    /// the shifted character (`G`, `?`).
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        if !self.enabled() {
            return false;
        }
        self.keys.iter().any(|press| {
            if press.code != msg.key {
                return false;
            }
            let held = if matches!(msg.key, KeyCode::Char(_)) {
                msg.modifiers.difference(KeyModifiers::SHIFT)
            } else {
                msg.modifiers
            };
            held == press.mods
        })
    }
}

/// Implemented by keymap structs to expose their bindings to the footer.
pub trait KeyMap {
    /// Bindings shown in the single-line footer.
    fn short_help(&self) -> Vec<&Binding>;
}

/// Renders the single-line help footer for `keymap`.
pub fn short_help_view<K: KeyMap + ?Sized>(keymap: &K) -> String {
    let key_style = Style::new().foreground(Color::from("#909090"));
    let desc_style = Style::new().foreground(Color::from("#5C5C5C"));

    keymap
        .short_help()
        .into_iter()
        .filter(|b| b.enabled() && !b.help().key.is_empty())
        .map(|b| {
            format!(
                "{} {}",
                key_style.render(&b.help().key),
                desc_style.render(&b.help().desc)
            )
        })
        .collect::<Vec<_>>()
        .join(" • ")
}
