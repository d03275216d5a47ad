//! Key bindings of the list screens.

use crate::key::{self, Binding, KeyPress};
use crossterm::event::{KeyCode, KeyModifiers};

/// Key bindings of a list screen.
#[derive(Debug, Clone)]
pub struct ListingKeyMap {
    /// Move the selection up.
    pub cursor_up: Binding,
    /// Move the selection down.
    pub cursor_down: Binding,
    /// Next page.
    pub next_page: Binding,
    /// Previous page.
    pub prev_page: Binding,
    /// Focus the search input.
    pub search: Binding,
    /// Focus the date input.
    pub date: Binding,
    /// Cycle the category filter.
    pub category: Binding,
    /// Leaves an input, or clears all filters when no input is focused.
    pub clear: Binding,
    /// Apply the focused input at once.
    pub accept: Binding,
    /// Move between the search and date inputs.
    pub switch_input: Binding,
    /// Show the selected record.
    pub view: Binding,
    /// Edit the selected record.
    pub edit: Binding,
    /// Delete the selected record.
    pub delete: Binding,
    /// Fetch again.
    pub refresh: Binding,
    /// Toggle the full help.
    pub help: Binding,
}

impl Default for ListingKeyMap {
    fn default() -> Self {
        Self {
            cursor_up: Binding::new(vec![KeyCode::Up, KeyCode::Char('k')]).with_help("↑/k", "up"),
            cursor_down: Binding::new(vec![KeyCode::Down, KeyCode::Char('j')])
                .with_help("↓/j", "down"),
            next_page: Binding::new(vec![KeyCode::Right, KeyCode::PageDown])
                .with_help("→", "next page"),
            prev_page: Binding::new(vec![KeyCode::Left, KeyCode::PageUp])
                .with_help("←", "prev page"),
            search: Binding::new(vec![KeyCode::Char('/')]).with_help("/", "search"),
            date: Binding::new(vec![KeyCode::Char('t')]).with_help("t", "date"),
            category: Binding::new(vec![KeyCode::Char('c')]).with_help("c", "category"),
            clear: Binding::new(vec![KeyCode::Esc]).with_help("esc", "clear filters"),
            accept: Binding::new(vec![KeyCode::Enter]).with_help("enter", "done"),
            switch_input: Binding::new(vec![KeyCode::Tab]).with_help("tab", "next field"),
            view: Binding::new(vec![KeyCode::Enter]).with_help("enter", "view"),
            edit: Binding::new(vec![KeyCode::Char('e')]).with_help("e", "edit"),
            delete: Binding::new(vec![KeyCode::Char('x'), KeyCode::Delete])
                .with_help("x", "delete"),
            refresh: Binding::new(vec![
                KeyPress::from(KeyCode::Char('r')),
                KeyPress::from((KeyCode::Char('r'), KeyModifiers::CONTROL)),
            ])
            .with_help("r", "refresh"),
            help: Binding::new(vec![KeyCode::Char('?')]).with_help("?", "help"),
        }
    }
}

impl key::KeyMap for ListingKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.cursor_up,
            &self.cursor_down,
            &self.prev_page,
            &self.next_page,
            &self.search,
            &self.category,
            &self.date,
            &self.clear,
            &self.view,
            &self.edit,
            &self.delete,
            &self.refresh,
        ]
    }
}

/// Bindings shown while a filter input has focus.
pub(super) struct InputHelp<'a>(pub &'a ListingKeyMap);

impl key::KeyMap for InputHelp<'_> {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.0.accept, &self.0.switch_input, &self.0.clear]
    }
}
