//! Turns a page of entities into table rows and decides which of the four
//! view containers is shown.

use crate::entity::Entity;
use crate::style::Styles;
use crate::table;
use std::marker::PhantomData;

/// What the list area currently displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    /// Spinner.
    Loading,
    /// Nothing to show.
    Empty,
    /// A failure, as plain text.
    Error(String),
    /// The table.
    Data,
}

/// Visibility of the list containers. Built only through
/// [`Containers::showing`], so exactly one flag is ever set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Containers {
    /// Spinner container.
    pub loading: bool,
    /// Table container.
    pub table: bool,
    /// Empty-state container.
    pub empty: bool,
    /// Error container.
    pub error: bool,
}

impl Containers {
    /// The containers for `state`: exactly one is visible.
    pub fn showing(state: &DisplayState) -> Self {
        let hidden = Self {
            loading: false,
            table: false,
            empty: false,
            error: false,
        };
        match state {
            DisplayState::Loading => Self {
                loading: true,
                ..hidden
            },
            DisplayState::Empty => Self {
                empty: true,
                ..hidden
            },
            DisplayState::Error(_) => Self {
                error: true,
                ..hidden
            },
            DisplayState::Data => Self {
                table: true,
                ..hidden
            },
        }
    }

    /// How many containers are visible. Always one.
    pub fn visible_count(&self) -> usize {
        [self.loading, self.table, self.empty, self.error]
            .iter()
            .filter(|v| **v)
            .count()
    }
}

/// Renders a page of records and the list containers.
#[derive(Debug, Clone)]
pub struct Renderer<E: Entity> {
    state: DisplayState,
    containers: Containers,
    table: table::Model,
    /// Text of the empty container.
    pub empty_text: String,
    styles: Styles,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for Renderer<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Renderer<E> {
    /// A renderer showing the loading state.
    pub fn new() -> Self {
        let state = DisplayState::Loading;
        Self {
            containers: Containers::showing(&state),
            state,
            table: table::Model::new(E::columns()),
            empty_text: format!("No {} found.", E::PLURAL),
            styles: Styles::default(),
            _entity: PhantomData,
        }
    }

    /// Current display state.
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Current container visibility.
    pub fn containers(&self) -> Containers {
        self.containers
    }

    /// The table.
    pub fn table(&self) -> &table::Model {
        &self.table
    }

    /// The table, mutably.
    pub fn table_mut(&mut self) -> &mut table::Model {
        &mut self.table
    }

    /// One row per entity, in slice order.
    pub fn render(&mut self, page: &[E]) {
        self.table.set_rows(page.iter().map(Entity::row).collect());
    }

    /// Switches the visible container. Error text is shown as plain text:
    /// escape sequences and control characters other than newline and tab
    /// are removed.
    pub fn render_state(&mut self, state: DisplayState) {
        let state = match state {
            DisplayState::Error(message) => DisplayState::Error(plain_text(&message)),
            other => other,
        };
        self.containers = Containers::showing(&state);
        self.state = state;
    }

    /// Draws whichever container is visible. `loading` is the spinner frame.
    pub fn view(&self, loading: &str) -> String {
        match &self.state {
            DisplayState::Loading => format!("{} Loading {}…", loading, E::PLURAL),
            DisplayState::Empty => self.styles.muted.render(&self.empty_text),
            DisplayState::Error(message) => self.styles.error.render(message),
            DisplayState::Data => self.table.view(),
        }
    }
}

// The escape stripper keeps line feeds but drops tabs, so tabs are split
// out around it.
fn plain_text(message: &str) -> String {
    message
        .split('\t')
        .map(|part| {
            strip_ansi_escapes::strip_str(part)
                .chars()
                .filter(|c| !c.is_control() || *c == '\n')
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Role, User};

    fn user(id: u64, name: &str) -> User {
        User {
            id,
            username: name.to_string(),
            email: None,
            role: Some(Role::User),
            created_at: None,
        }
    }

    #[test]
    fn test_exactly_one_container_visible() {
        let mut r: Renderer<User> = Renderer::new();
        for state in [
            DisplayState::Loading,
            DisplayState::Empty,
            DisplayState::Error("boom".into()),
            DisplayState::Data,
        ] {
            r.render_state(state);
            assert_eq!(r.containers().visible_count(), 1);
        }
    }

    #[test]
    fn test_error_container() {
        let mut r: Renderer<User> = Renderer::new();
        r.render_state(DisplayState::Error("failed".into()));
        let c = r.containers();
        assert!(c.error && !c.table && !c.loading && !c.empty);
    }

    #[test]
    fn test_error_message_is_plain_text() {
        let mut r: Renderer<User> = Renderer::new();
        r.render_state(DisplayState::Error("\x1b[31mred\x1b[0m text\x07\x08".into()));
        assert_eq!(r.state(), &DisplayState::Error("red text".into()));
    }

    #[test]
    fn test_error_message_keeps_line_breaks_and_tabs() {
        let mut r: Renderer<User> = Renderer::new();
        r.render_state(DisplayState::Error("line one\nline\ttwo\x1b[1m\r".into()));
        assert_eq!(
            r.state(),
            &DisplayState::Error("line one\nline\ttwo".into())
        );
    }

    #[test]
    fn test_rows_follow_slice_order() {
        let mut r: Renderer<User> = Renderer::new();
        r.render(&[user(2, "bob"), user(1, "ana")]);
        let rows = r.table().rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cells[1], "bob");
        assert_eq!(rows[1].cells[1], "ana");
    }
}
