//! Named actions of a list screen.
//!
//! The table is built once per screen; key handling and any other caller go
//! through [`ListPage::dispatch`](super::ListPage::dispatch) by name instead
//! of calling screen methods directly.

use super::ListPage;
use crate::entity::Entity;
use bubbletea_rs::Cmd;
use std::collections::HashMap;

/// Show the detail of one record.
pub const VIEW: &str = "view";
/// Edit one record.
pub const EDIT: &str = "edit";
/// Delete one record.
pub const DELETE: &str = "delete";
/// Jump to a 1-based page.
pub const PAGE: &str = "page";
/// Fetch the list again.
pub const REFRESH: &str = "refresh";

/// Argument passed to a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg {
    /// No argument.
    None,
    /// A record id.
    Id(u64),
    /// A 1-based page number.
    Page(usize),
}

/// An action. Returns a follow-up command, if any.
pub type Handler<E> = fn(&mut ListPage<E>, Arg) -> Option<Cmd>;

/// Actions of a list screen, by name.
pub struct CommandTable<E: Entity> {
    handlers: HashMap<&'static str, Handler<E>>,
}

impl<E: Entity> Default for CommandTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> CommandTable<E> {
    /// A table with every built-in action registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Handler<E>> = HashMap::new();
        handlers.insert(VIEW, view::<E>);
        handlers.insert(EDIT, edit::<E>);
        handlers.insert(DELETE, delete::<E>);
        handlers.insert(PAGE, page::<E>);
        handlers.insert(REFRESH, refresh::<E>);
        Self { handlers }
    }

    /// Looks up an action.
    pub fn get(&self, name: &str) -> Option<Handler<E>> {
        self.handlers.get(name).copied()
    }

    /// Registered action names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

fn view<E: Entity>(list: &mut ListPage<E>, arg: Arg) -> Option<Cmd> {
    if let Arg::Id(id) = arg {
        list.show_detail(id);
    }
    None
}

fn edit<E: Entity>(list: &mut ListPage<E>, arg: Arg) -> Option<Cmd> {
    if let Arg::Id(id) = arg {
        list.not_implemented("Edit", id);
    }
    None
}

fn delete<E: Entity>(list: &mut ListPage<E>, arg: Arg) -> Option<Cmd> {
    if let Arg::Id(id) = arg {
        list.not_implemented("Delete", id);
    }
    None
}

fn page<E: Entity>(list: &mut ListPage<E>, arg: Arg) -> Option<Cmd> {
    if let Arg::Page(n) = arg {
        list.change_page(n);
    }
    None
}

fn refresh<E: Entity>(list: &mut ListPage<E>, _arg: Arg) -> Option<Cmd> {
    Some(list.load())
}
