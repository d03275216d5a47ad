#![warn(missing_docs)]

//! # admin-panel
//!
//! A terminal admin console for the cinema booking backend, built on
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs). It signs an
//! administrator in, shows a dashboard of totals and lists users and
//! payments with search, filters and pagination.
//!
//! ## Overview
//!
//! Every screen follows the Elm Architecture: state lives in a model,
//! `update()` reacts to messages (keys, timer ticks, fetch results) and may
//! return a command, `view()` renders the state to a string. Network calls
//! run inside commands and come back as messages, so all state changes
//! happen on the update loop.
//!
//! ## Screens
//!
//! | Screen | Module | Route |
//! |--------|--------|-------|
//! | Sign in | [`login`] | `/admin/login` |
//! | Dashboard | [`dashboard`] | `/admin` |
//! | Users | [`listing`] over [`entity::User`] | `/admin/users` |
//! | Payments | [`listing`] over [`entity::Payment`] | `/admin/payments` |
//!
//! ## The list pipeline
//!
//! Users and payments share one generic screen, [`listing::ListPage`]:
//!
//! ```text
//! fetch ─▶ full list ─▶ filter::apply(criteria) ─▶ filtered ─▶ paginate ─▶ rows
//! ```
//!
//! ```rust
//! use admin_panel::entity::{Role, User};
//! use admin_panel::filter::{apply, FilterCriteria};
//! use admin_panel::paginator::paginate;
//!
//! let users = vec![
//!     User { id: 1, username: "ana".into(), email: None, role: Some(Role::Admin), created_at: None },
//!     User { id: 2, username: "bob".into(), email: None, role: Some(Role::User), created_at: None },
//! ];
//! let criteria = FilterCriteria { search: "ana".into(), ..Default::default() };
//! let filtered = apply(&users, &criteria);
//! let (page, pages) = paginate(&filtered, 1, 10).unwrap();
//! assert_eq!(pages, 1);
//! assert_eq!(page[0].username, "ana");
//! ```
//!
//! ## Components
//!
//! The screens are assembled from small widgets: [`table`], [`paginator`],
//! [`spinner`], [`counter`] (animated summary figures), [`debounce`] and
//! [`input`], with key bindings from [`key`].

pub mod api;
pub mod app;
pub mod config;
pub mod counter;
pub mod dashboard;
pub mod debounce;
pub mod entity;
pub mod error;
pub mod filter;
pub mod input;
pub mod key;
pub mod listing;
pub mod logging;
pub mod login;
pub mod paginator;
pub mod session;
pub mod spinner;
pub mod style;
pub mod table;

use bubbletea_rs::Cmd;

/// Components that take keyboard focus.
///
/// Only a focused component reacts to editing keys; screens move focus
/// between their inputs by blurring one and focusing the next.
///
/// ```rust
/// use admin_panel::prelude::*;
///
/// let mut input = TextInput::new();
/// assert!(!input.focused());
/// let _ = input.focus();
/// assert!(input.focused());
/// input.blur();
/// assert!(!input.focused());
/// ```
pub trait Component {
    /// Gives the component focus. May return a command to start with.
    fn focus(&mut self) -> Option<Cmd>;

    /// Removes focus.
    fn blur(&mut self);

    /// Whether the component currently has focus.
    fn focused(&self) -> bool;
}

pub use app::{App, AppContext};
pub use error::{AdminError, ErrorKind, Result};
pub use input::Model as TextInput;
pub use key::{Binding, KeyMap, KeyPress};
pub use listing::ListPage;
pub use paginator::Model as Paginator;
pub use spinner::Model as Spinner;
pub use table::Model as Table;

/// Common imports for building on the console's widgets.
pub mod prelude {
    pub use crate::api::AdminApi;
    pub use crate::entity::{Entity, Payment, User};
    pub use crate::filter::FilterCriteria;
    pub use crate::listing::{DisplayState, ListPage, Phase};
    pub use crate::{
        AdminError, Binding, Component, ErrorKind, KeyMap, Paginator, Spinner, Table, TextInput,
    };
}
