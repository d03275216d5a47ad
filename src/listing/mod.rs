//! Generic list screen: fetch, filter, paginate and render one entity type.
//!
//! [`ListPage`] is the controller. It owns a [`ViewState`] (the fetched list
//! and what is derived from it), a [`Renderer`] (rows and the visible
//! container) and the [`CommandTable`] of named actions.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──load──▶ Loading ──ok, items──▶ Populated
//!                   │      ok, none ──▶ Empty
//!                   │      failure  ──▶ Errored
//!                   ◀──────refresh──────┘
//! ```
//!
//! Every fetch carries a generation number; a response from an earlier
//! fetch than the latest one is dropped. Filter edits never re-fetch: typing
//! in the search or date input is debounced and then re-derives the filtered
//! list, going back to page 1. Page changes only re-render.

pub mod commands;
mod keys;
mod render;
mod store;

pub use commands::{Arg, CommandTable};
pub use keys::ListingKeyMap;
pub use render::{Containers, DisplayState, Renderer};
pub use store::ViewState;

use crate::api::AdminApi;
use crate::config::Config;
use crate::entity::Entity;
use crate::error::{message_for, AdminError, ErrorKind};
use crate::filter::FilterCriteria;
use crate::input::Model as Input;
use crate::key;
use crate::style::Styles;
use crate::{counter, debounce, spinner, Component};
use bubbletea_rs::{batch, Cmd, KeyMsg, Msg};
use crossterm::event::KeyCode;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Where a list screen is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch returned records. Filtering may still leave none visible.
    Populated,
    /// The last fetch returned no records.
    Empty,
    /// The last fetch failed. Page navigation is ignored until a fetch succeeds.
    Errored,
}

/// Outcome of one fetch, addressed to the page and generation that issued
/// it. The error itself is logged when the fetch fails; only its kind
/// travels back.
pub struct FetchedMsg<E: Entity> {
    page_id: i64,
    generation: u64,
    /// Fetched records, or the kind of failure.
    pub outcome: Result<Vec<E>, ErrorKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Table,
    Search,
    Date,
}

/// A paginated, filterable list screen for one entity type.
///
/// See the module docs for the load cycle.
pub struct ListPage<E: Entity> {
    id: i64,
    api: Arc<dyn AdminApi>,
    title: String,
    phase: Phase,
    generation: u64,
    last_error: Option<ErrorKind>,
    store: ViewState<E>,
    renderer: Renderer<E>,
    commands: CommandTable<E>,
    /// Screen bindings.
    pub keymap: ListingKeyMap,
    focus: Focus,
    search: Input,
    date: Input,
    debounce: debounce::Model,
    spinner: spinner::Model,
    counters: Vec<counter::Model>,
    counter_duration: Duration,
    counter_tick: Duration,
    notice: Option<String>,
    detail: Option<String>,
    show_help: bool,
    styles: Styles,
}

impl<E: Entity> ListPage<E> {
    /// An idle screen. Nothing is fetched until [`ListPage::load`].
    pub fn new(api: Arc<dyn AdminApi>, config: &Config, title: impl Into<String>) -> Self {
        Self {
            id: next_id(),
            api,
            title: title.into(),
            phase: Phase::Idle,
            generation: 0,
            last_error: None,
            store: ViewState::new(config.page_size),
            renderer: Renderer::new(),
            commands: CommandTable::new(),
            keymap: ListingKeyMap::default(),
            focus: Focus::Table,
            search: Input::new()
                .with_prompt("Search: ")
                .with_placeholder("id, name, email…"),
            date: Input::new()
                .with_prompt("Date: ")
                .with_placeholder("YYYY-MM-DD")
                .with_char_limit(10),
            debounce: debounce::Model::new(config.search_debounce()),
            spinner: spinner::Model::new(),
            counters: E::summarize(&[]).iter().map(counter::Model::from_stat).collect(),
            counter_duration: config.counter_duration(),
            counter_tick: config.counter_tick(),
            notice: None,
            detail: None,
            show_help: false,
            styles: Styles::default(),
        }
    }

    /// Load cycle state.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Fetched records with the active filters and page.
    pub fn store(&self) -> &ViewState<E> {
        &self.store
    }

    /// Visible container and table rows.
    pub fn renderer(&self) -> &Renderer<E> {
        &self.renderer
    }

    /// Summary counters above the table.
    pub fn counters(&self) -> &[counter::Model] {
        &self.counters
    }

    /// The search debouncer.
    pub fn debounce(&self) -> &debounce::Model {
        &self.debounce
    }

    /// Transient message, e.g. for an action that is not available.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Detail text of the record being viewed.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Kind of the last fetch failure, cleared on success.
    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    /// True while a filter input has focus and wants every key.
    pub fn is_editing(&self) -> bool {
        self.focus != Focus::Table
    }

    /// Enters Loading and starts the spinner along with the fetch.
    pub fn load(&mut self) -> Cmd {
        let fetch = self.start_fetch();
        batch(vec![fetch, self.spinner.tick()])
    }

    /// Enters Loading and returns the fetch command alone.
    pub fn start_fetch(&mut self) -> Cmd {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.detail = None;
        self.renderer.render_state(DisplayState::Loading);
        debug!(resource = E::PLURAL, generation = self.generation, "fetching");

        let api = Arc::clone(&self.api);
        let page_id = self.id;
        let generation = self.generation;
        Box::pin(async move {
            let outcome = E::fetch(api).await.map_err(|err| {
                error!(resource = E::PLURAL, error = %err, "failed to load list");
                err.kind()
            });
            Some(Box::new(FetchedMsg {
                page_id,
                generation,
                outcome,
            }) as Msg)
        })
    }

    /// Runs a named action from the command table.
    pub fn dispatch(&mut self, name: &str, arg: Arg) -> Option<Cmd> {
        match self.commands.get(name) {
            Some(handler) => handler(self, arg),
            None => {
                debug!(action = name, "unknown list action");
                None
            }
        }
    }

    /// Names accepted by [`ListPage::dispatch`].
    pub fn command_names(&self) -> Vec<&'static str> {
        self.commands.names()
    }

    /// Handles fetch results, timer messages and keys. Messages addressed to
    /// another screen, or to a superseded fetch, are ignored.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(fetched) = msg.downcast_ref::<FetchedMsg<E>>() {
            return self.on_fetched(fetched);
        }

        if self.debounce.update(msg) {
            self.apply_inputs();
            return None;
        }

        if msg.downcast_ref::<spinner::TickMsg>().is_some() {
            let cmd = self.spinner.update(msg);
            return cmd.filter(|_| self.phase == Phase::Loading);
        }

        if msg.downcast_ref::<counter::FrameMsg>().is_some() {
            return self.counters.iter_mut().find_map(|c| c.update(msg));
        }

        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key);
        }

        None
    }

    fn on_fetched(&mut self, msg: &FetchedMsg<E>) -> Option<Cmd> {
        if msg.page_id != self.id {
            return None;
        }
        if msg.generation != self.generation {
            debug!(
                resource = E::PLURAL,
                stale = msg.generation,
                latest = self.generation,
                "dropping stale fetch result"
            );
            return None;
        }

        match &msg.outcome {
            Err(kind) => {
                self.phase = Phase::Errored;
                self.last_error = Some(*kind);
                self.renderer
                    .render_state(DisplayState::Error(message_for(*kind).to_string()));
                None
            }
            Ok(list) if list.is_empty() => {
                self.phase = Phase::Empty;
                self.last_error = None;
                self.store.replace_full(Vec::new());
                self.renderer.render(&[]);
                self.counters = E::summarize(&[]).iter().map(counter::Model::from_stat).collect();
                self.renderer.empty_text = format!("No {} found.", E::PLURAL);
                self.renderer.render_state(DisplayState::Empty);
                None
            }
            Ok(list) => {
                self.phase = Phase::Populated;
                self.last_error = None;
                self.store.replace_full(list.clone());
                info!(resource = E::PLURAL, count = list.len(), "list loaded");
                let cmd = self.animate_counters();
                self.refresh_view();
                cmd
            }
        }
    }

    fn animate_counters(&mut self) -> Option<Cmd> {
        let stats = E::summarize(self.store.full());
        let (duration, tick) = (self.counter_duration, self.counter_tick);
        let mut cmds = Vec::with_capacity(stats.len());
        self.counters = stats
            .iter()
            .map(|stat| {
                let mut counter = counter::Model::from_stat(stat);
                cmds.push(counter.animate_to(stat.value, duration, tick));
                counter
            })
            .collect();
        (!cmds.is_empty()).then(|| batch(cmds))
    }

    /// Re-renders the current page and picks the table or the empty state.
    fn refresh_view(&mut self) {
        if self.phase != Phase::Populated {
            return;
        }
        self.renderer.render(self.store.current_page());
        if self.store.filtered().is_empty() {
            self.renderer.empty_text = format!("No {} match the current filters.", E::PLURAL);
            self.renderer.render_state(DisplayState::Empty);
        } else {
            self.renderer.render_state(DisplayState::Data);
        }
    }

    fn apply_inputs(&mut self) {
        let criteria = FilterCriteria {
            search: self.search.value().to_string(),
            category: self.store.criteria().category,
            date_bucket: self.date.value().to_string(),
        };
        self.apply_criteria(criteria);
    }

    fn apply_criteria(&mut self, criteria: FilterCriteria<E::Category>) {
        if self.store.set_criteria(criteria) {
            debug!(
                resource = E::PLURAL,
                matches = self.store.filtered().len(),
                "filter applied"
            );
            self.renderer.table_mut().set_cursor(0);
            self.refresh_view();
        }
    }

    fn clear_filters(&mut self) {
        self.debounce.cancel();
        self.search.reset();
        self.date.reset();
        self.apply_criteria(FilterCriteria::default());
    }

    pub(crate) fn show_detail(&mut self, id: u64) {
        self.detail = match self.store.find(id) {
            Some(entity) => Some(entity.detail()),
            None => {
                self.notice = Some(format!("#{} is not in the list.", id));
                None
            }
        };
    }

    pub(crate) fn not_implemented(&mut self, action: &str, id: u64) {
        let err = AdminError::NotImplemented {
            action: format!("{} {} #{}", action.to_lowercase(), E::PLURAL, id),
        };
        info!(error = %err, "stubbed action requested");
        self.notice = Some(format!("{} #{}: {}", action, id, err.user_message()));
    }

    pub(crate) fn change_page(&mut self, page: usize) {
        if self.phase != Phase::Populated {
            debug!(requested = page, phase = ?self.phase, "page change ignored, no table shown");
            return;
        }
        if self.store.go_to(page) {
            self.renderer.table_mut().set_cursor(0);
            self.refresh_view();
        } else {
            debug!(
                requested = page,
                total = self.store.total_pages(),
                "page out of range"
            );
        }
    }

    fn selected_id(&self) -> Option<u64> {
        if *self.renderer.state() != DisplayState::Data {
            return None;
        }
        self.store
            .current_page()
            .get(self.renderer.table().cursor())
            .map(Entity::id)
    }

    fn active_input(&mut self) -> Option<&mut Input> {
        match self.focus {
            Focus::Table => None,
            Focus::Search => Some(&mut self.search),
            Focus::Date => Some(&mut self.date),
        }
    }

    fn focus_input(&mut self, focus: Focus) {
        self.search.blur();
        self.date.blur();
        self.focus = focus;
        if let Some(input) = self.active_input() {
            let _ = input.focus();
        }
    }

    fn handle_input_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        if self.keymap.accept.matches(key) {
            self.debounce.cancel();
            self.apply_inputs();
            self.focus_input(Focus::Table);
            return None;
        }
        if self.keymap.clear.matches(key) {
            self.focus_input(Focus::Table);
            return None;
        }
        if self.keymap.switch_input.matches(key) {
            let next = if self.focus == Focus::Search {
                Focus::Date
            } else {
                Focus::Search
            };
            self.focus_input(next);
            return None;
        }

        let changed = self.active_input().is_some_and(|input| input.update(key));
        changed.then(|| self.debounce.trigger())
    }

    fn handle_key(&mut self, key: &KeyMsg) -> Option<Cmd> {
        if self.is_editing() {
            return self.handle_input_key(key);
        }

        self.notice = None;
        if self.detail.is_some() && (self.keymap.clear.matches(key) || self.keymap.view.matches(key)) {
            self.detail = None;
            return None;
        }

        if self.keymap.cursor_up.matches(key) {
            self.renderer.table_mut().select_prev();
        } else if self.keymap.cursor_down.matches(key) {
            self.renderer.table_mut().select_next();
        } else if self.keymap.next_page.matches(key) {
            return self.dispatch(commands::PAGE, Arg::Page(self.store.page() + 1));
        } else if self.keymap.prev_page.matches(key) {
            return self.dispatch(commands::PAGE, Arg::Page(self.store.page().saturating_sub(1)));
        } else if let KeyCode::Char(c @ '1'..='9') = key.key {
            let page = c.to_digit(10).map_or(0, |d| d as usize);
            return self.dispatch(commands::PAGE, Arg::Page(page));
        } else if self.keymap.search.matches(key) {
            self.focus_input(Focus::Search);
        } else if self.keymap.date.matches(key) {
            self.focus_input(Focus::Date);
        } else if self.keymap.category.matches(key) {
            let mut criteria = self.store.criteria().clone();
            criteria.cycle_category(E::categories());
            self.apply_criteria(criteria);
        } else if self.keymap.clear.matches(key) {
            self.clear_filters();
        } else if self.keymap.view.matches(key) {
            let id = self.selected_id()?;
            return self.dispatch(commands::VIEW, Arg::Id(id));
        } else if self.keymap.edit.matches(key) {
            let id = self.selected_id()?;
            return self.dispatch(commands::EDIT, Arg::Id(id));
        } else if self.keymap.delete.matches(key) {
            let id = self.selected_id()?;
            return self.dispatch(commands::DELETE, Arg::Id(id));
        } else if self.keymap.refresh.matches(key) {
            return self.dispatch(commands::REFRESH, Arg::None);
        } else if self.keymap.help.matches(key) {
            self.show_help = !self.show_help;
        }
        None
    }

    fn view_filters(&self) -> String {
        let category = self
            .store
            .criteria()
            .category
            .map_or_else(|| "all".to_string(), |c| c.to_string());
        format!(
            "{}   {}   {}",
            self.search.view(),
            self.date.view(),
            self.styles.subtitle.render(&format!("Category: {}", category))
        )
    }

    fn view_footer(&self) -> String {
        match self.phase {
            Phase::Populated | Phase::Empty => self.styles.muted.render(&format!(
                "Page {} · {} of {} {}",
                self.store.pager().view(),
                self.store.filtered().len(),
                self.store.full().len(),
                E::PLURAL
            )),
            _ => String::new(),
        }
    }

    /// Renders the screen.
    pub fn view(&self) -> String {
        let mut out = vec![self.styles.title.render(&self.title)];

        let counters: Vec<String> = self.counters.iter().map(counter::Model::view).collect();
        out.push(counters.join("    "));
        out.push(self.view_filters());
        out.push(String::new());
        out.push(self.renderer.view(&self.spinner.view()));
        out.push(self.view_footer());

        if let Some(detail) = &self.detail {
            out.push(self.styles.subtitle.render(detail));
        }
        if let Some(notice) = &self.notice {
            out.push(self.styles.notice.render(notice));
        }
        if self.show_help || self.is_editing() {
            out.push(match self.focus {
                Focus::Table => key::short_help_view(&self.keymap),
                _ => key::short_help_view(&keys::InputHelp(&self.keymap)),
            });
        }
        out.join("\n")
    }
}
