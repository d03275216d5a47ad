//! Page arithmetic and the pagination indicator.
//!
//! Pages are 1-indexed. A list always has at least one page, so an empty
//! list renders as page `1/1` with an empty slice and the caller falls
//! through to its empty state.
//!
//! Requests for a page outside `1..=total_pages` are rejected rather than
//! clamped: [`paginate`] returns `None` and [`Model::go_to`] leaves the
//! current page untouched.

use crate::key::{self, KeyMap as KeyMapTrait};
use bubbletea_rs::{KeyMsg, Msg};
use crossterm::event::KeyCode;

/// Number of pages needed for `len` items, never less than one.
pub fn total_pages(len: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    if len == 0 {
        1
    } else {
        len.div_ceil(per_page)
    }
}

/// Returns the items of `page` together with the total page count, or `None`
/// when `page` is out of range.
///
/// ```rust
/// use admin_panel::paginator::paginate;
///
/// let items: Vec<u32> = (1..=25).collect();
/// let (slice, pages) = paginate(&items, 3, 10).unwrap();
/// assert_eq!(pages, 3);
/// assert_eq!(slice, &[21, 22, 23, 24, 25]);
/// assert!(paginate(&items, 4, 10).is_none());
/// ```
pub fn paginate<T>(list: &[T], page: usize, per_page: usize) -> Option<(&[T], usize)> {
    let per_page = per_page.max(1);
    let pages = total_pages(list.len(), per_page);
    if page < 1 || page > pages {
        return None;
    }
    let start = ((page - 1) * per_page).min(list.len());
    let end = (start + per_page).min(list.len());
    Some((&list[start..end], pages))
}

/// How the indicator is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Type {
    /// `2/5`
    #[default]
    Arabic,
    /// `○ • ○ ○ ○`
    Dots,
}

/// Key bindings for page navigation.
#[derive(Debug, Clone)]
pub struct PaginatorKeyMap {
    /// Previous page. Default keys: PageUp, Left Arrow, 'h'
    pub prev_page: key::Binding,
    /// Next page. Default keys: PageDown, Right Arrow, 'l'
    pub next_page: key::Binding,
}

impl Default for PaginatorKeyMap {
    fn default() -> Self {
        Self {
            prev_page: key::Binding::new(vec![KeyCode::PageUp, KeyCode::Left, KeyCode::Char('h')])
                .with_help("←/h", "prev page"),
            next_page: key::Binding::new(vec![
                KeyCode::PageDown,
                KeyCode::Right,
                KeyCode::Char('l'),
            ])
            .with_help("→/l", "next page"),
        }
    }
}

impl KeyMapTrait for PaginatorKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.prev_page, &self.next_page]
    }
}

/// Current page state of a paginated list.
#[derive(Debug, Clone)]
pub struct Model {
    /// How [`Model::view`] draws the position.
    pub paginator_type: Type,
    page: usize,
    per_page: usize,
    total_pages: usize,
    /// Dot for the current page.
    pub active_dot: String,
    /// Dot for the other pages.
    pub inactive_dot: String,
    /// Prev/next bindings.
    pub keymap: PaginatorKeyMap,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            paginator_type: Type::default(),
            page: 1,
            per_page: 10,
            total_pages: 1,
            active_dot: "•".to_string(),
            inactive_dot: "○".to_string(),
            keymap: PaginatorKeyMap::default(),
        }
    }
}

impl Model {
    /// Page 1 of 1, ten items per page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size; values below one are raised to one.
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Sets the item count. See [`Model::set_total_items`].
    pub fn with_total_items(mut self, items: usize) -> Self {
        self.set_total_items(items);
        self
    }

    /// Sets the display type.
    pub fn with_type(mut self, paginator_type: Type) -> Self {
        self.paginator_type = paginator_type;
        self
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Items per page.
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Page count, never below one.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Recomputes the page count. The current page is clamped to the new last
    /// page so it always stays valid.
    pub fn set_total_items(&mut self, items: usize) {
        self.total_pages = total_pages(items, self.per_page);
        if self.page > self.total_pages {
            self.page = self.total_pages;
        }
    }

    /// Moves to `page` if it exists. Returns false, leaving the current page
    /// unchanged, when it does not.
    pub fn go_to(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages {
            return false;
        }
        self.page = page;
        true
    }

    /// Returns to page 1.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    /// Goes back one page. False on page 1.
    pub fn prev_page(&mut self) -> bool {
        self.go_to(self.page.saturating_sub(1))
    }

    /// Advances one page. False on the last page.
    pub fn next_page(&mut self) -> bool {
        self.go_to(self.page + 1)
    }

    /// True on page 1.
    pub fn on_first_page(&self) -> bool {
        self.page == 1
    }

    /// True on the last page.
    pub fn on_last_page(&self) -> bool {
        self.page == self.total_pages
    }

    /// Start (inclusive) and end (exclusive) indices of the current page in a
    /// list of `length` items.
    pub fn slice_bounds(&self, length: usize) -> (usize, usize) {
        let start = ((self.page - 1) * self.per_page).min(length);
        let end = (start + self.per_page).min(length);
        (start, end)
    }

    /// Handles prev/next key presses. Returns true when the page changed.
    pub fn update(&mut self, msg: &Msg) -> bool {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.keymap.next_page.matches(key_msg) {
                return self.next_page();
            } else if self.keymap.prev_page.matches(key_msg) {
                return self.prev_page();
            }
        }
        false
    }

    /// Renders the position, e.g. `2/5` for [`Type::Arabic`] or `○•○○○` for
    /// [`Type::Dots`].
    pub fn view(&self) -> String {
        match self.paginator_type {
            Type::Arabic => format!("{}/{}", self.page, self.total_pages),
            Type::Dots => (1..=self.total_pages)
                .map(|i| {
                    if i == self.page {
                        self.active_dot.as_str()
                    } else {
                        self.inactive_dot.as_str()
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}
