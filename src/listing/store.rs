//! Per-page view state: the fetched list and everything derived from it.

use crate::entity::Entity;
use crate::filter::{self, FilterCriteria};
use crate::paginator;

/// The full list, the filtered subsequence, the active criteria and the
/// page cursor of one list screen.
///
/// The filtered list is recomputed synchronously whenever the full list or
/// the criteria change, so it is always an order-preserving subsequence of
/// the full list and the current page is always within range.
#[derive(Debug, Clone)]
pub struct ViewState<E: Entity> {
    full: Vec<E>,
    filtered: Vec<E>,
    criteria: FilterCriteria<E::Category>,
    pager: paginator::Model,
}

impl<E: Entity> ViewState<E> {
    /// An empty list paged by `page_size`.
    pub fn new(page_size: usize) -> Self {
        Self {
            full: Vec::new(),
            filtered: Vec::new(),
            criteria: FilterCriteria::default(),
            pager: paginator::Model::new().with_per_page(page_size),
        }
    }

    /// Everything the last fetch returned.
    pub fn full(&self) -> &[E] {
        &self.full
    }

    /// The records passing the current criteria.
    pub fn filtered(&self) -> &[E] {
        &self.filtered
    }

    /// The current criteria.
    pub fn criteria(&self) -> &FilterCriteria<E::Category> {
        &self.criteria
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.pager.page()
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.pager.per_page()
    }

    /// Pages of filtered records, at least one.
    pub fn total_pages(&self) -> usize {
        self.pager.total_pages()
    }

    /// The underlying paginator.
    pub fn pager(&self) -> &paginator::Model {
        &self.pager
    }

    /// Replaces the full list after a fetch. The criteria are kept and the
    /// current page is preserved, clamped if the list got shorter.
    pub fn replace_full(&mut self, list: Vec<E>) {
        self.full = list;
        self.refilter();
    }

    /// Applies new criteria and returns to page 1. Returns false, touching
    /// nothing, when the criteria are unchanged.
    pub fn set_criteria(&mut self, criteria: FilterCriteria<E::Category>) -> bool {
        if criteria == self.criteria {
            return false;
        }
        self.criteria = criteria;
        self.refilter();
        self.pager.reset();
        true
    }

    fn refilter(&mut self) {
        self.filtered = filter::apply(&self.full, &self.criteria);
        self.pager.set_total_items(self.filtered.len());
    }

    /// Moves to `page`. Out-of-range requests leave the page unchanged and
    /// return false.
    pub fn go_to(&mut self, page: usize) -> bool {
        self.pager.go_to(page)
    }

    /// Advances one page. False on the last page.
    pub fn next_page(&mut self) -> bool {
        self.pager.next_page()
    }

    /// Goes back one page. False on the first page.
    pub fn prev_page(&mut self) -> bool {
        self.pager.prev_page()
    }

    /// The entities shown on the current page.
    pub fn current_page(&self) -> &[E] {
        paginator::paginate(&self.filtered, self.pager.page(), self.pager.per_page())
            .map(|(slice, _)| slice)
            .unwrap_or(&[])
    }

    /// A record by id, filtered or not.
    pub fn find(&self, id: u64) -> Option<&E> {
        self.full.iter().find(|e| e.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Payment, PaymentStatus};

    fn payments(n: u64) -> Vec<Payment> {
        (1..=n)
            .map(|id| Payment {
                id,
                user_id: Some(id % 4),
                booking_id: Some(100 + id),
                amount: 10.0,
                status: Some(if id % 2 == 0 {
                    PaymentStatus::Completed
                } else {
                    PaymentStatus::Pending
                }),
                payment_method: None,
                created_at: Some(format!("2024-0{}-01T00:00:00Z", 1 + id % 3)),
            })
            .collect()
    }

    #[test]
    fn test_twenty_five_payments_three_pages() {
        let mut state = ViewState::new(10);
        state.replace_full(payments(25));
        assert_eq!(state.total_pages(), 3);
        assert_eq!(state.current_page().len(), 10);
        assert!(state.go_to(3));
        assert_eq!(state.current_page().len(), 5);
        assert!(!state.go_to(4));
        assert_eq!(state.page(), 3);
        assert!(!state.go_to(0));
        assert_eq!(state.page(), 3);
    }

    #[test]
    fn test_new_criteria_reset_to_first_page() {
        let mut state = ViewState::new(5);
        state.replace_full(payments(25));
        state.go_to(4);
        let criteria = FilterCriteria {
            category: Some(PaymentStatus::Completed),
            ..Default::default()
        };
        assert!(state.set_criteria(criteria.clone()));
        assert_eq!(state.page(), 1);
        assert_eq!(state.filtered().len(), 12);
        assert!(!state.set_criteria(criteria));
    }

    #[test]
    fn test_refresh_preserves_page_and_clamps() {
        let mut state = ViewState::new(10);
        state.replace_full(payments(25));
        state.go_to(2);
        state.replace_full(payments(25));
        assert_eq!(state.page(), 2);

        state.go_to(3);
        state.replace_full(payments(12));
        assert_eq!(state.page(), 2);
        assert_eq!(state.current_page().len(), 2);
    }

    #[test]
    fn test_filtered_is_subsequence_of_full() {
        let mut state = ViewState::new(10);
        state.replace_full(payments(30));
        state.set_criteria(FilterCriteria {
            date_bucket: "2024-02".into(),
            ..Default::default()
        });
        let mut full = state.full().iter();
        for kept in state.filtered() {
            assert!(full.any(|p| p.id == kept.id));
        }
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let mut state: ViewState<Payment> = ViewState::new(10);
        state.replace_full(Vec::new());
        assert_eq!(state.total_pages(), 1);
        assert!(state.current_page().is_empty());
    }
}
