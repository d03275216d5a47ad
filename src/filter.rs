//! Filter criteria and the pure filter applied to a fetched list.
//!
//! Three independent predicates can be active at once:
//! - **Search term**: case-insensitive substring match against the entity's
//!   search fields (see [`Entity::search_fields`])
//! - **Category**: exact match against the entity's status or role
//! - **Date bucket**: prefix match against the raw creation timestamp, so
//!   `"2024"`, `"2024-03"` and `"2024-03-05"` select a year, month or day
//!
//! An absent predicate matches everything. A field the entity does not carry
//! fails only the predicate that looks at it.

use crate::entity::Entity;

/// The active set of filter predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria<C> {
    /// Search term. Empty means no search.
    pub search: String,
    /// Exact category, or any.
    pub category: Option<C>,
    /// Timestamp prefix. Empty means any date.
    pub date_bucket: String,
}

impl<C> Default for FilterCriteria<C> {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            date_bucket: String::new(),
        }
    }
}

impl<C: Copy + Eq> FilterCriteria<C> {
    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.search_term().is_none() && self.category.is_none() && self.bucket().is_none()
    }

    /// Lower-cased search term, or `None` when blank.
    fn search_term(&self) -> Option<String> {
        let term = self.search.trim();
        (!term.is_empty()).then(|| term.to_lowercase())
    }

    fn bucket(&self) -> Option<&str> {
        let bucket = self.date_bucket.trim();
        (!bucket.is_empty()).then_some(bucket)
    }

    /// Advances the category filter through `None` and then each of
    /// `choices` in order, wrapping back to `None`.
    pub fn cycle_category(&mut self, choices: &[C]) {
        self.category = match self.category {
            None => choices.first().copied(),
            Some(current) => choices
                .iter()
                .position(|c| *c == current)
                .and_then(|i| choices.get(i + 1))
                .copied(),
        };
    }
}

/// Returns true when `entity` satisfies every active predicate.
pub fn matches<E: Entity>(entity: &E, criteria: &FilterCriteria<E::Category>) -> bool {
    if let Some(term) = criteria.search_term() {
        let hit = entity
            .search_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&term));
        if !hit {
            return false;
        }
    }

    if let Some(wanted) = criteria.category {
        if entity.category() != Some(wanted) {
            return false;
        }
    }

    if let Some(bucket) = criteria.bucket() {
        match entity.created_at() {
            Some(ts) if ts.starts_with(bucket) => {}
            _ => return false,
        }
    }

    true
}

/// Stable filter: the entities of `full` that satisfy `criteria`, in their
/// original order.
pub fn apply<E: Entity>(full: &[E], criteria: &FilterCriteria<E::Category>) -> Vec<E> {
    if criteria.is_empty() {
        return full.to_vec();
    }
    full.iter()
        .filter(|entity| matches(*entity, criteria))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Payment, PaymentStatus, Role, User};

    fn user(id: u64, name: &str, email: Option<&str>, role: Role, ts: Option<&str>) -> User {
        User {
            id,
            username: name.to_string(),
            email: email.map(str::to_string),
            role: Some(role),
            created_at: ts.map(str::to_string),
        }
    }

    fn users() -> Vec<User> {
        vec![
            user(1, "ana", Some("ana@example.com"), Role::Admin, Some("2024-03-05T10:00:00Z")),
            user(2, "bob", None, Role::User, Some("2024-04-01T09:00:00Z")),
            user(3, "Diana", Some("d@example.com"), Role::User, None),
            user(12, "carl", Some("carl@corp.io"), Role::User, Some("2023-12-31T23:59:59Z")),
        ]
    }

    fn ids(list: &[User]) -> Vec<u64> {
        list.iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_search_ana_selects_only_ana() {
        let list = vec![
            user(1, "ana", None, Role::User, None),
            user(2, "bob", None, Role::User, None),
        ];
        let criteria = FilterCriteria {
            search: "ana".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&list, &criteria)), vec![1]);
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let list = users();
        assert_eq!(apply(&list, &FilterCriteria::default()), list);

        let blank = FilterCriteria {
            search: "   ".into(),
            ..Default::default()
        };
        assert_eq!(apply(&list, &blank), list);
    }

    #[test]
    fn test_search_is_case_insensitive_and_preserves_order() {
        let criteria = FilterCriteria {
            search: "ANA".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&users(), &criteria)), vec![1, 3]);
    }

    #[test]
    fn test_search_matches_id_text_and_email() {
        let by_id = FilterCriteria {
            search: "12".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&users(), &by_id)), vec![12]);

        let by_email = FilterCriteria {
            search: "corp.io".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&users(), &by_email)), vec![12]);
    }

    #[test]
    fn test_missing_field_only_fails_its_predicate() {
        // bob has no email but still matches on username
        let criteria = FilterCriteria {
            search: "bob".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&users(), &criteria)), vec![2]);

        // Diana has no timestamp so any date bucket excludes her
        let criteria = FilterCriteria {
            search: "diana".into(),
            date_bucket: "2024".into(),
            ..Default::default()
        };
        assert!(apply(&users(), &criteria).is_empty());
    }

    #[test]
    fn test_category_is_exact() {
        let criteria = FilterCriteria {
            category: Some(Role::Admin),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&users(), &criteria)), vec![1]);
    }

    #[test]
    fn test_date_bucket_is_prefix() {
        let month = FilterCriteria {
            date_bucket: "2024-03".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&users(), &month)), vec![1]);

        let year = FilterCriteria {
            date_bucket: "2024".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&users(), &year)), vec![1, 2]);
    }

    #[test]
    fn test_result_is_subsequence_satisfying_all_predicates() {
        let full = users();
        let criteria = FilterCriteria {
            search: "a".into(),
            category: Some(Role::User),
            date_bucket: "202".into(),
        };
        let out = apply(&full, &criteria);

        let mut cursor = full.iter();
        for kept in &out {
            assert!(cursor.any(|u| u == kept), "not an ordered subsequence");
            assert!(matches(kept, &criteria));
        }
        for excluded in full.iter().filter(|u| !out.contains(u)) {
            assert!(!matches(excluded, &criteria));
        }
        assert_eq!(ids(&out), vec![12]);
    }

    #[test]
    fn test_payments_search_booking_id() {
        let list = vec![
            Payment {
                id: 1,
                user_id: Some(5),
                booking_id: Some(900),
                amount: 10.0,
                status: Some(PaymentStatus::Completed),
                payment_method: None,
                created_at: None,
            },
            Payment {
                id: 2,
                user_id: Some(6),
                booking_id: None,
                amount: 5.0,
                status: Some(PaymentStatus::Pending),
                payment_method: None,
                created_at: None,
            },
        ];
        let criteria = FilterCriteria {
            search: "900".into(),
            ..Default::default()
        };
        assert_eq!(apply(&list, &criteria).len(), 1);

        let pending = FilterCriteria {
            category: Some(PaymentStatus::Pending),
            ..Default::default()
        };
        assert_eq!(apply(&list, &pending)[0].id, 2);
    }

    #[test]
    fn test_cycle_category_wraps_through_none() {
        let mut criteria: FilterCriteria<Role> = FilterCriteria::default();
        let choices = [Role::User, Role::Admin];
        criteria.cycle_category(&choices);
        assert_eq!(criteria.category, Some(Role::User));
        criteria.cycle_category(&choices);
        assert_eq!(criteria.category, Some(Role::Admin));
        criteria.cycle_category(&choices);
        assert_eq!(criteria.category, None);
    }
}
