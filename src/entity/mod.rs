//! Records returned by the backend.
//!
//! [`Entity`] is what the generic list pipeline needs to know about a record
//! type: which fields the search term looks at, which enumeration the
//! category filter compares against, how a record is laid out as a table row
//! and how the whole list is fetched.

mod catalog;
mod payment;
mod user;

pub use catalog::{Booking, Cinema, Movie};
pub use payment::{revenue, Payment, PaymentStatus};
pub use user::{Role, User};

use crate::api::AdminApi;
use crate::error::Result;
use crate::table::{Column, Row};
use futures::future::BoxFuture;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::sync::Arc;

/// A record type that can be listed, filtered and paginated.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The status/role enumeration the category filter matches exactly.
    type Category: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Plural display name, e.g. `"users"`.
    const PLURAL: &'static str;

    /// Primary key.
    fn id(&self) -> u64;

    /// Values the search term is matched against. `None` entries are fields
    /// the record does not carry; they never match.
    fn search_fields(&self) -> Vec<Option<String>>;

    /// The record's category, if it has a known one.
    fn category(&self) -> Option<Self::Category>;

    /// Category values offered by the category filter, in cycling order.
    fn categories() -> &'static [Self::Category];

    /// Raw creation timestamp as sent by the API.
    fn created_at(&self) -> Option<&str>;

    /// Table columns, in display order.
    fn columns() -> Vec<Column>;

    /// One table row, matching [`Entity::columns`].
    fn row(&self) -> Row;

    /// Summary counters shown above the table.
    fn summarize(items: &[Self]) -> Vec<Stat>;

    /// Multi-line description used by the "view" action.
    fn detail(&self) -> String;

    /// Fetches the full list from the backend.
    fn fetch(api: Arc<dyn AdminApi>) -> BoxFuture<'static, Result<Vec<Self>>>;
}

/// A labelled numeric summary value.
#[derive(Debug, Clone, PartialEq)]
pub struct Stat {
    /// Shown under the value.
    pub label: &'static str,
    /// Raw value.
    pub value: f64,
    /// Digits after the decimal point when displayed.
    pub decimals: usize,
    /// Prepended to the value.
    pub prefix: &'static str,
}

impl Stat {
    /// A whole-number count.
    pub fn count(label: &'static str, value: usize) -> Self {
        Self {
            label,
            value: value as f64,
            decimals: 0,
            prefix: "",
        }
    }

    /// A dollar amount with two decimals.
    pub fn money(label: &'static str, value: f64) -> Self {
        Self {
            label,
            value,
            decimals: 2,
            prefix: "$",
        }
    }
}

/// Renders an API timestamp as a calendar date. Unparseable values are shown
/// as their first ten characters, missing ones as a dash.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "—".to_string();
    };
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%Y-%m-%d").to_string();
    }
    raw.chars().take(10).collect()
}

/// Accepts numbers that some endpoints send as JSON strings (`"12.50"`).
pub(crate) fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Raw::Null(()) => Ok(0.0),
    }
}
