use super::{format_date, number_or_string, Entity, Stat};
use crate::api::AdminApi;
use crate::error::Result;
use crate::table::{Column, Row};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Payment lifecycle state. Unrecognised values deserialize to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting confirmation.
    Pending,
    /// Settled; counts towards revenue.
    Completed,
    /// Declined or errored.
    Failed,
    /// Returned to the customer.
    Refunded,
    /// Any status this console does not know.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Unknown => "unknown",
        })
    }
}

/// A payment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Payment id.
    pub id: u64,
    /// Paying account.
    #[serde(default)]
    pub user_id: Option<u64>,
    /// The booking paid for.
    #[serde(default)]
    pub booking_id: Option<u64>,
    /// Amount in dollars. Accepts a JSON number or numeric string.
    #[serde(default, deserialize_with = "number_or_string")]
    pub amount: f64,
    /// Lifecycle state.
    #[serde(default)]
    pub status: Option<PaymentStatus>,
    /// e.g. `card`.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Raw creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Payment {
    /// True for [`PaymentStatus::Completed`].
    pub fn is_completed(&self) -> bool {
        self.status == Some(PaymentStatus::Completed)
    }
}

/// Sum of completed payment amounts, rounded to cents.
pub fn revenue(payments: &[Payment]) -> f64 {
    let cents: i64 = payments
        .iter()
        .filter(|p| p.is_completed())
        .map(|p| (p.amount * 100.0).round() as i64)
        .sum();
    cents as f64 / 100.0
}

impl Entity for Payment {
    type Category = PaymentStatus;

    const PLURAL: &'static str = "payments";

    fn id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<Option<String>> {
        vec![
            Some(self.id.to_string()),
            self.user_id.map(|id| id.to_string()),
            self.booking_id.map(|id| id.to_string()),
        ]
    }

    fn category(&self) -> Option<PaymentStatus> {
        self.status
    }

    fn categories() -> &'static [PaymentStatus] {
        &[
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ]
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("ID", 6),
            Column::new("User", 7),
            Column::new("Booking", 8),
            Column::new("Amount", 10),
            Column::new("Method", 12),
            Column::new("Status", 10),
            Column::new("Date", 10),
        ]
    }

    fn row(&self) -> Row {
        let dash = || "—".to_string();
        Row::new(vec![
            format!("#{}", self.id),
            self.user_id.map(|id| format!("#{}", id)).unwrap_or_else(dash),
            self.booking_id.map(|id| format!("#{}", id)).unwrap_or_else(dash),
            format!("${:.2}", self.amount),
            self.payment_method.clone().unwrap_or_else(dash),
            self.status.map(|s| s.to_string()).unwrap_or_else(dash),
            format_date(self.created_at()),
        ])
    }

    fn summarize(items: &[Self]) -> Vec<Stat> {
        let with = |status| items.iter().filter(|p| p.status == Some(status)).count();
        vec![
            Stat::count("Total payments", items.len()),
            Stat::count("Completed", with(PaymentStatus::Completed)),
            Stat::count("Pending", with(PaymentStatus::Pending)),
            Stat::count("Failed", with(PaymentStatus::Failed)),
            Stat::money("Revenue", revenue(items)),
        ]
    }

    fn detail(&self) -> String {
        format!(
            "Payment #{} · user {} · booking {} · ${:.2} via {} · {} · {}",
            self.id,
            self.user_id.map(|id| id.to_string()).unwrap_or_else(|| "—".into()),
            self.booking_id.map(|id| id.to_string()).unwrap_or_else(|| "—".into()),
            self.amount,
            self.payment_method.as_deref().unwrap_or("unknown method"),
            self.status.map(|s| s.to_string()).unwrap_or_else(|| "—".into()),
            format_date(self.created_at()),
        )
    }

    fn fetch(api: Arc<dyn AdminApi>) -> BoxFuture<'static, Result<Vec<Self>>> {
        Box::pin(async move { api.get_payments().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(id: u64, amount: f64, status: PaymentStatus) -> Payment {
        Payment {
            id,
            user_id: Some(1),
            booking_id: Some(id * 10),
            amount,
            status: Some(status),
            payment_method: Some("card".into()),
            created_at: Some("2024-01-02T03:04:05Z".into()),
        }
    }

    #[test]
    fn test_revenue_counts_only_completed() {
        let list = vec![
            payment(1, 0.1, PaymentStatus::Completed),
            payment(2, 0.2, PaymentStatus::Completed),
            payment(3, 99.0, PaymentStatus::Failed),
        ];
        assert_eq!(revenue(&list), 0.3);
    }

    #[test]
    fn test_search_fields_are_ids() {
        let p = payment(7, 1.0, PaymentStatus::Pending);
        assert_eq!(
            p.search_fields(),
            vec![Some("7".to_string()), Some("1".to_string()), Some("70".to_string())]
        );
    }

    #[test]
    fn test_row_formats_amount() {
        let row = payment(1, 12.5, PaymentStatus::Completed).row();
        assert_eq!(row.cells[3], "$12.50");
        assert_eq!(row.cells[6], "2024-01-02");
    }
}
