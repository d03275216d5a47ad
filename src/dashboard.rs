//! Overview screen: totals across all resources and the latest payments.
//!
//! The five lists are requested together. A source that fails is logged and
//! counted as empty so the remaining figures still show.

use crate::api::AdminApi;
use crate::config::Config;
use crate::entity::{self, Booking, Cinema, Entity, Movie, Payment, PaymentStatus, Stat, User};
use crate::error::Result;
use crate::style::Styles;
use crate::table;
use crate::{counter, spinner};
use bubbletea_rs::{batch, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Number of payments in the "recent" table.
pub const RECENT_PAYMENTS: usize = 5;

/// Everything the dashboard shows, merged from the five sources.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Registered accounts.
    pub users: Vec<User>,
    /// Movies in the catalogue.
    pub movies: Vec<Movie>,
    /// Cinemas.
    pub cinemas: Vec<Cinema>,
    /// Bookings.
    pub bookings: Vec<Booking>,
    /// Payments of every status.
    pub payments: Vec<Payment>,
}

impl Snapshot {
    /// Fetches all sources concurrently.
    pub async fn fetch(api: Arc<dyn AdminApi>) -> Self {
        let (users, movies, cinemas, bookings, payments) = futures::join!(
            api.get_users(),
            api.get_movies(),
            api.get_cinemas(),
            api.get_bookings(),
            api.get_payments(),
        );
        Self {
            users: or_empty("users", users),
            movies: or_empty("movies", movies),
            cinemas: or_empty("cinemas", cinemas),
            bookings: or_empty("bookings", bookings),
            payments: or_empty("payments", payments),
        }
    }

    /// Headline figures in display order. Revenue counts completed payments only.
    pub fn stats(&self) -> Vec<Stat> {
        vec![
            Stat::count("Users", self.users.len()),
            Stat::count("Movies", self.movies.len()),
            Stat::count("Cinemas", self.cinemas.len()),
            Stat::count("Bookings", self.bookings.len()),
            Stat::money("Revenue", entity::revenue(&self.payments)),
        ]
    }

    /// Payment count per status, in display order.
    pub fn status_breakdown(&self) -> Vec<(PaymentStatus, usize)> {
        [
            PaymentStatus::Completed,
            PaymentStatus::Pending,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ]
        .into_iter()
        .map(|status| {
            let n = self
                .payments
                .iter()
                .filter(|p| p.status == Some(status))
                .count();
            (status, n)
        })
        .collect()
    }

    /// The newest payments first. Payments without a timestamp sort last.
    pub fn recent_payments(&self, limit: usize) -> Vec<&Payment> {
        let mut recent: Vec<&Payment> = self.payments.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        recent
    }
}

fn or_empty<T>(resource: &str, result: Result<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(resource = resource, error = %e, "Dashboard source failed, counting it as empty");
            Vec::new()
        }
    }
}

/// Result of [`Dashboard::start_fetch`].
pub struct SnapshotMsg {
    id: i64,
    generation: u64,
    /// The merged sources.
    pub snapshot: Snapshot,
}

/// The overview screen.
///
/// Shows the five headline counters, a payment status breakdown and the
/// most recent payments. A reload while one is in flight supersedes it.
pub struct Dashboard {
    id: i64,
    api: Arc<dyn AdminApi>,
    generation: u64,
    loading: bool,
    snapshot: Snapshot,
    counters: Vec<counter::Model>,
    recent: table::Model,
    spinner: spinner::Model,
    counter_duration: Duration,
    counter_tick: Duration,
    styles: Styles,
}

impl Dashboard {
    /// An empty dashboard. Nothing is fetched until [`Dashboard::load`].
    pub fn new(api: Arc<dyn AdminApi>, config: &Config) -> Self {
        let snapshot = Snapshot::default();
        Self {
            id: next_id(),
            api,
            generation: 0,
            loading: false,
            counters: snapshot.stats().iter().map(counter::Model::from_stat).collect(),
            snapshot,
            recent: table::Model::new(Payment::columns()).without_focus(),
            spinner: spinner::Model::new(),
            counter_duration: config.counter_duration(),
            counter_tick: config.counter_tick(),
            styles: Styles::default(),
        }
    }

    /// True while a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The last snapshot delivered.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// One counter per [`Snapshot::stats`] entry.
    pub fn counters(&self) -> &[counter::Model] {
        &self.counters
    }

    /// Starts the spinner along with the fetch.
    pub fn load(&mut self) -> Cmd {
        let fetch = self.start_fetch();
        batch(vec![fetch, self.spinner.tick()])
    }

    /// Issues the combined fetch and returns it alone.
    pub fn start_fetch(&mut self) -> Cmd {
        self.generation += 1;
        self.loading = true;
        debug!(generation = self.generation, "Loading dashboard");

        let api = Arc::clone(&self.api);
        let id = self.id;
        let generation = self.generation;
        Box::pin(async move {
            let snapshot = Snapshot::fetch(api).await;
            Some(Box::new(SnapshotMsg {
                id,
                generation,
                snapshot,
            }) as Msg)
        })
    }

    /// Handles snapshot results, spinner ticks and counter frames.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(loaded) = msg.downcast_ref::<SnapshotMsg>() {
            if loaded.id != self.id || loaded.generation != self.generation {
                return None;
            }
            return self.on_snapshot(loaded.snapshot.clone());
        }
        if msg.downcast_ref::<spinner::TickMsg>().is_some() {
            let cmd = self.spinner.update(msg);
            return cmd.filter(|_| self.loading);
        }
        if msg.downcast_ref::<counter::FrameMsg>().is_some() {
            return self.counters.iter_mut().find_map(|c| c.update(msg));
        }
        None
    }

    fn on_snapshot(&mut self, snapshot: Snapshot) -> Option<Cmd> {
        self.loading = false;
        info!(
            users = snapshot.users.len(),
            payments = snapshot.payments.len(),
            "Dashboard loaded"
        );

        self.recent.set_rows(
            snapshot
                .recent_payments(RECENT_PAYMENTS)
                .into_iter()
                .map(Entity::row)
                .collect(),
        );

        let (duration, tick) = (self.counter_duration, self.counter_tick);
        let mut cmds = Vec::new();
        self.counters = snapshot
            .stats()
            .iter()
            .map(|stat| {
                let mut counter = counter::Model::from_stat(stat);
                cmds.push(counter.animate_to(stat.value, duration, tick));
                counter
            })
            .collect();
        self.snapshot = snapshot;
        Some(batch(cmds))
    }

    /// Renders the screen.
    pub fn view(&self) -> String {
        let mut out = vec![self.styles.title.render("Dashboard")];
        if self.loading {
            out.push(format!("{} Loading…", self.spinner.view()));
        }

        let counters: Vec<String> = self.counters.iter().map(counter::Model::view).collect();
        out.push(counters.join("    "));
        out.push(String::new());

        let breakdown: Vec<String> = self
            .snapshot
            .status_breakdown()
            .into_iter()
            .map(|(status, n)| format!("{} {}", status, n))
            .collect();
        out.push(
            self.styles
                .subtitle
                .render(&format!("Payments by status: {}", breakdown.join(" · "))),
        );
        out.push(String::new());

        out.push(self.styles.subtitle.render("Recent payments"));
        if self.recent.rows().is_empty() {
            out.push(self.styles.muted.render("No payments yet."));
        } else {
            out.push(self.recent.view());
        }
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(id: u64, status: PaymentStatus, amount: f64, ts: Option<&str>) -> Payment {
        Payment {
            id,
            user_id: None,
            booking_id: None,
            amount,
            status: Some(status),
            payment_method: None,
            created_at: ts.map(str::to_string),
        }
    }

    #[test]
    fn test_stats_use_completed_revenue() {
        let snapshot = Snapshot {
            payments: vec![
                payment(1, PaymentStatus::Completed, 10.10, None),
                payment(2, PaymentStatus::Pending, 99.0, None),
                payment(3, PaymentStatus::Completed, 0.20, None),
            ],
            ..Default::default()
        };
        let stats = snapshot.stats();
        assert_eq!(stats[4], Stat::money("Revenue", 10.30));
        assert_eq!(stats[0].value, 0.0);
    }

    #[test]
    fn test_recent_payments_newest_first() {
        let snapshot = Snapshot {
            payments: vec![
                payment(1, PaymentStatus::Completed, 1.0, Some("2024-01-01T00:00:00Z")),
                payment(2, PaymentStatus::Completed, 1.0, None),
                payment(3, PaymentStatus::Completed, 1.0, Some("2024-03-01T00:00:00Z")),
                payment(4, PaymentStatus::Completed, 1.0, Some("2024-02-01T00:00:00Z")),
            ],
            ..Default::default()
        };
        let ids: Vec<u64> = snapshot.recent_payments(3).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 4, 1]);
    }

    #[test]
    fn test_status_breakdown_counts() {
        let snapshot = Snapshot {
            payments: vec![
                payment(1, PaymentStatus::Failed, 1.0, None),
                payment(2, PaymentStatus::Failed, 1.0, None),
                payment(3, PaymentStatus::Refunded, 1.0, None),
            ],
            ..Default::default()
        };
        let breakdown = snapshot.status_breakdown();
        assert!(breakdown.contains(&(PaymentStatus::Failed, 2)));
        assert!(breakdown.contains(&(PaymentStatus::Completed, 0)));
    }
}
