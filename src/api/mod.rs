//! Backend API access.
//!
//! Screens only see the [`AdminApi`] trait; [`AdminClient`] is the HTTP
//! implementation used by the binary.

mod client;
mod types;

pub use client::AdminClient;
pub use types::{ListEnvelope, LoginRequest, LoginResponse, SessionUser};

use crate::entity::{Booking, Cinema, Movie, Payment, User};
use crate::error::Result;
use async_trait::async_trait;

/// Operations the console needs from the backend.
///
/// All list getters require a session; without one they fail with
/// [`AuthReason::SessionExpired`](crate::error::AuthReason::SessionExpired)
/// before any request is sent.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Signs in and stores the session token on success.
    async fn login(&self, email: &str, password: &str) -> Result<SessionUser>;

    /// Forgets the session token.
    async fn logout(&self);

    /// True while a session token is held.
    async fn is_logged_in(&self) -> bool;

    /// True when the signed-in account has the admin role.
    async fn is_admin(&self) -> bool;

    /// All registered accounts.
    async fn get_users(&self) -> Result<Vec<User>>;

    /// All payments.
    async fn get_payments(&self) -> Result<Vec<Payment>>;

    /// All movies.
    async fn get_movies(&self) -> Result<Vec<Movie>>;

    /// All cinemas.
    async fn get_cinemas(&self) -> Result<Vec<Cinema>>;

    /// All bookings.
    async fn get_bookings(&self) -> Result<Vec<Booking>>;
}
