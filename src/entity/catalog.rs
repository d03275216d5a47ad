//! Records the dashboard only counts.

use serde::{Deserialize, Serialize};

/// A movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Movie id.
    pub id: u64,
    /// Title.
    #[serde(default)]
    pub title: String,
}

/// A cinema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cinema {
    /// Cinema id.
    pub id: u64,
    /// Name.
    #[serde(default)]
    pub name: String,
}

/// A ticket booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking id.
    pub id: u64,
    /// The account that booked.
    #[serde(default)]
    pub user_id: Option<u64>,
    /// Raw creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}
