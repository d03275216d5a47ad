use crate::entity::Role;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account e-mail.
    pub email: String,
    /// Plain password, sent over the configured transport.
    pub password: String,
}

/// Successful login answer.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for later requests.
    pub token: String,
    /// The account that signed in.
    pub user: SessionUser,
}

/// The account behind the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Account id.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub username: String,
    /// Account e-mail, when the backend sends it.
    #[serde(default)]
    pub email: Option<String>,
    /// Missing or unknown roles are never treated as admin.
    #[serde(default)]
    pub role: Option<Role>,
}

impl SessionUser {
    /// True only for [`Role::Admin`].
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }
}

/// List endpoints answer either with a bare array or with `{ "data": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    /// `[...]`
    Bare(Vec<T>),
    /// `{ "data": [...] }`
    Wrapped {
        /// The items.
        data: Vec<T>,
    },
}

impl<T> ListEnvelope<T> {
    /// The items, whichever shape they came in.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u64,
    }

    #[test]
    fn test_envelope_accepts_both_shapes() {
        let bare: ListEnvelope<Item> = serde_json::from_str(r#"[{"id":1},{"id":2}]"#).unwrap();
        assert_eq!(bare.into_vec().len(), 2);

        let wrapped: ListEnvelope<Item> =
            serde_json::from_str(r#"{"data":[{"id":3}]}"#).unwrap();
        assert_eq!(wrapped.into_vec(), vec![Item { id: 3 }]);
    }
}
