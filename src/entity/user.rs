use super::{format_date, Entity, Stat};
use crate::api::AdminApi;
use crate::error::Result;
use crate::table::{Column, Row};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Account role. Unrecognised values deserialize to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer.
    User,
    /// May use this console.
    Admin,
    /// Any role this console does not know.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        })
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account id.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub username: String,
    /// Account e-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Account role.
    #[serde(default)]
    pub role: Option<Role>,
    /// Raw creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Entity for User {
    type Category = Role;

    const PLURAL: &'static str = "users";

    fn id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<Option<String>> {
        vec![
            Some(self.id.to_string()),
            Some(self.username.clone()),
            self.email.clone(),
        ]
    }

    fn category(&self) -> Option<Role> {
        self.role
    }

    fn categories() -> &'static [Role] {
        &[Role::User, Role::Admin]
    }

    fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("ID", 6),
            Column::new("Username", 18),
            Column::new("Email", 28),
            Column::new("Role", 8),
            Column::new("Joined", 10),
        ]
    }

    fn row(&self) -> Row {
        Row::new(vec![
            format!("#{}", self.id),
            self.username.clone(),
            self.email.clone().unwrap_or_else(|| "—".to_string()),
            self.role.map(|r| r.to_string()).unwrap_or_else(|| "—".to_string()),
            format_date(self.created_at()),
        ])
    }

    fn summarize(items: &[Self]) -> Vec<Stat> {
        let admins = items
            .iter()
            .filter(|u| u.role == Some(Role::Admin))
            .count();
        vec![
            Stat::count("Total users", items.len()),
            Stat::count("Admins", admins),
            Stat::count("Regular", items.len() - admins),
        ]
    }

    fn detail(&self) -> String {
        format!(
            "User #{} · {} · {} · role {} · joined {}",
            self.id,
            self.username,
            self.email.as_deref().unwrap_or("no email"),
            self.role.map(|r| r.to_string()).unwrap_or_else(|| "—".into()),
            format_date(self.created_at()),
        )
    }

    fn fetch(api: Arc<dyn AdminApi>) -> BoxFuture<'static, Result<Vec<Self>>> {
        Box::pin(async move { api.get_users().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_missing_fields() {
        let user: User = serde_json::from_str(r#"{"id": 3, "username": "ana"}"#).unwrap();
        assert_eq!(user.email, None);
        assert_eq!(user.role, None);
        assert_eq!(user.search_fields()[2], None);
    }

    #[test]
    fn test_unknown_role_does_not_fail() {
        let user: User =
            serde_json::from_str(r#"{"id": 1, "username": "x", "role": "owner"}"#).unwrap();
        assert_eq!(user.role, Some(Role::Unknown));
    }

    #[test]
    fn test_summary_counts_admins() {
        let users = vec![
            User {
                id: 1,
                username: "a".into(),
                email: None,
                role: Some(Role::Admin),
                created_at: None,
            },
            User {
                id: 2,
                username: "b".into(),
                email: None,
                role: Some(Role::User),
                created_at: None,
            },
        ];
        let stats = User::summarize(&users);
        assert_eq!(stats[0].value, 2.0);
        assert_eq!(stats[1].value, 1.0);
        assert_eq!(stats[2].value, 1.0);
    }
}
