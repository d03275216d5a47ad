//! HTTP implementation of [`AdminApi`].

use super::types::{ListEnvelope, LoginRequest, LoginResponse, SessionUser};
use super::AdminApi;
use crate::config::Config;
use crate::entity::{Booking, Cinema, Movie, Payment, User};
use crate::error::{AdminError, AuthReason, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
struct Session {
    token: String,
    user: SessionUser,
}

/// Client for the booking backend's admin endpoints.
///
/// The session token obtained by [`AdminApi::login`] is kept in memory and
/// sent as a bearer token on every list request.
pub struct AdminClient {
    http: Client,
    base_url: String,
    session: RwLock<Option<Session>>,
}

impl AdminClient {
    /// Creates a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("admin-panel/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http(base_url, http))
    }

    /// Wraps an already built HTTP client.
    pub fn with_http(base_url: &str, http: Client) -> Self {
        Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            session: RwLock::new(None),
        }
    }

    /// Builds a client from the configured base URL and timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    /// The base URL, trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The signed-in account, if any.
    pub async fn current_user(&self) -> Option<SessionUser> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    async fn token(&self) -> Result<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or_else(|| AdminError::auth(AuthReason::SessionExpired, "not signed in"))
    }

    async fn get_list<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>> {
        let url = format!("{}/api/admin/{}", self.base_url, resource);
        let token = self.token().await?;
        debug!(url = %url, "Fetching list");

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        let response = check_status(response).await?;

        let envelope: ListEnvelope<T> = response
            .json()
            .await
            .map_err(|e| AdminError::Parse(format!("{} list: {}", resource, e)))?;
        let items = envelope.into_vec();

        debug!(resource = resource, count = items.len(), "Fetched list");
        Ok(items)
    }
}

/// Turns a non-success response into the matching error.
///
/// Privilege failures are recognised by status code only; the body wording
/// differs between backend versions and is logged, not interpreted.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = %status, body = %body, "Request rejected");

    match status {
        StatusCode::UNAUTHORIZED => Err(AdminError::auth(AuthReason::SessionExpired, body)),
        StatusCode::FORBIDDEN => Err(AdminError::auth(AuthReason::NotAdmin, body)),
        _ => Err(AdminError::Server {
            status: status.as_u16(),
            message: body,
        }),
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn login(&self, email: &str, password: &str) -> Result<SessionUser> {
        let url = format!("{}/api/auth/login", self.base_url);
        debug!(url = %url, email = %email, "Attempting login");

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self.http.post(&url).json(&request).send().await?;
        let response = match check_status(response).await {
            Err(AdminError::Auth {
                reason: AuthReason::SessionExpired,
                detail,
            }) => return Err(AdminError::auth(AuthReason::InvalidCredentials, detail)),
            other => other?,
        };

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| AdminError::Parse(format!("login response: {}", e)))?;

        info!(user_id = login.user.id, role = ?login.user.role, "Login successful");

        let user = login.user.clone();
        *self.session.write().await = Some(Session {
            token: login.token,
            user: login.user,
        });
        Ok(user)
    }

    async fn logout(&self) {
        *self.session.write().await = None;
        info!("Logged out");
    }

    async fn is_logged_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    async fn is_admin(&self) -> bool {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.user.is_admin())
            .unwrap_or(false)
    }

    async fn get_users(&self) -> Result<Vec<User>> {
        self.get_list("users").await
    }

    async fn get_payments(&self) -> Result<Vec<Payment>> {
        self.get_list("payments").await
    }

    async fn get_movies(&self) -> Result<Vec<Movie>> {
        self.get_list("movies").await
    }

    async fn get_cinemas(&self) -> Result<Vec<Cinema>> {
        self.get_list("cinemas").await
    }

    async fn get_bookings(&self) -> Result<Vec<Booking>> {
        self.get_list("bookings").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = AdminClient::new("http://localhost:3000/ ", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn test_list_without_session_is_auth_error() {
        let client = AdminClient::new("http://localhost:9", Duration::from_secs(1)).unwrap();
        let err = client.get_users().await.unwrap_err();
        assert!(matches!(
            err,
            AdminError::Auth {
                reason: AuthReason::SessionExpired,
                ..
            }
        ));
        assert!(!client.is_logged_in().await);
        assert!(!client.is_admin().await);
    }
}
