//! Navigation routes and the persisted remember-me flag.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Screens of the console, addressed by the paths the web panel used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Sign-in form.
    Login,
    /// Overview.
    Dashboard,
    /// Users list.
    Users,
    /// Payments list.
    Payments,
}

impl Route {
    /// The route's path.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/admin/login",
            Route::Dashboard => "/admin",
            Route::Users => "/admin/users",
            Route::Payments => "/admin/payments",
        }
    }

    /// Parses a path. A trailing slash is ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/admin/login" => Some(Route::Login),
            "/admin" => Some(Route::Dashboard),
            "/admin/users" => Some(Route::Users),
            "/admin/payments" => Some(Route::Payments),
            _ => None,
        }
    }

    /// Everything except the sign-in form.
    pub fn requires_admin(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

/// Asks the application to switch screens. Routes that need an admin
/// session go through the route guard first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateMsg(pub Route);

/// Contents of the session file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberMe {
    /// Whether to remember the e-mail.
    #[serde(rename = "admin_remember_me", default)]
    pub enabled: bool,
    /// E-mail to pre-fill when `enabled` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Reads and writes [`RememberMe`] as JSON.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// A store backed by the file at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The session file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the flag. A missing or unreadable file means "not remembered".
    pub fn load(&self) -> RememberMe {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
                RememberMe::default()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => RememberMe::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cannot read session file");
                RememberMe::default()
            }
        }
    }

    /// Persists the flag. Disabling it also forgets the e-mail.
    pub fn save(&self, remember: &RememberMe) -> io::Result<()> {
        let stored = if remember.enabled {
            remember.clone()
        } else {
            RememberMe::default()
        };
        let raw = serde_json::to_string_pretty(&stored)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), enabled = stored.enabled, "Saved session flag");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_round_trip() {
        for route in [Route::Login, Route::Dashboard, Route::Users, Route::Payments] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/admin/"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/nope"), None);
    }

    #[test]
    fn test_only_login_is_public() {
        assert!(!Route::Login.requires_admin());
        assert!(Route::Payments.requires_admin());
    }

    #[test]
    fn test_flag_uses_storage_key() {
        let json = serde_json::to_string(&RememberMe {
            enabled: true,
            email: None,
        })
        .unwrap();
        assert!(json.contains("\"admin_remember_me\":true"));
    }
}
