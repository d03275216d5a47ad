//! Error types for the admin console.
//!
//! Every failure the console can observe falls into one of four kinds (see
//! [`ErrorKind`]). The kind alone decides what the user is shown:
//! [`AdminError::user_message`] is a total mapping from kind to text, so no
//! screen ever inspects the wording of a backend error.

use thiserror::Error;

/// Which field of a form failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The e-mail input of the login form.
    Email,
    /// The password input of the login form.
    Password,
}

/// Why the backend refused a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthReason {
    /// Wrong e-mail or password.
    InvalidCredentials,
    /// The account is valid but is not an administrator.
    NotAdmin,
    /// No token, or the token is no longer accepted.
    SessionExpired,
    /// A protected screen was requested before anyone signed in.
    SignInRequired,
}

/// Coarse error classification used to pick user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-side input failed a format check; never sent to the server.
    Validation(Field),
    /// Credentials rejected or insufficient privilege.
    Auth(AuthReason),
    /// Network failure, timeout, or an unexpected server response.
    Transport,
    /// The action exists but is deliberately not implemented.
    NotImplemented,
}

/// Errors produced by the API client and the screens.
#[derive(Error, Debug)]
pub enum AdminError {
    /// Input failed a local format check
    #[error("invalid {field:?}: {reason}")]
    Validation {
        /// The offending input.
        field: Field,
        /// Shown to the user verbatim.
        reason: String,
    },

    /// The backend refused the credentials or the privilege level
    #[error("authentication failed ({reason:?}): {detail}")]
    Auth {
        /// Classified cause.
        reason: AuthReason,
        /// Backend wording, kept for logs only.
        detail: String,
    },

    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, kept for logs only.
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Action is stubbed out
    #[error("{action} is not implemented")]
    NotImplemented {
        /// Name of the requested action, e.g. `delete`.
        action: String,
    },
}

impl AdminError {
    /// Shorthand for an [`AdminError::Auth`] error.
    pub fn auth(reason: AuthReason, detail: impl Into<String>) -> Self {
        Self::Auth {
            reason,
            detail: detail.into(),
        }
    }

    /// Shorthand for an [`AdminError::Validation`] error.
    pub fn validation(field: Field, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdminError::Validation { field, .. } => ErrorKind::Validation(*field),
            AdminError::Auth { reason, .. } => ErrorKind::Auth(*reason),
            AdminError::Request(_) | AdminError::Server { .. } | AdminError::Parse(_) => {
                ErrorKind::Transport
            }
            AdminError::NotImplemented { .. } => ErrorKind::NotImplemented,
        }
    }

    /// Text shown to the user for this error. Validation errors carry their
    /// own reason since it describes the user's own input.
    pub fn user_message(&self) -> String {
        match self {
            AdminError::Validation { reason, .. } => reason.clone(),
            other => message_for(other.kind()).to_string(),
        }
    }
}

/// Fixed user-facing text for each error kind.
pub fn message_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation(Field::Email) => "Please enter a valid email address.",
        ErrorKind::Validation(Field::Password) => "Please enter your password.",
        ErrorKind::Auth(AuthReason::InvalidCredentials) => "Invalid email or password.",
        ErrorKind::Auth(AuthReason::NotAdmin) => {
            "Access denied. Admin privileges are required to use this console."
        }
        ErrorKind::Auth(AuthReason::SessionExpired) => {
            "Your session has expired. Please sign in again."
        }
        ErrorKind::Auth(AuthReason::SignInRequired) => "Please sign in to continue.",
        ErrorKind::Transport => "Could not reach the server. Please try again.",
        ErrorKind::NotImplemented => "This action is not available yet.",
    }
}

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            AdminError::auth(AuthReason::NotAdmin, "Admin access required").kind(),
            ErrorKind::Auth(AuthReason::NotAdmin)
        );
        assert_eq!(
            AdminError::Server {
                status: 500,
                message: "boom".into()
            }
            .kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            AdminError::Parse("bad json".into()).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            AdminError::NotImplemented {
                action: "delete".into()
            }
            .kind(),
            ErrorKind::NotImplemented
        );
    }

    #[test]
    fn test_user_message_ignores_backend_wording() {
        let a = AdminError::auth(AuthReason::NotAdmin, "Admin access required");
        let b = AdminError::auth(AuthReason::NotAdmin, "Admin privileges required");
        assert_eq!(a.user_message(), b.user_message());
        assert!(!a.user_message().contains("Admin access required"));
    }

    #[test]
    fn test_signed_out_and_not_admin_read_differently() {
        let signed_out = message_for(ErrorKind::Auth(AuthReason::SignInRequired));
        let not_admin = message_for(ErrorKind::Auth(AuthReason::NotAdmin));
        assert_ne!(signed_out, not_admin);
        assert!(!signed_out.contains("Admin"));
    }

    #[test]
    fn test_server_detail_is_not_shown() {
        let err = AdminError::Server {
            status: 502,
            message: "upstream connect error at 10.0.0.7".into(),
        };
        assert_eq!(err.user_message(), message_for(ErrorKind::Transport));
    }

    #[test]
    fn test_validation_message_is_its_reason() {
        let err = AdminError::validation(Field::Email, "Email is required.");
        assert_eq!(err.user_message(), "Email is required.");
        assert_eq!(err.kind(), ErrorKind::Validation(Field::Email));
    }
}
