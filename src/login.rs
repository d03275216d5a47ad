//! Sign-in screen.
//!
//! E-mail and password are checked locally before anything is sent. A
//! successful sign-in by an account without the admin role is undone
//! straight away: the session is dropped and the privilege message shown.

use crate::api::{AdminApi, SessionUser};
use crate::error::{message_for, AdminError, AuthReason, ErrorKind, Field, Result};
use crate::input::{EchoMode, Model as Input};
use crate::key::{self, Binding};
use crate::session::{NavigateMsg, RememberMe, Route, SessionStore};
use crate::style::Styles;
use crate::{spinner, Component};
use bubbletea_rs::{batch, Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, warn};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Checks the form before submitting.
pub fn validate(email: &str, password: &str) -> Result<()> {
    let email = email.trim();
    if !EMAIL_RE.is_match(email) {
        return Err(AdminError::validation(
            Field::Email,
            message_for(ErrorKind::Validation(Field::Email)),
        ));
    }
    if password.is_empty() {
        return Err(AdminError::validation(
            Field::Password,
            message_for(ErrorKind::Validation(Field::Password)),
        ));
    }
    Ok(())
}

/// Result of a sign-in attempt.
#[derive(Debug, Clone)]
pub struct LoginResultMsg {
    attempt: u64,
    /// The account, or why sign-in was refused.
    pub outcome: std::result::Result<SessionUser, ErrorKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Email,
    Password,
    Remember,
}

/// Key bindings of the sign-in form.
#[derive(Debug, Clone)]
pub struct LoginKeyMap {
    /// Focus the next control.
    pub next_field: Binding,
    /// Focus the previous control.
    pub prev_field: Binding,
    /// Toggle remember-me while it has focus.
    pub toggle: Binding,
    /// Submit the form.
    pub submit: Binding,
}

impl Default for LoginKeyMap {
    fn default() -> Self {
        Self {
            next_field: Binding::new(vec![KeyCode::Tab, KeyCode::Down]).with_help("tab", "next"),
            prev_field: Binding::new(vec![
                key::KeyPress::from(KeyCode::BackTab),
                key::KeyPress::from((KeyCode::BackTab, KeyModifiers::SHIFT)),
                key::KeyPress::from(KeyCode::Up),
            ])
            .with_help("shift+tab", "prev"),
            toggle: Binding::new(vec![KeyCode::Char(' ')]).with_help("space", "remember me"),
            submit: Binding::new(vec![KeyCode::Enter]).with_help("enter", "sign in"),
        }
    }
}

impl key::KeyMap for LoginKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.next_field, &self.toggle, &self.submit]
    }
}

/// The sign-in form: e-mail, password and a remember-me toggle.
///
/// Only administrators get through. A non-admin account is signed out
/// again and shown the access-denied message.
pub struct LoginScreen {
    api: Arc<dyn AdminApi>,
    sessions: SessionStore,
    email: Input,
    password: Input,
    remember: bool,
    focus: Focus,
    error: Option<String>,
    notice: Option<String>,
    submitting: bool,
    attempt: u64,
    user: Option<SessionUser>,
    spinner: spinner::Model,
    /// Form bindings.
    pub keymap: LoginKeyMap,
    styles: Styles,
}

impl LoginScreen {
    /// Builds the form, pre-filling the e-mail when remember-me was set.
    pub fn new(api: Arc<dyn AdminApi>, sessions: SessionStore) -> Self {
        let stored = sessions.load();
        let mut screen = Self {
            api,
            sessions,
            email: Input::new()
                .with_prompt("Email:    ")
                .with_placeholder("admin@example.com"),
            password: Input::new()
                .with_prompt("Password: ")
                .with_echo_mode(EchoMode::Password),
            remember: stored.enabled,
            focus: Focus::Email,
            error: None,
            notice: None,
            submitting: false,
            attempt: 0,
            user: None,
            spinner: spinner::Model::new(),
            keymap: LoginKeyMap::default(),
            styles: Styles::default(),
        };
        let start = match stored.email.filter(|_| stored.enabled) {
            Some(email) => {
                screen.email.set_value(&email);
                Focus::Password
            }
            None => Focus::Email,
        };
        screen.set_focus(start);
        screen
    }

    /// Current e-mail text.
    pub fn email(&self) -> &str {
        self.email.value()
    }

    /// Whether remember-me is ticked.
    pub fn remember(&self) -> bool {
        self.remember
    }

    /// Error shown under the form.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True between submit and its result.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The admin account of the last successful sign-in.
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Shows an informational line above the form, e.g. after sign-out.
    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Clears the password and any error, keeping the e-mail.
    pub fn reset(&mut self) {
        self.password.reset();
        self.email.set_invalid(false);
        self.error = None;
        self.submitting = false;
        self.user = None;
        let focus = if self.email.value().is_empty() {
            Focus::Email
        } else {
            Focus::Password
        };
        self.set_focus(focus);
    }

    /// Replaces the e-mail text.
    pub fn set_email(&mut self, email: &str) {
        self.email.set_value(email);
    }

    /// Replaces the password text.
    pub fn set_password(&mut self, password: &str) {
        self.password.set_value(password);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.email.blur();
        self.password.blur();
        self.focus = focus;
        let _ = match focus {
            Focus::Email => self.email.focus(),
            Focus::Password => self.password.focus(),
            Focus::Remember => None,
        };
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = [Focus::Email, Focus::Password, Focus::Remember];
        let at = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (at + 1) % order.len()
        } else {
            (at + order.len() - 1) % order.len()
        };
        self.set_focus(order[next]);
    }

    /// Validates and, when the form is valid, returns the command that sends
    /// the credentials.
    pub fn submit(&mut self) -> Option<Cmd> {
        if self.submitting {
            return None;
        }
        self.notice = None;
        self.email.set_invalid(false);
        self.password.set_invalid(false);

        if let Err(err) = validate(self.email.value(), self.password.value()) {
            if let ErrorKind::Validation(field) = err.kind() {
                let focus = match field {
                    Field::Email => {
                        self.email.set_invalid(true);
                        Focus::Email
                    }
                    Field::Password => {
                        self.password.set_invalid(true);
                        Focus::Password
                    }
                };
                self.set_focus(focus);
            }
            self.error = Some(err.user_message());
            return None;
        }

        self.error = None;
        self.submitting = true;
        self.attempt += 1;

        let api = Arc::clone(&self.api);
        let email = self.email.value().trim().to_string();
        let password = self.password.value().to_string();
        let attempt = self.attempt;
        let login: Cmd = Box::pin(async move {
            let outcome = match api.login(&email, &password).await {
                Ok(user) if user.is_admin() => Ok(user),
                Ok(user) => {
                    warn!(user_id = user.id, "Rejected sign-in without admin role");
                    api.logout().await;
                    Err(ErrorKind::Auth(AuthReason::NotAdmin))
                }
                Err(err) => {
                    warn!(error = %err, "Sign-in failed");
                    Err(err.kind())
                }
            };
            Some(Box::new(LoginResultMsg { attempt, outcome }) as Msg)
        });
        Some(login)
    }

    fn on_result(&mut self, msg: &LoginResultMsg) -> Option<Cmd> {
        if msg.attempt != self.attempt || !self.submitting {
            return None;
        }
        self.submitting = false;

        match &msg.outcome {
            Ok(user) => {
                info!(user_id = user.id, "Admin signed in");
                self.user = Some(user.clone());
                self.persist_remember();
                self.password.reset();
                let navigate: Cmd =
                    Box::pin(async { Some(Box::new(NavigateMsg(Route::Dashboard)) as Msg) });
                Some(navigate)
            }
            Err(kind) => {
                self.error = Some(message_for(*kind).to_string());
                self.password.reset();
                self.set_focus(Focus::Password);
                None
            }
        }
    }

    fn persist_remember(&self) {
        let remember = RememberMe {
            enabled: self.remember,
            email: self
                .remember
                .then(|| self.email.value().trim().to_string()),
        };
        if let Err(e) = self.sessions.save(&remember) {
            warn!(path = %self.sessions.path().display(), error = %e, "Cannot save session file");
        }
    }

    /// Handles keys, spinner ticks and sign-in results.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if let Some(result) = msg.downcast_ref::<LoginResultMsg>() {
            return self.on_result(result);
        }
        if msg.downcast_ref::<spinner::TickMsg>().is_some() {
            let cmd = self.spinner.update(msg);
            return cmd.filter(|_| self.submitting);
        }
        let key = msg.downcast_ref::<KeyMsg>()?;
        if self.submitting {
            return None;
        }

        if self.keymap.submit.matches(key) {
            let login = self.submit()?;
            return Some(batch(vec![login, self.spinner.tick()]));
        }
        if self.keymap.next_field.matches(key) {
            self.cycle_focus(true);
            return None;
        }
        if self.keymap.prev_field.matches(key) {
            self.cycle_focus(false);
            return None;
        }

        match self.focus {
            Focus::Remember => {
                if self.keymap.toggle.matches(key) {
                    self.remember = !self.remember;
                }
            }
            Focus::Email => {
                if self.email.update(key) {
                    self.error = None;
                }
            }
            Focus::Password => {
                if self.password.update(key) {
                    self.error = None;
                }
            }
        }
        None
    }

    /// Renders the form.
    pub fn view(&self) -> String {
        let mut out = vec![self.styles.title.render("Admin sign in"), String::new()];
        if let Some(notice) = &self.notice {
            out.push(self.styles.notice.render(notice));
        }
        out.push(self.email.view());
        out.push(self.password.view());

        let check = if self.remember { "[x]" } else { "[ ]" };
        let remember = format!("{} Remember me", check);
        out.push(if self.focus == Focus::Remember {
            self.styles.active_tab.render(&remember)
        } else {
            self.styles.tab.render(&remember)
        });
        out.push(String::new());

        if self.submitting {
            out.push(format!("{} Signing in…", self.spinner.view()));
        } else if let Some(error) = &self.error {
            out.push(self.styles.error.render(error));
        }
        out.push(key::short_help_view(&self.keymap));
        out.join("\n")
    }
}
