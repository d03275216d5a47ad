//! Top-level program model: routes between the sign-in form, the dashboard
//! and the two list screens.

use crate::api::{AdminApi, AdminClient};
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::entity::{Payment, User};
use crate::error::{message_for, AuthReason, ErrorKind};
use crate::key::{self, Binding, KeyPress};
use crate::listing::{ListPage, Phase};
use crate::login::LoginScreen;
use crate::session::{NavigateMsg, Route, SessionStore};
use crate::style::Styles;
use bubbletea_rs::{batch, quit, Cmd, KeyMsg, Model, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use once_cell::sync::{Lazy, OnceCell};
use std::sync::Arc;
use tracing::{info, warn};

/// What the program needs from `main`: configuration, the API handle and
/// the remember-me store.
pub struct AppContext {
    /// Loaded settings.
    pub config: Config,
    /// Backend handle shared by every screen.
    pub api: Arc<dyn AdminApi>,
    /// Remember-me persistence.
    pub sessions: SessionStore,
}

impl AppContext {
    /// Builds a context whose session store lives at `config.session_file`.
    pub fn new(config: Config, api: Arc<dyn AdminApi>) -> Self {
        let sessions = SessionStore::new(&config.session_file);
        Self {
            config,
            api,
            sessions,
        }
    }

    fn unconfigured() -> Self {
        let config = Config::default();
        let client = AdminClient::from_config(&config).unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to a default HTTP client");
            AdminClient::with_http(&config.api_base_url, reqwest::Client::new())
        });
        Self::new(config, Arc::new(client))
    }
}

static CONTEXT: OnceCell<AppContext> = OnceCell::new();
static FALLBACK: Lazy<AppContext> = Lazy::new(AppContext::unconfigured);

/// Hands the context to [`App::init`]. Fails, returning the context, if one
/// was already installed.
pub fn install(context: AppContext) -> Result<(), AppContext> {
    CONTEXT.set(context)
}

/// Result of the route guard's session check.
#[derive(Debug, Clone, Copy)]
pub struct GuardMsg {
    /// The screen that was requested.
    pub route: Route,
    /// Whether a session existed at all.
    pub signed_in: bool,
    /// Signed in and holding the admin role.
    pub allowed: bool,
}

/// Global key bindings, active whenever no text input has focus (except
/// `force_quit`, which always is).
#[derive(Debug, Clone)]
pub struct AppKeyMap {
    /// Switch to the dashboard.
    pub dashboard: Binding,
    /// Switch to the users list.
    pub users: Binding,
    /// Switch to the payments list.
    pub payments: Binding,
    /// Reload the dashboard.
    pub refresh: Binding,
    /// Sign out and return to the login form.
    pub logout: Binding,
    /// Quit the program.
    pub quit: Binding,
    /// Quit even while typing.
    pub force_quit: Binding,
}

impl Default for AppKeyMap {
    fn default() -> Self {
        Self {
            dashboard: Binding::new(vec![KeyCode::F(1), KeyCode::Char('d')])
                .with_help("F1/d", "dashboard"),
            users: Binding::new(vec![KeyCode::F(2), KeyCode::Char('u')]).with_help("F2/u", "users"),
            payments: Binding::new(vec![KeyCode::F(3), KeyCode::Char('p')])
                .with_help("F3/p", "payments"),
            refresh: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "refresh"),
            logout: Binding::new(vec![KeyCode::Char('L')]).with_help("L", "sign out"),
            quit: Binding::new(vec![KeyCode::Char('q')]).with_help("q", "quit"),
            force_quit: Binding::new(vec![KeyPress::from((
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
            ))])
            .with_help("ctrl+c", "quit"),
        }
    }
}

impl key::KeyMap for AppKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.dashboard,
            &self.users,
            &self.payments,
            &self.logout,
            &self.quit,
        ]
    }
}

/// The whole console. Owns one instance of every screen and shows the one
/// matching the current [`Route`].
pub struct App {
    api: Arc<dyn AdminApi>,
    route: Route,
    login: LoginScreen,
    dashboard: Dashboard,
    users: ListPage<User>,
    payments: ListPage<Payment>,
    /// Global bindings.
    pub keymap: AppKeyMap,
    styles: Styles,
}

fn combine(mut cmds: Vec<Cmd>) -> Option<Cmd> {
    match cmds.len() {
        0 => None,
        1 => cmds.pop(),
        _ => Some(batch(cmds)),
    }
}

impl App {
    /// Creates the console on the sign-in screen.
    pub fn new(context: &AppContext) -> Self {
        let api = Arc::clone(&context.api);
        Self {
            login: LoginScreen::new(Arc::clone(&api), context.sessions.clone()),
            dashboard: Dashboard::new(Arc::clone(&api), &context.config),
            users: ListPage::new(Arc::clone(&api), &context.config, "Users"),
            payments: ListPage::new(Arc::clone(&api), &context.config, "Payments"),
            api,
            route: Route::Login,
            keymap: AppKeyMap::default(),
            styles: Styles::default(),
        }
    }

    /// The screen currently shown.
    pub fn route(&self) -> Route {
        self.route
    }

    /// The sign-in screen.
    pub fn login(&self) -> &LoginScreen {
        &self.login
    }

    /// The users list.
    pub fn users(&self) -> &ListPage<User> {
        &self.users
    }

    /// The payments list.
    pub fn payments(&self) -> &ListPage<Payment> {
        &self.payments
    }

    /// Requests a screen. Admin-only screens are entered once the guard has
    /// confirmed the session.
    pub fn navigate(&mut self, route: Route) -> Option<Cmd> {
        if !route.requires_admin() {
            return self.enter(route);
        }
        let api = Arc::clone(&self.api);
        let check: Cmd = Box::pin(async move {
            let signed_in = api.is_logged_in().await;
            let allowed = signed_in && api.is_admin().await;
            Some(Box::new(GuardMsg {
                route,
                signed_in,
                allowed,
            }) as Msg)
        });
        Some(check)
    }

    fn on_guard(&mut self, guard: &GuardMsg) -> Option<Cmd> {
        if guard.allowed {
            return self.enter(guard.route);
        }
        let reason = if guard.signed_in {
            AuthReason::NotAdmin
        } else {
            AuthReason::SignInRequired
        };
        warn!(route = guard.route.path(), ?reason, "Route refused, redirecting to sign-in");
        self.login.set_notice(message_for(ErrorKind::Auth(reason)));
        self.enter(Route::Login)
    }

    fn enter(&mut self, route: Route) -> Option<Cmd> {
        info!(route = route.path(), "Entering screen");
        self.route = route;
        match route {
            Route::Login => {
                self.login.reset();
                None
            }
            Route::Dashboard => Some(self.dashboard.load()),
            Route::Users => Some(self.users.load()),
            Route::Payments => Some(self.payments.load()),
        }
    }

    fn logout(&mut self, notice: &str) -> Option<Cmd> {
        let api = Arc::clone(&self.api);
        self.login.set_notice(notice);
        self.enter(Route::Login);
        let forget: Cmd = Box::pin(async move {
            api.logout().await;
            None
        });
        Some(forget)
    }

    /// A list that failed because the token was refused sends the user back
    /// to the sign-in form.
    fn session_lost(&self) -> bool {
        let expired = Some(ErrorKind::Auth(AuthReason::SessionExpired));
        match self.route {
            Route::Users => self.users.phase() == Phase::Errored && self.users.last_error() == expired,
            Route::Payments => {
                self.payments.phase() == Phase::Errored && self.payments.last_error() == expired
            }
            _ => false,
        }
    }

    fn is_editing(&self) -> bool {
        match self.route {
            Route::Login => true,
            Route::Dashboard => false,
            Route::Users => self.users.is_editing(),
            Route::Payments => self.payments.is_editing(),
        }
    }

    fn handle_key(&mut self, key: &KeyMsg, msg: &Msg) -> Option<Cmd> {
        if self.keymap.force_quit.matches(key) {
            return Some(quit());
        }

        if !self.is_editing() {
            if self.keymap.quit.matches(key) {
                return Some(quit());
            }
            if self.keymap.logout.matches(key) {
                return self.logout("You have been signed out.");
            }
            let target = [
                (&self.keymap.dashboard, Route::Dashboard),
                (&self.keymap.users, Route::Users),
                (&self.keymap.payments, Route::Payments),
            ]
            .into_iter()
            .find(|(binding, _)| binding.matches(key))
            .map(|(_, route)| route);
            if let Some(route) = target {
                return self.navigate(route);
            }
        }

        match self.route {
            Route::Login => self.login.update(msg),
            Route::Dashboard => self
                .keymap
                .refresh
                .matches(key)
                .then(|| self.dashboard.load()),
            Route::Users => self.users.update(msg),
            Route::Payments => self.payments.update(msg),
        }
    }

    fn view_tabs(&self) -> String {
        [
            (Route::Dashboard, "Dashboard"),
            (Route::Users, "Users"),
            (Route::Payments, "Payments"),
        ]
        .iter()
        .map(|(route, label)| {
            if *route == self.route {
                self.styles.active_tab.render(label)
            } else {
                self.styles.tab.render(label)
            }
        })
        .collect::<Vec<_>>()
        .join("   ")
    }
}

impl Model for App {
    fn init() -> (Self, Option<Cmd>) {
        let context = CONTEXT.get().unwrap_or_else(|| &*FALLBACK);
        (App::new(context), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(nav) = msg.downcast_ref::<NavigateMsg>() {
            return self.navigate(nav.0);
        }
        if let Some(guard) = msg.downcast_ref::<GuardMsg>() {
            return self.on_guard(guard);
        }
        if let Some(key) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key, &msg);
        }

        // Timers and fetch results carry their owner's id; every screen
        // ignores the ones that are not its own.
        let cmds: Vec<Cmd> = [
            self.login.update(&msg),
            self.dashboard.update(&msg),
            self.users.update(&msg),
            self.payments.update(&msg),
        ]
        .into_iter()
        .flatten()
        .collect();

        if self.session_lost() {
            let mut cmds = cmds;
            cmds.extend(self.logout(message_for(ErrorKind::Auth(AuthReason::SessionExpired))));
            return combine(cmds);
        }
        combine(cmds)
    }

    fn view(&self) -> String {
        let body = match self.route {
            Route::Login => return self.login.view(),
            Route::Dashboard => self.dashboard.view(),
            Route::Users => self.users.view(),
            Route::Payments => self.payments.view(),
        };

        let user = self
            .login
            .user()
            .map(|u| format!("signed in as {}", u.username))
            .unwrap_or_default();
        format!(
            "{}   {}\n\n{}\n\n{}",
            self.view_tabs(),
            self.styles.muted.render(&user),
            body,
            key::short_help_view(&self.keymap)
        )
    }
}
