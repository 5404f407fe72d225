use crate::models::{Session, SessionStatus};

/// Storefront routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    /// `/`, also reachable as `/home`.
    Home,
    /// `/apps`
    Apps,
    /// `/apps/{id}`
    AppDetail { id: String },
    /// `/search`
    Search,
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/admin`
    Admin,
    /// `/admin/apps`
    AdminApps,
    NotFound,
}

impl AppRoute {
    /// Matches a location (query string and fragment ignored) against the route table.
    #[must_use]
    pub fn recognize(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments = trimmed
            .split('/')
            .skip(1)
            .collect::<Vec<_>>();

        match segments.as_slice() {
            [] | ["home"] => Self::Home,
            ["apps"] => Self::Apps,
            ["apps", id] if !id.is_empty() => Self::AppDetail {
                id: (*id).to_string(),
            },
            ["search"] => Self::Search,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["admin"] => Self::Admin,
            ["admin", "apps"] => Self::AdminApps,
            _ => Self::NotFound,
        }
    }

    /// Canonical path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Apps => "/apps".to_string(),
            Self::AppDetail { id } => format!("/apps/{id}"),
            Self::Search => "/search".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Admin => "/admin".to_string(),
            Self::AdminApps => "/admin/apps".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Whether the route only renders for an authenticated session.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Admin | Self::AdminApps)
    }
}

/// Outcome of guarding a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still booting: show a placeholder, do not redirect.
    Pending,
    /// Render the requested content.
    Allow,
    /// Send the user to `to`, remembering where they were headed.
    Redirect { to: AppRoute, from: String },
}

/// Gate for protected content.
///
/// `from` is the location the user asked for; it rides along on the redirect
/// so login can send them back.
#[must_use]
pub fn require_auth(session: &Session, from: &str) -> GuardDecision {
    match session.status() {
        SessionStatus::Booting => GuardDecision::Pending,
        SessionStatus::Authenticated => GuardDecision::Allow,
        SessionStatus::Anonymous => GuardDecision::Redirect {
            to: AppRoute::Login,
            from: from.to_string(),
        },
    }
}

/// Resolves a location against the route table and guards protected routes.
#[must_use]
pub fn guard(session: &Session, location: &str) -> GuardDecision {
    if AppRoute::recognize(location).requires_auth() {
        require_auth(session, location)
    } else {
        GuardDecision::Allow
    }
}

/// Where to go after a successful login.
///
/// Only local paths are honored, and never the auth pages themselves.
#[must_use]
pub fn post_login_destination(from: Option<&str>) -> String {
    match from {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !matches!(
                    AppRoute::recognize(path),
                    AppRoute::Login | AppRoute::Register
                ) =>
        {
            path.to_string()
        }
        _ => AppRoute::Home.path(),
    }
}
