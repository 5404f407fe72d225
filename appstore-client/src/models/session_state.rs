use shared::models::UserProfile;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// The stored token has not been checked yet.
    Booting,
    /// No usable token, or the profile could not be resolved.
    Anonymous,
    /// A token is held and its profile resolved.
    Authenticated,
}

/// Observable session state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub booting: bool,
    /// Message from the last failed profile resolution, if any.
    pub error: Option<String>,
}

impl Session {
    /// Initial state: booting, seeded with whatever token is stored.
    #[must_use]
    pub fn booting(token: Option<String>) -> Self {
        Self {
            token,
            user: None,
            booting: true,
            error: None,
        }
    }

    /// A token without a resolved user does not count.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.booting {
            SessionStatus::Booting
        } else if self.is_authenticated() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }
}
