//! Session bootstrap and authentication actions.
//!
//! [`SessionController`] owns the in-memory [`Session`] and is the only writer
//! of the token store during login, registration, and logout. Observers get
//! whole snapshots through a `watch` channel, so token and user always change
//! together.
//!
//! Boot, login, register, and profile refresh share one in-flight slot: a
//! second call while one is outstanding fails with [`SessionError::Busy`].
//! `logout` never waits; it bumps an epoch and any outstanding operation that
//! started before it discards its result.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use shared::models::{AuthResponse, LoginRequest, RegisterRequest};
use tokio::sync::{Mutex, MutexGuard, watch};

use crate::api::AppStoreClient;
use crate::error::{ClientError, SessionError};
use crate::models::{Session, SessionStatus};

const LOGIN_WITHOUT_TOKEN: &str = "Login succeeded but no token was returned by the API.";
const REGISTER_WITHOUT_TOKEN: &str =
    "Registration succeeded but no token was returned by the API.";

/// Owns session state and the actions that change it.
#[derive(Debug)]
pub struct SessionController {
    client: AppStoreClient,
    state: watch::Sender<Session>,
    in_flight: Mutex<()>,
    booted: AtomicBool,
    epoch: AtomicU64,
}

impl SessionController {
    /// Creates a controller in the `Booting` state, seeded from the token store.
    pub fn new(client: AppStoreClient) -> Self {
        let initial = Session::booting(client.tokens().get());
        let (state, _) = watch::channel(initial);
        Self {
            client,
            state,
            in_flight: Mutex::new(()),
            booted: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn client(&self) -> &AppStoreClient {
        &self.client
    }

    /// Current session state.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Validates any stored token by fetching the current user. Runs once.
    ///
    /// A rejected token is cleared and the failure recorded in
    /// [`Session::error`]; it is not returned, since a stale token simply
    /// means the user is logged out.
    ///
    /// # Errors
    /// [`SessionError::Busy`] while another session operation runs and
    /// [`SessionError::AlreadyBooted`] on every call after the first.
    pub async fn boot(&self) -> Result<SessionStatus, SessionError> {
        let _slot = self.acquire()?;
        if self.booted.swap(true, Ordering::SeqCst) {
            return Err(SessionError::AlreadyBooted);
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        if let Err(err) = self.resolve_user(epoch).await {
            tracing::debug!(error = %err, "session restore ended logged out");
        }
        self.state.send_modify(|session| session.booting = false);

        let status = self.status();
        tracing::info!(?status, "session boot complete");
        Ok(status)
    }

    /// Logs in and resolves the user behind the issued token.
    ///
    /// # Errors
    /// Backend failures and a response without a token leave the session as it
    /// was. A failing profile fetch after the token is stored resets the session
    /// to anonymous and is returned as well.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<(), SessionError> {
        let _slot = self.acquire()?;
        let epoch = self.epoch.load(Ordering::SeqCst);
        let response = self.client.login(credentials).await?;
        let token = issued_token(response, LOGIN_WITHOUT_TOKEN)?;
        self.adopt_token(epoch, token).await
    }

    /// Registers a new account and signs in with the issued token.
    ///
    /// # Errors
    /// Same contract as [`SessionController::login`].
    pub async fn register(&self, registration: &RegisterRequest) -> Result<(), SessionError> {
        let _slot = self.acquire()?;
        let epoch = self.epoch.load(Ordering::SeqCst);
        let response = self.client.register(registration).await?;
        let token = issued_token(response, REGISTER_WITHOUT_TOKEN)?;
        self.adopt_token(epoch, token).await
    }

    /// Re-fetches the current user with the stored token.
    ///
    /// # Errors
    /// [`SessionError::Busy`] while another operation runs; otherwise the
    /// profile fetch failure, after the session has been reset.
    pub async fn refresh_profile(&self) -> Result<(), SessionError> {
        let _slot = self.acquire()?;
        let epoch = self.epoch.load(Ordering::SeqCst);
        self.resolve_user(epoch).await
    }

    /// Clears the token and user. Always succeeds and is idempotent.
    pub fn logout(&self) {
        self.state.send_modify(|session| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            self.client.tokens().clear();
            session.token = None;
            session.user = None;
            session.error = None;
        });
        tracing::info!("logged out");
    }

    fn acquire(&self) -> Result<MutexGuard<'_, ()>, SessionError> {
        self.in_flight.try_lock().map_err(|_| SessionError::Busy)
    }

    async fn adopt_token(&self, epoch: u64, token: String) -> Result<(), SessionError> {
        let adopted = self.commit(epoch, |session| {
            self.client.tokens().set(Some(&token));
            session.token = Some(token.clone());
            session.error = None;
            session.booting = false;
        });
        if !adopted {
            return Err(SessionError::Cancelled);
        }
        self.resolve_user(epoch).await
    }

    /// Fetches the profile for the stored token, failing closed.
    async fn resolve_user(&self, epoch: u64) -> Result<(), SessionError> {
        self.commit(epoch, |session| session.error = None);

        let Some(token) = self.client.tokens().get() else {
            self.commit(epoch, |session| {
                session.token = None;
                session.user = None;
            });
            return Ok(());
        };

        match self.client.me().await {
            Ok(user) => {
                let label = user.label().to_string();
                if self.commit(epoch, |session| {
                    session.token = Some(token);
                    session.user = Some(user);
                }) {
                    tracing::info!(user = %label, "session authenticated");
                    Ok(())
                } else {
                    Err(SessionError::Cancelled)
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored token rejected; clearing session");
                let message = err.to_string();
                let reset = self.commit(epoch, |session| {
                    self.client.tokens().clear();
                    session.token = None;
                    session.user = None;
                    session.error = Some(message);
                });
                if reset {
                    Err(err.into())
                } else {
                    Err(SessionError::Cancelled)
                }
            }
        }
    }

    /// Applies `apply` only if no logout happened since `epoch` was read.
    fn commit(&self, epoch: u64, apply: impl FnOnce(&mut Session)) -> bool {
        let applied = self.state.send_if_modified(|session| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            apply(session);
            true
        });
        if !applied {
            tracing::debug!("discarding session update superseded by logout");
        }
        applied
    }
}

fn issued_token(response: AuthResponse, diagnostic: &str) -> Result<String, ClientError> {
    response
        .into_token()
        .ok_or_else(|| ClientError::Contract(diagnostic.to_string()))
}
