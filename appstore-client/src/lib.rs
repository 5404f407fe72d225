#![cfg_attr(not(test), forbid(unsafe_code))]
//! App Store API client.
//!
//! - [`token_store`]: durable single-token storage that fails open.
//! - [`api`]: request building, bearer auth, and error normalization.
//! - [`session`]: boot, login, register, and logout over a shared session state.
//! - [`routes`]: the route table and the guard for protected routes.

pub mod api;
pub mod error;
pub mod models;
pub mod routes;
pub mod session;
pub mod token_store;

#[cfg(test)]
mod routes_test;

pub use api::{AppStoreClient, RequestOptions};
pub use error::{ClientError, SessionError};
pub use models::{Session, SessionStatus};
pub use routes::{AppRoute, GuardDecision, guard, post_login_destination, require_auth};
pub use session::SessionController;
#[cfg(target_arch = "wasm32")]
pub use token_store::LocalStorageTokenStore;
#[cfg(not(target_arch = "wasm32"))]
pub use token_store::FileTokenStore;
pub use token_store::{MemoryTokenStore, TOKEN_KEY, TokenStore};
