//! CLI subcommands.

pub mod admin;
pub mod catalog;
pub mod completion;
pub mod config;
pub mod session;

use std::sync::Arc;

use client::{AppStoreClient, FileTokenStore, SessionController, TokenStore};
use shared::config::Config;

/// Builds a client whose token lives in the configured token file.
pub fn connect(config: &Config) -> AppStoreClient {
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.resolved_token_path()));
    AppStoreClient::from_config(config, store)
}

/// Builds a session controller and restores any stored session.
pub async fn restore_session(config: &Config) -> anyhow::Result<SessionController> {
    let session = SessionController::new(connect(config));
    session.boot().await?;
    Ok(session)
}
