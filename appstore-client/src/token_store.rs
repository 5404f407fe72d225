//! Access token persistence.
//!
//! A store holds at most one opaque bearer token. Every implementation fails
//! open: storage errors are logged and read back as "no token", which leaves
//! the client logged out instead of crashing it.

use std::fmt;
use std::sync::Mutex;

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, io, path::PathBuf};

/// Key the token is stored under in browser storage.
pub const TOKEN_KEY: &str = "appstore_token";

/// Durable single-slot storage for the access token.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Returns the stored token, or `None` if absent or unreadable.
    fn get(&self) -> Option<String>;

    /// Persists `token`. `None` or an empty string clears the store.
    fn set(&self, token: Option<&str>);

    /// Removes any stored token.
    fn clear(&self) {
        self.set(None);
    }
}

/// In-process token slot.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.set(Some(token));
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }

    fn set(&self, token: Option<&str>) {
        if let Ok(mut guard) = self.slot.lock() {
            *guard = token.filter(|value| !value.is_empty()).map(str::to_string);
        }
    }
}

/// Token kept in a single file, readable only by the owner on Unix.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileTokenStore {
    /// Store backed by `path`. Nothing is touched until the first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn write(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.as_bytes())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => (!contents.is_empty()).then_some(contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "token file unreadable");
                None
            }
        }
    }

    fn set(&self, token: Option<&str>) {
        let result = match token.filter(|value| !value.is_empty()) {
            Some(token) => self.write(token),
            None => self.remove(),
        };
        if let Err(err) = result {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to update token file");
        }
    }
}

/// Token kept in the browser's `localStorage` under [`TOKEN_KEY`].
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageTokenStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageTokenStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl TokenStore for LocalStorageTokenStore {
    fn get(&self) -> Option<String> {
        Self::storage()?
            .get_item(TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn set(&self, token: Option<&str>) {
        let Some(storage) = Self::storage() else {
            return;
        };
        let result = match token.filter(|value| !value.is_empty()) {
            Some(token) => storage.set_item(TOKEN_KEY, token),
            None => storage.remove_item(TOKEN_KEY),
        };
        if result.is_err() {
            tracing::warn!("failed to update token in local storage");
        }
    }
}
