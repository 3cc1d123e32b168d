use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::warn;

use crate::errors::AppError;

pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Where the bearer token lives between requests. Absent token means logged out.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str) -> Result<(), AppError>;

    fn clear(&self);

    fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set(&self, token: &str) -> Result<(), AppError> {
        *self.token.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        *self.token.write() = None;
    }
}

/// JSON key/value file with the token under `auth_token`, so a restart keeps the session.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl FileTokenStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = read_entries(&path)
            .ok()
            .and_then(|mut entries| entries.remove(AUTH_TOKEN_KEY));
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    fn write_token(&self, token: Option<&str>) -> Result<(), AppError> {
        let mut entries = match read_entries(&self.path) {
            Ok(entries) => entries,
            Err(_) if !self.path.exists() => HashMap::new(),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Token file unreadable, its other entries will be overwritten"
                );
                HashMap::new()
            }
        };
        match token {
            Some(t) => {
                entries.insert(AUTH_TOKEN_KEY.to_string(), t.to_string());
            }
            None => {
                entries.remove(AUTH_TOKEN_KEY);
            }
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(&entries)?)?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<HashMap<String, String>, AppError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        self.cached.read().clone()
    }

    fn set(&self, token: &str) -> Result<(), AppError> {
        self.write_token(Some(token))?;
        *self.cached.write() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        *self.cached.write() = None;
        if let Err(e) = self.write_token(None) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove stored token");
        }
    }
}
