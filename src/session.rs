//! Per-user session storage for the upstream credentials.
//!
//! The session is the only place the access and refresh tokens live. It is
//! passed explicitly into every call; nothing in this crate keeps a global
//! handle to it.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::Error;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USERNAME_KEY: &str = "username";

/// Key/value store scoped to one end-user.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Drops every key, not only the credentials.
    async fn clear_all(&self) -> Result<(), Error>;
}

/// In-process session, one instance per user.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: Mutex::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.values.lock().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySession {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), Error> {
        self.values.lock().await.clear();
        Ok(())
    }
}

#[async_trait]
impl SessionStore for tower_sessions::Session {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(tower_sessions::Session::get::<String>(self, key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.insert(key, value).await?;
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), Error> {
        // flush deletes the stored record and drops the session id.
        self.flush().await?;
        Ok(())
    }
}
