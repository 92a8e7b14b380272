//! read configuration from a file or the environment

use std::path::Path;
use std::time::Duration;

use reqwest::Url;

use crate::errors::Error;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Config {
    pub api_base: String,
    #[serde(default)]
    pub bind_addr: Option<String>,
    #[serde(default)]
    pub session_ttl_secs: Option<u64>,
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Config {
    /// Build a config from explicit values. Used by tests and embedders.
    pub fn from_values(
        api_base: impl Into<String>,
        bind_addr: Option<String>,
        session_ttl_secs: Option<u64>,
        http_timeout_secs: Option<u64>,
        user_agent: Option<String>,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            bind_addr,
            session_ttl_secs,
            http_timeout_secs,
            user_agent,
        }
    }

    /// Read a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// # ENV Vars
    /// * `TODO_API_BASE` - Base URL of the upstream API, e.g. `http://127.0.0.1:8000/api`
    /// * `TODO_BIND_ADDR` - Listen address for the front-end (default `127.0.0.1:3000`)
    /// * `TODO_SESSION_TTL_SECS` - Session inactivity expiry in seconds (default 7 days)
    /// * `TODO_HTTP_TIMEOUT_SECS` - Optional timeout for upstream calls
    /// * `TODO_USER_AGENT` - Optional user agent for upstream calls
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            api_base: std::env::var("TODO_API_BASE")
                .map_err(|_| Error::Config("Missing TODO_API_BASE env var".to_string()))?,
            bind_addr: std::env::var("TODO_BIND_ADDR").ok(),
            session_ttl_secs: parse_env_u64("TODO_SESSION_TTL_SECS")?,
            http_timeout_secs: parse_env_u64("TODO_HTTP_TIMEOUT_SECS")?,
            user_agent: std::env::var("TODO_USER_AGENT").ok(),
        })
    }

    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS))
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("todo-portal/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Validate `api_base` and derive the upstream endpoints from it.
    pub fn endpoints(&self) -> Result<Endpoints, Error> {
        Endpoints::new(&self.api_base)
    }
}

fn parse_env_u64(name: &str) -> Result<Option<u64>, Error> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("Invalid {name} '{raw}': {e}"))),
        Err(_) => Ok(None),
    }
}

/// Upstream URLs derived from the configured API base.
#[derive(Clone, Debug)]
pub struct Endpoints {
    api_base: Url,
}

impl Endpoints {
    pub fn new(api_base: &str) -> Result<Self, Error> {
        let normalized = format!("{}/", api_base.trim_end_matches('/'));
        let api_base = Url::parse(&normalized)
            .map_err(|e| Error::InvalidBaseUrl(format!("'{api_base}': {e}")))?;
        if api_base.cannot_be_a_base() {
            return Err(Error::InvalidBaseUrl(format!(
                "'{api_base}' cannot be used as a base"
            )));
        }
        Ok(Self { api_base })
    }

    /// `<base>/token/`
    pub fn token(&self) -> String {
        self.resource("token/")
    }

    /// `<base>/token/refresh/`
    pub fn token_refresh(&self) -> String {
        self.resource("token/refresh/")
    }

    /// Resolves a link returned by upstream, e.g. `/media/a.png`, against
    /// the API host. Absolute links come back unchanged.
    pub fn absolute_link(&self, link: &str) -> String {
        self.api_base
            .join(link)
            .map(String::from)
            .unwrap_or_else(|_| link.to_string())
    }

    /// Joins a relative resource path such as `todos/1/` onto the base.
    pub fn resource(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path.trim_start_matches('/'))
    }
}
