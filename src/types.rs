use serde::{Deserialize, Serialize};

/// Body of a successful `POST /token/`.
#[derive(Debug, Deserialize)]
pub struct TokenPairResponse {
    pub access: Option<String>,
    pub refresh: Option<String>,
}

/// Body of a successful `POST /token/refresh/`. The refresh token is not rotated.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub complete: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub profile_image: Option<String>,
    /// Filled from the session, not by upstream.
    pub username: Option<String>,
}
