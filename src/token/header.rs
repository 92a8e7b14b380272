use std::fmt;

use reqwest::header::{AUTHORIZATION, HeaderName};

use crate::errors::Error;
use crate::session::{ACCESS_TOKEN_KEY, SessionStore};

/// `Authorization: Bearer <token>` built from the session's access token.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerHeader {
    value: String,
}

impl BearerHeader {
    pub fn for_token(token: &str) -> Self {
        Self {
            value: format!("Bearer {token}"),
        }
    }

    pub fn name(&self) -> HeaderName {
        AUTHORIZATION
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for BearerHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerHeader")
            .field("len", &self.value.len())
            .finish()
    }
}

/// Reads the access token and produces the bearer header, or `None` when the
/// user has to log in. Empty tokens count as absent.
pub async fn resolve_header<S>(session: &S) -> Result<Option<BearerHeader>, Error>
where
    S: SessionStore + ?Sized,
{
    let token = session.get(ACCESS_TOKEN_KEY).await?;
    Ok(token
        .filter(|t| !t.is_empty())
        .map(|t| BearerHeader::for_token(&t)))
}
