use reqwest::StatusCode;
use tracing::{info, warn};

use crate::errors::Error;
use crate::request_context::UpstreamContext;
use crate::session::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionStore, USERNAME_KEY};
use crate::types::TokenPairResponse;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    LoggedIn,
    /// Upstream refused the credentials, or answered 200 without both tokens.
    Rejected(StatusCode),
}

/// Obtains the initial token pair from `POST /token/`.
#[derive(Clone, Debug)]
pub struct TokenIssuer {
    context: UpstreamContext,
}

impl TokenIssuer {
    pub fn new(context: UpstreamContext) -> Self {
        Self { context }
    }

    /// The session is only written when both tokens come back.
    pub async fn login<S>(
        &self,
        session: &S,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, Error>
    where
        S: SessionStore + ?Sized,
    {
        let resp = self
            .context
            .http_client()
            .post(self.context.endpoints().token())
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "login rejected by token endpoint");
            return Ok(LoginOutcome::Rejected(status));
        }

        let tokens: TokenPairResponse = resp.json().await?;
        match (tokens.access, tokens.refresh) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                session.set(ACCESS_TOKEN_KEY, &access).await?;
                session.set(REFRESH_TOKEN_KEY, &refresh).await?;
                session.set(USERNAME_KEY, username).await?;
                info!(username, "login ok");
                Ok(LoginOutcome::LoggedIn)
            }
            _ => {
                warn!(username, "token endpoint answered 200 without a token pair");
                Ok(LoginOutcome::Rejected(status))
            }
        }
    }

    pub async fn logout<S>(&self, session: &S) -> Result<(), Error>
    where
        S: SessionStore + ?Sized,
    {
        session.clear_all().await?;
        info!("logout: session cleared");
        Ok(())
    }
}
