use std::time::SystemTime;

use reqwest::StatusCode;
use tracing::warn;

use crate::errors::Error;
use crate::request_context::UpstreamContext;
use crate::session::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionStore};
use crate::telemetry::refresh::RefreshTelemetry;
use crate::types::RefreshResponse;

/// Exchanges the session's refresh token for a new access token.
#[derive(Clone, Debug)]
pub struct CredentialRefresher {
    context: UpstreamContext,
}

impl CredentialRefresher {
    pub fn new(context: UpstreamContext) -> Self {
        Self { context }
    }

    /// Returns `true` once a new access token is stored.
    ///
    /// Returns `false` without a network call when there is no refresh token.
    /// Any non-200 answer from the token endpoint clears the whole session
    /// before returning `false`. The refresh token itself is never rotated.
    pub async fn refresh<S>(&self, session: &S) -> Result<bool, Error>
    where
        S: SessionStore + ?Sized,
    {
        let telemetry = RefreshTelemetry::new("credential_refresh");
        let Some(refresh_token) = session
            .get(REFRESH_TOKEN_KEY)
            .await?
            .filter(|t| !t.is_empty())
        else {
            telemetry.emit_skipped();
            return Ok(false);
        };

        telemetry.emit_start(SystemTime::now());
        let sent = self
            .context
            .http_client()
            .post(self.context.endpoints().token_refresh())
            .form(&[("refresh", refresh_token.as_str())])
            .send()
            .await;
        let resp = match sent {
            Ok(resp) => resp,
            Err(err) => {
                let err = Error::from(err);
                telemetry.emit_failure(&err, SystemTime::now());
                return Err(err);
            }
        };

        let status = resp.status();
        if status == StatusCode::OK {
            let body = resp.text().await?;
            match serde_json::from_str::<RefreshResponse>(&body) {
                Ok(RefreshResponse {
                    access: Some(access),
                }) if !access.is_empty() => {
                    session.set(ACCESS_TOKEN_KEY, &access).await?;
                    telemetry.emit_success(SystemTime::now());
                    return Ok(true);
                }
                Ok(_) => warn!("refresh response carried no access token"),
                Err(err) => warn!(error = %err, "refresh response body could not be decoded"),
            }
        }

        session.clear_all().await?;
        telemetry.emit_rejected(status, SystemTime::now());
        Ok(false)
    }
}
