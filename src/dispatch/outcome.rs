use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{Level, event};

use crate::errors::Error;

use super::ApiMethod;

/// Status and body of a resource API response, passed through uninterpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamResponse {
    status: StatusCode,
    body: String,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub(crate) async fn read(resp: reqwest::Response) -> Result<Self, Error> {
        let status = resp.status();
        let body = resp.text().await?;
        Ok(Self { status, body })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Terminal classification of one logical API call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallOutcome {
    /// The caller checks the embedded status for business-level errors.
    Success(UpstreamResponse),
    /// No usable credentials remain; the user has to log in again.
    NeedsLogin,
    /// Reserved for responses the page cannot recover from. The current
    /// classification never produces it; callers still handle it.
    FatalError(UpstreamResponse),
}

impl CallOutcome {
    pub fn response(&self) -> Option<&UpstreamResponse> {
        match self {
            CallOutcome::Success(resp) | CallOutcome::FatalError(resp) => Some(resp),
            CallOutcome::NeedsLogin => None,
        }
    }

    pub fn needs_login(&self) -> bool {
        matches!(self, CallOutcome::NeedsLogin)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CallOutcome::Success(_) => "success",
            CallOutcome::NeedsLogin => "needs_login",
            CallOutcome::FatalError(_) => "fatal_error",
        }
    }

    pub(crate) fn log(&self, method: ApiMethod, url: &str, attempts: u8) {
        let status = self.response().map(|r| r.status().as_u16());
        event!(
            Level::INFO,
            method = %method,
            url,
            attempts,
            status = ?status,
            outcome = self.label(),
            "dispatch.outcome"
        );
    }
}

/// Classify the final (possibly retried) response of a call.
///
/// Known over-broad policy: a GET that does not come back 200 is reported as
/// `NeedsLogin` even when the cause is a data or server error such as a 500.
/// Mutating calls always come back as `Success` with their status attached.
pub fn classify(method: ApiMethod, response: UpstreamResponse) -> CallOutcome {
    if method.is_read_only() && response.status() != StatusCode::OK {
        return CallOutcome::NeedsLogin;
    }
    CallOutcome::Success(response)
}
