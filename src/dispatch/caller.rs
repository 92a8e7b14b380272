use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::errors::Error;
use crate::request_context::UpstreamContext;
use crate::session::SessionStore;
use crate::token::{BearerHeader, CredentialRefresher, resolve_header};

use super::{ApiMethod, CallOutcome, RequestOptions, UpstreamResponse, classify};

/// Attaches the session's bearer credentials to resource API calls, refreshes
/// them once on a 401 and classifies the result.
#[derive(Clone, Debug)]
pub struct AuthenticatedCaller {
    context: UpstreamContext,
    refresher: CredentialRefresher,
}

impl AuthenticatedCaller {
    pub fn new(context: UpstreamContext) -> Self {
        let refresher = CredentialRefresher::new(context.clone());
        Self { context, refresher }
    }

    pub fn context(&self) -> &UpstreamContext {
        &self.context
    }

    /// Run one logical call. At most two requests reach the resource API.
    ///
    /// Authentication problems come back as `CallOutcome::NeedsLogin`; only
    /// transport and session store failures are returned as errors.
    pub async fn call<S>(
        &self,
        session: &S,
        method: ApiMethod,
        url: &str,
        options: &RequestOptions,
    ) -> Result<CallOutcome, Error>
    where
        S: SessionStore + ?Sized,
    {
        let Some(header) = resolve_header(session).await? else {
            debug!(method = %method, url, "dispatch.skipped: no access token");
            let outcome = CallOutcome::NeedsLogin;
            outcome.log(method, url, 0);
            return Ok(outcome);
        };

        let mut attempts: u8 = 1;
        let mut response = self.dispatch(method, url, options, &header).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(method = %method, url, status = 401, "dispatch.unauthorized");
            if !self.refresher.refresh(session).await? {
                let outcome = CallOutcome::NeedsLogin;
                outcome.log(method, url, attempts);
                return Ok(outcome);
            }
            let Some(header) = resolve_header(session).await? else {
                let outcome = CallOutcome::NeedsLogin;
                outcome.log(method, url, attempts);
                return Ok(outcome);
            };
            attempts += 1;
            response = self.dispatch(method, url, options, &header).await?;
        }

        let outcome = classify(method, response);
        outcome.log(method, url, attempts);
        Ok(outcome)
    }

    async fn dispatch(
        &self,
        method: ApiMethod,
        url: &str,
        options: &RequestOptions,
        header: &BearerHeader,
    ) -> Result<UpstreamResponse, Error> {
        let builder = self
            .context
            .http_client()
            .request(method.as_method(), url)
            .header(header.name(), header.value());
        let resp = options.apply(builder).send().await?;
        debug!(method = %method, url, status = resp.status().as_u16(), "dispatch.attempt");
        UpstreamResponse::read(resp).await
    }
}
