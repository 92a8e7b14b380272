use reqwest::StatusCode;
use tracing::{info, warn};

use crate::{
    TodoClient,
    client::ApiResult,
    config::Config,
    dispatch::{ApiMethod, AuthenticatedCaller, CallOutcome, RequestOptions, UpstreamResponse},
    errors::Error,
    request_context::UpstreamContext,
    session::{SessionStore, USERNAME_KEY},
    token::{LoginOutcome, TokenIssuer},
    types::{Profile, Todo},
};

impl TodoClient {
    pub fn new(context: UpstreamContext) -> Self {
        Self {
            caller: AuthenticatedCaller::new(context.clone()),
            issuer: TokenIssuer::new(context),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Ok(Self::new(UpstreamContext::from_config(config)?))
    }

    pub async fn login<S>(
        &self,
        session: &S,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, Error>
    where
        S: SessionStore + ?Sized,
    {
        self.issuer.login(session, username, password).await
    }

    pub async fn logout<S>(&self, session: &S) -> Result<(), Error>
    where
        S: SessionStore + ?Sized,
    {
        self.issuer.logout(session).await
    }

    pub async fn list_todos<S>(&self, session: &S) -> Result<ApiResult<Vec<Todo>>, Error>
    where
        S: SessionStore + ?Sized,
    {
        let outcome = self
            .call(session, ApiMethod::Get, "todos/", RequestOptions::new())
            .await?;
        decode(outcome)
    }

    pub async fn profile<S>(&self, session: &S) -> Result<ApiResult<Profile>, Error>
    where
        S: SessionStore + ?Sized,
    {
        let outcome = self
            .call(session, ApiMethod::Get, "profile/", RequestOptions::new())
            .await?;
        let mut profile: Profile = match decode(outcome)? {
            ApiResult::Done(profile) => profile,
            ApiResult::NeedsLogin => return Ok(ApiResult::NeedsLogin),
            ApiResult::Fatal(resp) => return Ok(ApiResult::Fatal(resp)),
        };
        let endpoints = self.caller.context().endpoints();
        profile.profile_image = profile
            .profile_image
            .filter(|link| !link.is_empty())
            .map(|link| endpoints.absolute_link(&link));
        profile.username = session.get(USERNAME_KEY).await?;
        Ok(ApiResult::Done(profile))
    }

    /// POST expects 200 or 201.
    pub async fn add_todo<S>(
        &self,
        session: &S,
        title: &str,
    ) -> Result<ApiResult<StatusCode>, Error>
    where
        S: SessionStore + ?Sized,
    {
        let options = RequestOptions::new().form([("title", title)]);
        let outcome = self
            .call(session, ApiMethod::Post, "todos/", options)
            .await?;
        Ok(report(
            outcome,
            "add todo",
            &[StatusCode::OK, StatusCode::CREATED],
        ))
    }

    /// PATCH expects 200 or 204.
    pub async fn set_complete<S>(
        &self,
        session: &S,
        id: u64,
        complete: bool,
    ) -> Result<ApiResult<StatusCode>, Error>
    where
        S: SessionStore + ?Sized,
    {
        let options = RequestOptions::new().form([("complete", complete.to_string())]);
        let outcome = self
            .call(session, ApiMethod::Patch, &format!("todos/{id}/"), options)
            .await?;
        Ok(report(
            outcome,
            "update todo",
            &[StatusCode::OK, StatusCode::NO_CONTENT],
        ))
    }

    /// DELETE expects 200 or 204.
    pub async fn delete_todo<S>(
        &self,
        session: &S,
        id: u64,
    ) -> Result<ApiResult<StatusCode>, Error>
    where
        S: SessionStore + ?Sized,
    {
        let outcome = self
            .call(
                session,
                ApiMethod::Delete,
                &format!("todos/{id}/"),
                RequestOptions::new(),
            )
            .await?;
        Ok(report(
            outcome,
            "delete todo",
            &[StatusCode::OK, StatusCode::NO_CONTENT],
        ))
    }

    async fn call<S>(
        &self,
        session: &S,
        method: ApiMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<CallOutcome, Error>
    where
        S: SessionStore + ?Sized,
    {
        let url = self.caller.context().endpoints().resource(path);
        self.caller.call(session, method, &url, &options).await
    }
}

fn decode<T: serde::de::DeserializeOwned>(outcome: CallOutcome) -> Result<ApiResult<T>, Error> {
    match outcome {
        CallOutcome::Success(resp) => Ok(ApiResult::Done(resp.json()?)),
        CallOutcome::NeedsLogin => Ok(ApiResult::NeedsLogin),
        CallOutcome::FatalError(resp) => Ok(ApiResult::Fatal(resp)),
    }
}

/// Mutations are fail-soft: an unexpected status is logged and handed back.
fn report(outcome: CallOutcome, action: &str, expected: &[StatusCode]) -> ApiResult<StatusCode> {
    match outcome {
        CallOutcome::Success(resp) => {
            log_status(&resp, action, expected);
            ApiResult::Done(resp.status())
        }
        CallOutcome::NeedsLogin => ApiResult::NeedsLogin,
        CallOutcome::FatalError(resp) => ApiResult::Fatal(resp),
    }
}

fn log_status(resp: &UpstreamResponse, action: &str, expected: &[StatusCode]) {
    if expected.contains(&resp.status()) {
        info!(action, status = resp.status().as_u16(), "{action} ok");
    } else {
        warn!(
            action,
            status = resp.status().as_u16(),
            body = %resp.body(),
            "{action} failed upstream"
        );
    }
}
