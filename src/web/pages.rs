use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::debug;

use crate::client::ApiResult;
use crate::token::LoginOutcome;

use super::{AppState, INDEX_PATH, LOGIN_PATH, error::PageError};

const LOGIN_FORM: &str = r#"<!doctype html>
<html>
<head><title>Login</title></head>
<body>
<h2>Login</h2>
<form method="post" action="/login/">
<label>Username <input type="text" name="username" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Login</button>
</form>
"#;

const LOGIN_ERROR: &str = "<p class=\"error\">Invalid username or password</p>\n";

#[derive(Debug, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn login_redirect() -> Response {
    Redirect::to(LOGIN_PATH).into_response()
}

fn index_redirect() -> Response {
    Redirect::to(INDEX_PATH).into_response()
}

fn render<T: serde::Serialize>(result: ApiResult<T>) -> Result<Response, PageError> {
    match result {
        ApiResult::Done(value) => Ok(Json(value).into_response()),
        ApiResult::NeedsLogin => Ok(login_redirect()),
        ApiResult::Fatal(resp) => Err(PageError::Upstream(resp.status())),
    }
}

/// Mutations land back on the listing whatever the business status was.
fn after_mutation(result: ApiResult<StatusCode>) -> Result<Response, PageError> {
    match result {
        ApiResult::Done(_) => Ok(index_redirect()),
        ApiResult::NeedsLogin => Ok(login_redirect()),
        ApiResult::Fatal(resp) => Err(PageError::Upstream(resp.status())),
    }
}

pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, PageError> {
    render(state.client.list_todos(&session).await?)
}

pub async fn profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, PageError> {
    render(state.client.profile(&session).await?)
}

pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddForm>,
) -> Result<Response, PageError> {
    let title = form.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        debug!("add: blank title ignored");
        return Ok(index_redirect());
    }
    after_mutation(state.client.add_todo(&session, title).await?)
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<u64>,
) -> Result<Response, PageError> {
    after_mutation(state.client.set_complete(&session, id, true).await?)
}

pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<u64>,
) -> Result<Response, PageError> {
    after_mutation(state.client.delete_todo(&session, id).await?)
}

pub async fn login_page() -> Html<String> {
    Html(format!("{LOGIN_FORM}</body>\n</html>\n"))
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    match state
        .client
        .login(&session, &form.username, &form.password)
        .await?
    {
        LoginOutcome::LoggedIn => {
            session.cycle_id().await.map_err(crate::Error::from)?;
            Ok(index_redirect())
        }
        LoginOutcome::Rejected(_) => Ok((
            StatusCode::UNAUTHORIZED,
            Html(format!(
                "{LOGIN_FORM}{LOGIN_ERROR}</body>\n</html>\n"
            )),
        )
            .into_response()),
    }
}

pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, PageError> {
    state.client.logout(&session).await?;
    Ok(login_redirect())
}
