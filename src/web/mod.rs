//! Browser-facing routes. Every page goes through `TodoClient`, so session
//! credentials never leave the server.

mod error;
mod pages;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};

use crate::TodoClient;

pub use error::PageError;

pub const INDEX_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login/";

#[derive(Clone)]
pub struct AppState {
    client: Arc<TodoClient>,
}

impl AppState {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

/// Build the page router with an in-memory session store.
pub fn router(state: AppState, session_ttl: Duration) -> Router {
    let ttl_secs = i64::try_from(session_ttl.as_secs()).unwrap_or(i64::MAX);
    let inactivity = time::Duration::seconds(ttl_secs);
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(!cfg!(debug_assertions))
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(inactivity));

    Router::new()
        .route(INDEX_PATH, get(pages::index))
        .route("/profile/", get(pages::profile))
        .route("/add/", post(pages::add))
        .route("/update/{id}/", post(pages::update))
        .route("/delete/{id}/", post(pages::delete))
        .route(LOGIN_PATH, get(pages::login_page).post(pages::login))
        .route("/logout/", post(pages::logout))
        .with_state(state)
        .layer(sessions)
}
