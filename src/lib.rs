//! Server-side front-end for the todo REST API.
//!
//! The browser never sees the upstream tokens: they live in the user's
//! session, and every resource call goes through [`AuthenticatedCaller`],
//! which attaches the bearer header, refreshes once on a 401 and reports a
//! [`CallOutcome`].

mod client;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod request_context;
pub mod session;
pub mod telemetry;
pub mod token;
pub mod types;
pub mod web;

pub use client::{ApiResult, TodoClient};
pub use config::Config;
pub use dispatch::{AuthenticatedCaller, CallOutcome, UpstreamResponse};
pub use errors::Error;
