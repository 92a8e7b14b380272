use std::time::SystemTime;

use reqwest::StatusCode;
use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    /// No refresh token in the session; nothing was sent.
    Skipped,
    /// Upstream refused the refresh token; the session was cleared.
    Rejected,
}

#[derive(Clone, Debug)]
pub struct RefreshTelemetry {
    attempt_id: Uuid,
    context: String,
}

impl RefreshTelemetry {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            context: context.into(),
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn emit_start(&self, at: SystemTime) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = ?at,
            "refresh.start"
        );
    }

    pub fn emit_skipped(&self) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            outcome = ?RefreshOutcome::Skipped,
            "refresh.skipped"
        );
    }

    pub fn emit_success(&self, at: SystemTime) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = ?at,
            outcome = ?RefreshOutcome::Refreshed,
            "refresh.success"
        );
    }

    pub fn emit_rejected(&self, status: StatusCode, at: SystemTime) {
        event!(
            Level::WARN,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = ?at,
            status = status.as_u16(),
            outcome = ?RefreshOutcome::Rejected,
            "refresh.rejected"
        );
    }

    pub fn emit_failure(&self, error: &Error, at: SystemTime) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            context = %self.context,
            timestamp = ?at,
            error = %error,
            "refresh.failure"
        );
    }
}
