use reqwest::Client;

use crate::config::{Config, Endpoints};
use crate::errors::Error;

/// Shared context for outbound requests: one transport client and the upstream URLs.
#[derive(Clone, Debug)]
pub struct UpstreamContext {
    http_client: Client,
    endpoints: Endpoints,
}

impl UpstreamContext {
    pub fn new(http_client: Client, endpoints: Endpoints) -> Self {
        Self {
            http_client,
            endpoints,
        }
    }

    /// Build the transport from configuration. Timeouts live here and nowhere else.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let endpoints = config.endpoints()?;
        let mut builder = Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.http_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?, endpoints))
    }

    pub fn http_client(&self) -> &Client {
        &self.http_client
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}
