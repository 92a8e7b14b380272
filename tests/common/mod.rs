#![allow(dead_code)]

use todo_portal::request_context::UpstreamContext;
use todo_portal::{AuthenticatedCaller, Config, TodoClient};
use wiremock::MockServer;

pub fn config(server: &MockServer) -> Config {
    Config::from_values(format!("{}/api", server.uri()), None, None, Some(5), None)
}

pub fn caller(server: &MockServer) -> AuthenticatedCaller {
    let context = UpstreamContext::from_config(&config(server)).expect("upstream context");
    AuthenticatedCaller::new(context)
}

pub fn client(server: &MockServer) -> TodoClient {
    TodoClient::from_config(&config(server)).expect("todo client")
}
