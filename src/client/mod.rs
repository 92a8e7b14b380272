mod impls;

use crate::dispatch::{AuthenticatedCaller, UpstreamResponse};
use crate::token::TokenIssuer;

/// Typed access to the todo resource API on behalf of one session at a time.
#[derive(Clone, Debug)]
pub struct TodoClient {
    caller: AuthenticatedCaller,
    issuer: TokenIssuer,
}

/// What a page handler gets back from a typed operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiResult<T> {
    Done(T),
    NeedsLogin,
    Fatal(UpstreamResponse),
}
