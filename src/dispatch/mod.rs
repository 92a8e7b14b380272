mod caller;
mod outcome;
mod request;

pub use caller::AuthenticatedCaller;
pub use outcome::{CallOutcome, UpstreamResponse, classify};
pub use request::{ApiMethod, RequestBody, RequestOptions};
