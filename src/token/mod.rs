mod header;
mod issuer;
mod refresher;

pub use header::{BearerHeader, resolve_header};
pub use issuer::{LoginOutcome, TokenIssuer};
pub use refresher::CredentialRefresher;
