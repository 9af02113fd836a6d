//! Token model: client credentials, scopes, CSRF state, and token signers.

pub mod credentials;
pub mod scope;
pub mod state;
pub mod token;

pub use credentials::*;
pub use scope::*;
pub use state::*;
pub use token::*;
