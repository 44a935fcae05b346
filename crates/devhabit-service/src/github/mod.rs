//! GitHub integration: the REST client, encrypted token storage and the
//! service combining both.

mod client;
mod service;
mod token_service;

pub use client::*;
pub use service::*;
pub use token_service::*;
