//! Encryption of secrets stored at rest.

mod service;

pub use service::*;
