//! HTTP middleware.

mod auth;
mod logging;
mod problem;

pub use auth::*;
pub use logging::*;
pub use problem::*;
