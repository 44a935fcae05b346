//! # DevHabit Config
//!
//! Layered configuration: `config/default.toml`, an environment file,
//! `config/local.toml`, then `DEVHABIT__*` environment variables.
//! The merged result is validated before it is handed out.

mod app_config;
mod loader;
mod validation;

pub use app_config::*;
pub use loader::*;
pub use validation::*;
