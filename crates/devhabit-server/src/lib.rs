//! # DevHabit Server Library
//!
//! Dependency injection wiring and startup helpers of the DevHabit server.

pub mod di;
pub mod startup;
