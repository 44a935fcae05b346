//! # DevHabit Core
//!
//! Core types and error definitions shared by every DevHabit crate, plus the
//! generic query shaping pipeline: sort mappings, data shaping, link
//! descriptors and the pagination envelope.

pub mod domain;
pub mod error;
pub mod id;
pub mod links;
pub mod pagination;
pub mod result;
pub mod shaping;
pub mod sorting;
pub mod telemetry;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use links::*;
pub use pagination::*;
pub use result::*;
pub use shaping::*;
pub use sorting::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
