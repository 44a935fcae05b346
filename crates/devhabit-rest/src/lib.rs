//! # DevHabit REST
//!
//! HTTP surface of DevHabit built on Axum. Handlers negotiate the vendor
//! media type, shape their DTOs down to the requested fields and attach
//! hypermedia links when the client asks for them. Failures are rendered as
//! RFC 7807 problem details.

pub mod controllers;
pub mod extractors;
pub mod links;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
