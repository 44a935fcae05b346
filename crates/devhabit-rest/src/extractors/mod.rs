//! Custom Axum extractors.

mod claims;
mod links;
mod media_type;
mod validated;

pub use claims::*;
pub use links::*;
pub use media_type::*;
pub use validated::*;
