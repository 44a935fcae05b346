//! # DevHabit Repository
//!
//! Data access for DevHabit on PostgreSQL through SQLx.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn HabitRepository>   (repository interface)
//! PgHabitRepository               (SQLx implementation)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```
//!
//! With the `memory` feature, [`MemoryStore`] implements every repository
//! trait in process for tests of the service and REST layers.

pub mod pool;
pub mod postgres;
pub mod traits;

#[cfg(any(test, feature = "memory"))]
pub mod memory;

pub use pool::*;
pub use postgres::*;
pub use traits::*;

#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryStore;
