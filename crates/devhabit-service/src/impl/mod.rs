//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `habit_service.rs`),
//! the components here bind them to repositories for Shaku.

mod auth_service_impl;
mod habit_service_impl;
mod habit_tag_service_impl;
mod tag_service_impl;
mod user_service_impl;

pub use auth_service_impl::AuthServiceComponent;
pub use habit_service_impl::{HabitServiceComponent, HabitServiceComponentParameters};
pub use habit_tag_service_impl::HabitTagServiceComponent;
pub use tag_service_impl::{TagServiceComponent, TagServiceComponentParameters};
pub use user_service_impl::UserServiceComponent;
