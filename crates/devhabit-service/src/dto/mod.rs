//! Data Transfer Objects (DTOs).

mod auth_dto;
mod github_dto;
mod habit_dto;
mod habit_tag_dto;
mod query;
mod tag_dto;
mod user_dto;

pub use auth_dto::*;
pub use github_dto::*;
pub use habit_dto::*;
pub use habit_tag_dto::*;
pub use query::*;
pub use tag_dto::*;
pub use user_dto::*;
