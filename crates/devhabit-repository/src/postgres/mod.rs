//! PostgreSQL implementations of the repository traits.

mod github_token_repository;
mod habit_repository;
mod habit_tag_repository;
mod identity_repository;
mod tag_repository;
mod user_repository;

pub use github_token_repository::PgGitHubAccessTokenRepository;
pub use habit_repository::PgHabitRepository;
pub use habit_tag_repository::PgHabitTagRepository;
pub use identity_repository::PgIdentityRepository;
pub use tag_repository::PgTagRepository;
pub use user_repository::PgUserRepository;
