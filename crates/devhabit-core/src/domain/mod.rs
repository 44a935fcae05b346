//! Domain entities of DevHabit.

pub mod github_access_token;
pub mod habit;
pub mod identity;
pub mod tag;
pub mod user;

pub use github_access_token::*;
pub use habit::*;
pub use identity::*;
pub use tag::*;
pub use user::*;
