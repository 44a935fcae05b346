//! REST API controllers.

pub mod auth_controller;
pub mod github_controller;
pub mod habit_tags_controller;
pub mod habits_controller;
pub mod health_controller;
pub mod tags_controller;
pub mod users_controller;

pub use health_controller::*;

use devhabit_core::{DevHabitResult, LinkDto, ShapedEntry, LINKS_KEY};

/// Embeds `links` into a shaped entry.
pub(crate) fn attach_links(entry: &mut ShapedEntry, links: Vec<LinkDto>) -> DevHabitResult<()> {
    entry.insert(LINKS_KEY.to_string(), serde_json::to_value(links)?);
    Ok(())
}
