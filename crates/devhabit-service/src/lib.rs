//! # DevHabit Service
//!
//! Business logic service layer for DevHabit.
//! Contains the habit, tag, user, auth and GitHub use cases together with
//! the DTOs, sort mappings and JSON Patch support they rely on.

pub mod auth_service;
pub mod dto;
pub mod github;
pub mod habit_service;
pub mod habit_tag_service;
pub mod r#impl;
pub mod mappers;
pub mod patch;
pub mod seed;
pub mod sort_mappings;
pub mod tag_service;
pub mod user_context;
pub mod user_service;

pub use auth_service::*;
pub use dto::*;
pub use github::*;
pub use habit_service::*;
pub use habit_tag_service::*;
pub use r#impl::*;
pub use patch::{apply_patch, PatchDocument, PatchOperation};
pub use seed::DataSeeder;
pub use sort_mappings::sort_mapping_provider;
pub use tag_service::*;
pub use user_context::*;
pub use user_service::*;
