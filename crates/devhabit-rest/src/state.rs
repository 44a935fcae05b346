//! Application state for Axum handlers.

use crate::links::LinkService;
use devhabit_core::DataShapingService;
use devhabit_repository::DatabasePoolInterface;
use devhabit_security::TokenProviderInterface;
use devhabit_service::{
    AuthService, GitHubAccessTokenService, GitHubService, HabitService, HabitTagService, TagService, UserContext,
    UserService,
};
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub habit_service: Arc<dyn HabitService>,
    pub tag_service: Arc<dyn TagService>,
    pub habit_tag_service: Arc<dyn HabitTagService>,
    pub user_service: Arc<dyn UserService>,
    pub auth_service: Arc<dyn AuthService>,
    pub github_service: Arc<dyn GitHubService>,
    pub github_token_service: Arc<dyn GitHubAccessTokenService>,
    pub user_context: Arc<dyn UserContext>,
    pub token_provider: Arc<dyn TokenProviderInterface>,
    pub links: Arc<LinkService>,
    pub data_shaping: DataShapingService,
    /// Pinged by the readiness check, absent when running without a database.
    pub database: Option<Arc<dyn DatabasePoolInterface>>,
}

impl AppState {
    /// Resolves every service from a Shaku module.
    pub fn from_module<M>(module: &M, links: LinkService) -> Self
    where
        M: Module
            + HasComponent<dyn HabitService>
            + HasComponent<dyn TagService>
            + HasComponent<dyn HabitTagService>
            + HasComponent<dyn UserService>
            + HasComponent<dyn AuthService>
            + HasComponent<dyn GitHubService>
            + HasComponent<dyn GitHubAccessTokenService>
            + HasComponent<dyn UserContext>
            + HasComponent<dyn TokenProviderInterface>
            + HasComponent<dyn DatabasePoolInterface>,
    {
        Self {
            habit_service: module.resolve(),
            tag_service: module.resolve(),
            habit_tag_service: module.resolve(),
            user_service: module.resolve(),
            auth_service: module.resolve(),
            github_service: module.resolve(),
            github_token_service: module.resolve(),
            user_context: module.resolve(),
            token_provider: module.resolve(),
            links: Arc::new(links),
            data_shaping: DataShapingService::new(),
            database: Some(module.resolve()),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("links", &self.links)
            .field("database", &self.database.is_some())
            .finish_non_exhaustive()
    }
}
