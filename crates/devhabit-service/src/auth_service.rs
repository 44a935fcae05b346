//! Authentication service trait definition.

use crate::dto::{AccessTokens, LoginUserRequest, RefreshTokenRequest, RegisterUserRequest};
use async_trait::async_trait;
use devhabit_core::{DevHabitResult, Interface};

/// Authentication service trait.
#[async_trait]
pub trait AuthService: Interface + Send + Sync {
    /// Registers an identity with role Member and its application user.
    async fn register(&self, request: RegisterUserRequest) -> DevHabitResult<AccessTokens>;

    /// Authenticates by email and password.
    async fn login(&self, request: LoginUserRequest) -> DevHabitResult<AccessTokens>;

    /// Exchanges a refresh token for a new token pair.
    async fn refresh(&self, request: RefreshTokenRequest) -> DevHabitResult<AccessTokens>;
}
