//! Authentication service implementation.

use crate::auth_service::AuthService;
use crate::dto::{AccessTokens, LoginUserRequest, RefreshTokenRequest, RegisterUserRequest};
use async_trait::async_trait;
use devhabit_core::{DevHabitError, DevHabitResult, IdentityUser, RefreshToken, Role, User, ValidateExt};
use devhabit_repository::IdentityRepository;
use devhabit_security::{PasswordHasherInterface, TokenProviderInterface, TokenRequest};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Authentication service component for Shaku DI.
#[derive(Component)]
#[shaku(interface = AuthService)]
pub struct AuthServiceComponent {
    #[shaku(inject)]
    identity_repository: Arc<dyn IdentityRepository>,
    #[shaku(inject)]
    password_hasher: Arc<dyn PasswordHasherInterface>,
    #[shaku(inject)]
    token_provider: Arc<dyn TokenProviderInterface>,
}

impl AuthServiceComponent {
    #[must_use]
    pub fn new(
        identity_repository: Arc<dyn IdentityRepository>,
        password_hasher: Arc<dyn PasswordHasherInterface>,
        token_provider: Arc<dyn TokenProviderInterface>,
    ) -> Self {
        Self {
            identity_repository,
            password_hasher,
            token_provider,
        }
    }

    fn issue(&self, identity: &IdentityUser) -> DevHabitResult<AccessTokens> {
        self.token_provider.create(&TokenRequest {
            identity_id: identity.id.clone(),
            email: identity.email.clone(),
            roles: identity.role_names(),
        })
    }
}

#[async_trait]
impl AuthService for AuthServiceComponent {
    async fn register(&self, request: RegisterUserRequest) -> DevHabitResult<AccessTokens> {
        debug!("Registering identity: {}", request.email);

        request.validate_request()?;

        if self.identity_repository.find_by_email(&request.email).await?.is_some() {
            return Err(DevHabitError::Conflict(format!(
                "Email '{}' is already registered",
                request.email
            )));
        }

        let password_hash = self.password_hasher.hash(&request.password)?;
        let identity = IdentityUser::new(request.email.clone(), password_hash, vec![Role::Member]);
        let user = User::new(request.name, request.email, identity.id.clone());

        let tokens = self.issue(&identity)?;
        let refresh_token = RefreshToken::new(
            identity.id.clone(),
            tokens.refresh_token.clone(),
            self.token_provider.refresh_token_lifetime_days(),
        );

        self.identity_repository
            .register(&identity, &user, Some(&refresh_token))
            .await?;

        info!("User registered: {}", user.id);
        Ok(tokens)
    }

    async fn login(&self, request: LoginUserRequest) -> DevHabitResult<AccessTokens> {
        debug!("Login attempt: {}", request.email);

        let Some(identity) = self.identity_repository.find_by_email(&request.email).await? else {
            warn!("Login failed, unknown email");
            return Err(DevHabitError::InvalidCredentials);
        };

        if !self.password_hasher.verify(&request.password, &identity.password_hash)? {
            warn!("Login failed, wrong password for identity {}", identity.id);
            return Err(DevHabitError::InvalidCredentials);
        }

        let tokens = self.issue(&identity)?;
        let refresh_token = RefreshToken::new(
            identity.id.clone(),
            tokens.refresh_token.clone(),
            self.token_provider.refresh_token_lifetime_days(),
        );
        self.identity_repository.save_refresh_token(&refresh_token).await?;

        info!("Identity logged in: {}", identity.id);
        Ok(tokens)
    }

    async fn refresh(&self, request: RefreshTokenRequest) -> DevHabitResult<AccessTokens> {
        debug!("Refreshing tokens");

        let invalid = || DevHabitError::unauthorized("Invalid or expired refresh token");

        let mut stored = self
            .identity_repository
            .find_refresh_token(&request.refresh_token)
            .await?
            .filter(|token| !token.is_expired())
            .ok_or_else(invalid)?;

        let identity = self
            .identity_repository
            .find_by_id(&stored.identity_id)
            .await?
            .ok_or_else(invalid)?;

        let tokens = self.issue(&identity)?;
        stored.rotate(
            tokens.refresh_token.clone(),
            self.token_provider.refresh_token_lifetime_days(),
        );
        self.identity_repository.save_refresh_token(&stored).await?;

        info!("Tokens refreshed for identity {}", identity.id);
        Ok(tokens)
    }
}

impl std::fmt::Debug for AuthServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceComponent").finish_non_exhaustive()
    }
}
