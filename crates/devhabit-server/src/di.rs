//! Dependency injection module using Shaku.
//!
//! [`DevHabitModule`] wires the PostgreSQL repositories, the security
//! components and every service into one container. Components holding
//! runtime values (the pool, keys, the HTTP client) receive them as
//! parameters in [`build_module`].

use devhabit_config::AppConfig;
use devhabit_core::{DataShapingService, DevHabitResult};
use devhabit_repository::{
    DatabasePool, DatabasePoolInterface, HabitRepository, IdentityRepository, PgGitHubAccessTokenRepository,
    PgHabitRepository, PgHabitTagRepository, PgIdentityRepository, PgTagRepository, PgUserRepository,
    UserRepository,
};
use devhabit_security::{EncryptionService, PasswordHasher, PasswordHasherInterface, TokenProvider};
use devhabit_service::{
    sort_mapping_provider, AuthServiceComponent, DataSeeder, GitHubAccessTokenServiceComponent, GitHubClient,
    GitHubServiceComponent, HabitServiceComponent, HabitTagServiceComponent, TagServiceComponent,
    UserContextComponent, UserServiceComponent,
};
use shaku::{module, HasComponent};
use sqlx::PgPool;
use std::sync::Arc;

module! {
    pub DevHabitModule {
        components = [
            DatabasePool,
            PgHabitRepository,
            PgTagRepository,
            PgHabitTagRepository,
            PgUserRepository,
            PgIdentityRepository,
            PgGitHubAccessTokenRepository,
            PasswordHasher,
            TokenProvider,
            EncryptionService,
            HabitServiceComponent,
            TagServiceComponent,
            HabitTagServiceComponent,
            UserServiceComponent,
            AuthServiceComponent,
            UserContextComponent,
            GitHubClient,
            GitHubAccessTokenServiceComponent,
            GitHubServiceComponent,
        ],
        providers = [],
    }
}

/// Connects to the database and builds the module.
pub async fn connect_module(config: &AppConfig) -> DevHabitResult<Arc<DevHabitModule>> {
    let db_pool = DatabasePool::connect(&config.database).await?;
    build_module(config, db_pool.inner().clone())
}

/// Builds the module around an existing pool.
pub fn build_module(config: &AppConfig, pool: PgPool) -> DevHabitResult<Arc<DevHabitModule>> {
    let password_hasher = PasswordHasher::with_cost(config.security.password_hash_cost);
    let encryption = EncryptionService::from_config(&config.encryption)?;
    let (github_client, github_base_url) = GitHubClient::new(&config.github)?.into_parts();
    let sort_mappings = Arc::new(sort_mapping_provider());

    let module = DevHabitModule::builder()
        .with_component_parameters::<DatabasePool>(devhabit_repository::DatabasePoolParameters { pool })
        .with_component_parameters::<PasswordHasher>(devhabit_security::PasswordHasherParameters {
            argon2: password_hasher.argon2_arc(),
        })
        .with_component_parameters::<TokenProvider>(devhabit_security::TokenProviderParameters {
            config: Arc::new(config.jwt.clone()),
        })
        .with_component_parameters::<EncryptionService>(devhabit_security::EncryptionServiceParameters {
            key: encryption.key_arc(),
        })
        .with_component_parameters::<HabitServiceComponent>(devhabit_service::HabitServiceComponentParameters {
            sort_mappings: Arc::clone(&sort_mappings),
            data_shaping: DataShapingService::new(),
        })
        .with_component_parameters::<TagServiceComponent>(devhabit_service::TagServiceComponentParameters {
            sort_mappings,
            data_shaping: DataShapingService::new(),
        })
        .with_component_parameters::<GitHubClient>(devhabit_service::GitHubClientParameters {
            client: github_client,
            base_url: github_base_url,
        })
        .build();

    Ok(Arc::new(module))
}

/// Creates the seeder over the module's repositories.
pub fn data_seeder(module: &DevHabitModule) -> DataSeeder {
    let identity_repository: Arc<dyn IdentityRepository> = module.resolve();
    let user_repository: Arc<dyn UserRepository> = module.resolve();
    let habit_repository: Arc<dyn HabitRepository> = module.resolve();
    let password_hasher: Arc<dyn PasswordHasherInterface> = module.resolve();

    DataSeeder::new(identity_repository, user_repository, habit_repository, password_hasher)
}

/// Resolves the database pool.
pub fn database_pool(module: &DevHabitModule) -> Arc<dyn DatabasePoolInterface> {
    module.resolve()
}
