use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use modkit::{Module, ModuleCtx, RestfulModule};
use tracing::{debug, info, warn};

use crate::api::rest::{openapi, routes};
use crate::config::UserAdminConfig;
use crate::contract::client::UserAdminApi;
use crate::domain::service::{ProfilesService, UsersService};
use crate::gateways::local::UserAdminLocalClient;
use crate::infra::storage::{seed, InMemoryProfilesRepository, InMemoryUsersRepository};

/// Main module struct: owns the profile and user stores for the process lifetime
#[derive(Default)]
pub struct UserAdmin {
    // Services are set once in `init`; readers take a cheap snapshot.
    profiles: ArcSwapOption<ProfilesService>,
    users: ArcSwapOption<UsersService>,
}

impl UserAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    /// In-process client over the initialized services.
    pub fn client(&self) -> anyhow::Result<Arc<dyn UserAdminApi>> {
        let (profiles, users) = self.services()?;
        Ok(Arc::new(UserAdminLocalClient::new(profiles, users)))
    }

    fn services(&self) -> anyhow::Result<(Arc<ProfilesService>, Arc<UsersService>)> {
        let profiles = self
            .profiles
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        let users = self
            .users
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;
        Ok((profiles, users))
    }
}

#[async_trait]
impl Module for UserAdmin {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing user_admin module");

        let cfg: UserAdminConfig = ctx.module_config()?;
        debug!(
            "Loaded user_admin config: seed_profiles={}, seed_users={}",
            cfg.seed_profiles, cfg.seed_users
        );
        if cfg.seed_users && !cfg.seed_profiles {
            warn!("Seeding users without profiles; seeded users will have no profile attached");
        }

        let profile_repo = if cfg.seed_profiles {
            InMemoryProfilesRepository::with_profiles(seed::profiles())
        } else {
            InMemoryProfilesRepository::new()
        };
        let user_repo = if cfg.seed_users {
            InMemoryUsersRepository::with_users(seed::users())
        } else {
            InMemoryUsersRepository::new()
        };

        // Wire repositories (infra) to domain services; users reach profiles via the lookup port
        let profiles = Arc::new(ProfilesService::new(Arc::new(profile_repo)));
        let users = Arc::new(UsersService::new(Arc::new(user_repo), profiles.clone()));

        self.profiles.store(Some(profiles));
        self.users.store(Some(users));

        info!("user_admin module initialized");
        Ok(())
    }
}

impl RestfulModule for UserAdmin {
    fn register_rest(&self, _ctx: &ModuleCtx, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering user_admin REST routes");

        let (profiles, users) = self.services()?;
        let router = routes::register_routes(router, profiles, users)?;

        info!("user_admin REST routes registered successfully");
        Ok(router)
    }

    fn openapi(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(openapi::document())
    }
}
