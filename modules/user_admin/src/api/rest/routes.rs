use axum::{
    routing::{get, put},
    Extension, Router,
};
use std::sync::Arc;

use crate::api::rest::handlers;
use crate::domain::service::{ProfilesService, UsersService};

/// Mount the profile and user endpoints onto `router`.
pub fn register_routes(
    router: Router,
    profiles: Arc<ProfilesService>,
    users: Arc<UsersService>,
) -> anyhow::Result<Router> {
    let profile_routes = Router::new()
        .route(
            "/profiles",
            get(handlers::list_profiles).post(handlers::create_profile),
        )
        .route(
            "/profiles/{id}",
            get(handlers::get_profile)
                .patch(handlers::update_profile)
                .delete(handlers::delete_profile),
        )
        .layer(Extension(profiles));

    let user_routes = Router::new()
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/users/profile/{profileId}",
            get(handlers::list_users_by_profile),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/users/{id}/activate", put(handlers::activate_user))
        .route("/users/{id}/deactivate", put(handlers::deactivate_user))
        .layer(Extension(users));

    Ok(router.merge(profile_routes).merge(user_routes))
}
