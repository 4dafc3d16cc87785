#![allow(dead_code)]

use std::sync::Arc;

use axum::{body::Body, http::Request, Router};
use modkit::{Module, ModuleCtx, ModuleCtxBuilder, RestfulModule};
use tokio_util::sync::CancellationToken;

use user_admin::contract::model::{NewUser, Profile};
use user_admin::domain::service::{ProfilesService, UsersService};
use user_admin::infra::storage::{seed, InMemoryProfilesRepository, InMemoryUsersRepository};
use user_admin::UserAdmin;

/// Services over the built-in seed data.
pub fn seeded_services() -> (Arc<ProfilesService>, Arc<UsersService>) {
    services(seed::profiles(), true)
}

/// Services with only the given profiles and no users.
pub fn services_with_profiles(profiles: Vec<Profile>) -> (Arc<ProfilesService>, Arc<UsersService>) {
    services(profiles, false)
}

fn services(profiles: Vec<Profile>, seed_users: bool) -> (Arc<ProfilesService>, Arc<UsersService>) {
    let profiles = Arc::new(ProfilesService::new(Arc::new(
        InMemoryProfilesRepository::with_profiles(profiles),
    )));
    let user_repo = if seed_users {
        InMemoryUsersRepository::with_users(seed::users())
    } else {
        InMemoryUsersRepository::new()
    };
    let users = Arc::new(UsersService::new(Arc::new(user_repo), profiles.clone()));
    (profiles, users)
}

pub fn profile(id: &str, name: &str) -> Profile {
    Profile {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn new_user(first: &str, last: &str, email: &str, profile_id: &str) -> NewUser {
    NewUser {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        profile_id: profile_id.to_string(),
        is_active: None,
    }
}

pub fn module_ctx() -> ModuleCtx {
    ModuleCtxBuilder::new(CancellationToken::new())
        .build()
        .for_module("user_admin")
}

/// Initialized module with default (seeded) config.
pub async fn init_module() -> Arc<UserAdmin> {
    let module = Arc::new(UserAdmin::new());
    module.init(&module_ctx()).await.unwrap();
    module
}

/// Full HTTP stack: module routes behind the ingress middleware.
pub async fn app() -> Router {
    let module = init_module().await;
    let router = module.register_rest(&module_ctx(), Router::new()).unwrap();
    api_ingress::ApiIngress::default()
        .apply_middleware(router)
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
