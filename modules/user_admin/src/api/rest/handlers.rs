use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::StatusCode,
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use modkit::RequestMeta;
use tracing::{error, info};

use crate::api::rest::dto::{
    CreateProfileReq, CreateUserReq, ProfileDto, UpdateProfileReq, UpdateUserReq, UserDto,
};
use crate::api::rest::error::{map_domain_error, validated};
use crate::domain::service::{ProfilesService, UsersService};

// ---- Profiles ----

/// List all profiles
#[utoipa::path(
    get,
    path = "/profiles",
    operation_id = "user_admin.list_profiles",
    tag = "profiles",
    responses(
        (status = 200, description = "All profiles", body = [ProfileDto]),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_profiles(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<ProfilesService>>,
) -> Result<Json<Vec<ProfileDto>>, ProblemResponse> {
    info!("Listing profiles");

    match svc.find_all().await {
        Ok(profiles) => Ok(Json(profiles.into_iter().map(ProfileDto::from).collect())),
        Err(e) => {
            error!("Failed to list profiles: {}", e);
            Err(map_domain_error(&e, &meta))
        }
    }
}

/// Get a specific profile by ID
#[utoipa::path(
    get,
    path = "/profiles/{id}",
    operation_id = "user_admin.get_profile",
    tag = "profiles",
    params(("id" = String, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile found", body = ProfileDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_profile(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<ProfilesService>>,
    Path(id): Path<String>,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    info!("Getting profile with id: {}", id);

    match svc.find_one(&id).await {
        Ok(profile) => Ok(Json(ProfileDto::from(profile))),
        Err(e) => {
            error!("Failed to get profile {}: {}", id, e);
            Err(map_domain_error(&e, &meta))
        }
    }
}

/// Create a new profile
#[utoipa::path(
    post,
    path = "/profiles",
    operation_id = "user_admin.create_profile",
    tag = "profiles",
    request_body = CreateProfileReq,
    responses(
        (status = 201, description = "Created profile", body = ProfileDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_profile(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<ProfilesService>>,
    payload: Result<Json<CreateProfileReq>, JsonRejection>,
) -> Result<(StatusCode, Json<ProfileDto>), ProblemResponse> {
    let req_body = validated(payload, &meta)?;
    info!("Creating profile: {:?}", req_body);

    match svc.create(req_body.into()).await {
        Ok(profile) => Ok((StatusCode::CREATED, Json(ProfileDto::from(profile)))),
        Err(e) => {
            error!("Failed to create profile: {}", e);
            Err(map_domain_error(&e, &meta))
        }
    }
}

/// Update an existing profile
#[utoipa::path(
    patch,
    path = "/profiles/{id}",
    operation_id = "user_admin.update_profile",
    tag = "profiles",
    params(("id" = String, Path, description = "Profile id")),
    request_body = UpdateProfileReq,
    responses(
        (status = 200, description = "Updated profile", body = ProfileDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_profile(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<ProfilesService>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProfileReq>, JsonRejection>,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    let req_body = validated(payload, &meta)?;
    info!("Updating profile {} with: {:?}", id, req_body);

    match svc.update(&id, req_body.into()).await {
        Ok(profile) => Ok(Json(ProfileDto::from(profile))),
        Err(e) => {
            error!("Failed to update profile {}: {}", id, e);
            Err(map_domain_error(&e, &meta))
        }
    }
}

/// Delete a profile by ID
#[utoipa::path(
    delete,
    path = "/profiles/{id}",
    operation_id = "user_admin.delete_profile",
    tag = "profiles",
    params(("id" = String, Path, description = "Profile id")),
    responses(
        (status = 204, description = "Profile deleted"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_profile(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<ProfilesService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting profile: {}", id);

    match svc.remove(&id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete profile {}: {}", id, e);
            Err(map_domain_error(&e, &meta))
        }
    }
}

// ---- Users ----

/// List live users with their profiles
#[utoipa::path(
    get,
    path = "/users",
    operation_id = "user_admin.list_users",
    tag = "users",
    responses(
        (status = 200, description = "All live users", body = [UserDto]),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_users(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<UsersService>>,
) -> Result<Json<Vec<UserDto>>, ProblemResponse> {
    info!("Listing users");

    match svc.find_all().await {
        Ok(users) => Ok(Json(users.into_iter().map(UserDto::from).collect())),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_domain_error(&e, &meta))
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    operation_id = "user_admin.get_user",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_user(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<UsersService>>,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, ProblemResponse> {
    info!("Getting user with id: {}", id);

    match svc.find_one(&id).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_domain_error(&e, &meta))
        }
    }
}

/// List live users assigned to a profile
#[utoipa::path(
    get,
    path = "/users/profile/{profileId}",
    operation_id = "user_admin.list_users_by_profile",
    tag = "users",
    params(("profileId" = String, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Users of the profile", body = [UserDto]),
        (status = 404, description = "Profile not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_users_by_profile(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<UsersService>>,
    Path(profile_id): Path<String>,
) -> Result<Json<Vec<UserDto>>, ProblemResponse> {
    info!("Listing users for profile: {}", profile_id);

    match svc.find_by_profile(&profile_id).await {
        Ok(users) => Ok(Json(users.into_iter().map(UserDto::from).collect())),
        Err(e) => {
            error!("Failed to list users for profile {}: {}", profile_id, e);
            Err(map_domain_error(&e, &meta))
        }
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    operation_id = "user_admin.create_user",
    tag = "users",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_user(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<UsersService>>,
    payload: Result<Json<CreateUserReq>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDto>), ProblemResponse> {
    let req_body = validated(payload, &meta)?;
    info!("Creating user: {:?}", req_body);

    match svc.create(req_body.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserDto::from(user)))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_domain_error(&e, &meta))
        }
    }
}

/// Update an existing user
#[utoipa::path(
    patch,
    path = "/users/{id}",
    operation_id = "user_admin.update_user",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_user(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<UsersService>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserReq>, JsonRejection>,
) -> Result<Json<UserDto>, ProblemResponse> {
    let req_body = validated(payload, &meta)?;
    info!("Updating user {} with: {:?}", id, req_body);

    match svc.update(&id, req_body.into()).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(map_domain_error(&e, &meta))
        }
    }
}

/// Soft-delete a user by ID
#[utoipa::path(
    delete,
    path = "/users/{id}",
    operation_id = "user_admin.delete_user",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_user(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<UsersService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ProblemResponse> {
    info!("Deleting user: {}", id);

    match svc.remove(&id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_domain_error(&e, &meta))
        }
    }
}

#[utoipa::path(
    put,
    path = "/users/{id}/activate",
    operation_id = "user_admin.activate_user",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Activated user", body = UserDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn activate_user(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<UsersService>>,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, ProblemResponse> {
    set_active(meta, svc, id, true).await
}

#[utoipa::path(
    put,
    path = "/users/{id}/deactivate",
    operation_id = "user_admin.deactivate_user",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Deactivated user", body = UserDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn deactivate_user(
    meta: RequestMeta,
    Extension(svc): Extension<Arc<UsersService>>,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, ProblemResponse> {
    set_active(meta, svc, id, false).await
}

async fn set_active(
    meta: RequestMeta,
    svc: Arc<UsersService>,
    id: String,
    active: bool,
) -> Result<Json<UserDto>, ProblemResponse> {
    info!("Setting user {} active={}", id, active);

    match svc.set_active_status(&id, active).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to set active status for user {}: {}", id, e);
            Err(map_domain_error(&e, &meta))
        }
    }
}
