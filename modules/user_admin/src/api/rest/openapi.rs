use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_profiles,
        handlers::get_profile,
        handlers::create_profile,
        handlers::update_profile,
        handlers::delete_profile,
        handlers::list_users,
        handlers::get_user,
        handlers::list_users_by_profile,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::activate_user,
        handlers::deactivate_user,
    ),
    components(schemas(
        dto::ProfileDto,
        dto::CreateProfileReq,
        dto::UpdateProfileReq,
        dto::UserDto,
        dto::CreateUserReq,
        dto::UpdateUserReq,
        modkit::Problem,
        modkit::ValidationError,
    )),
    tags(
        (name = "profiles", description = "Roles users are assigned to"),
        (name = "users", description = "User accounts with soft delete")
    )
)]
pub struct UserAdminApiDoc;

/// OpenAPI fragment for every route mounted by `register_routes`.
pub fn document() -> utoipa::openapi::OpenApi {
    UserAdminApiDoc::openapi()
}
