use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Accounts API",
        version = "0.1.0",
        description = "User account management with EdDSA-signed tokens."
    ),
    paths(
        crate::routes::ping,
        crate::routes::list_users,
        crate::routes::get_user,
        crate::routes::create_user,
        crate::routes::update_user,
        crate::routes::delete_user,
        crate::routes::authenticate,
    ),
    components(schemas(
        crate::dto::CreateUserRequest,
        crate::dto::UpdateUserRequest,
        crate::dto::UserResponse,
        crate::dto::AuthRequest,
        crate::dto::AuthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "users", description = "Account management"),
        (name = "auth", description = "Token issuance"),
        (name = "system", description = "Liveness"),
    )
)]
pub struct ApiDoc;
