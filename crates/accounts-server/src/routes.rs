use std::sync::Arc;

use axum::Router;
use axum::extract::{OriginalUri, State};
use axum::http::header::LOCATION;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dto::{
    AuthRequest, AuthResponse, CreateUserRequest, ErrorResponse, UpdateUserRequest, UserResponse,
};
use crate::error::ApiError;
use crate::extract::{UserIdPath, ValidatedJson};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Router with request tracing and permissive CORS: any origin, any header,
/// and the methods the API exposes.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Build the full router. Routes are nested under `api.prefix` unless it is
/// empty or `/`; the Swagger UI always lives at `/api/docs`.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/ping", get(ping))
        .route("/users", get(list_users))
        .route("/user", post(create_user))
        .route(
            "/user/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/auth", post(authenticate));

    let mut doc = ApiDoc::openapi();
    let api = match state.api.mount_prefix() {
        Some(prefix) => {
            doc.servers = Some(vec![utoipa::openapi::Server::new(prefix)]);
            Router::new().nest(prefix, api)
        }
        None => api,
    };

    api.merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", doc))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/ping",
    responses((status = 200, description = "Service is up", body = String)),
    tag = "system"
)]
pub async fn ping() -> &'static str {
    "Pong!"
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "All users in creation order", body = Vec<UserResponse>),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let users = state.service.list_users().await?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(axum::Json(body))
}

#[utoipa::path(
    get,
    path = "/user/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, description = "Non-integer id", body = ErrorResponse),
        (status = 404, description = "No such user"),
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    UserIdPath(id): UserIdPath,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.service.get_user(id).await?;
    Ok(axum::Json(UserResponse::from(user)))
}

#[utoipa::path(
    post,
    path = "/user",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse,
            headers(("Location" = String, description = "URL of the new user"))),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 409, description = "Email already taken", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.service.create_user(body.into()).await?;

    let location = format!(
        "{}/{}",
        state.api.resource_url(uri.path().trim_end_matches('/')),
        user.id
    );

    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        axum::Json(UserResponse::from(user)),
    ))
}

#[utoipa::path(
    patch,
    path = "/user/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Non-integer id or invalid body", body = ErrorResponse),
        (status = 404, description = "No such user"),
        (status = 409, description = "Row-count anomaly, nothing changed", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    UserIdPath(id): UserIdPath,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.service.update_user(id, body.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/user/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User removed"),
        (status = 400, description = "Non-integer id", body = ErrorResponse),
        (status = 404, description = "No such user"),
        (status = 409, description = "Row-count anomaly, nothing removed", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    UserIdPath(id): UserIdPath,
) -> Result<impl IntoResponse, ApiError> {
    state.service.remove_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/auth",
    request_body = AuthRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = AuthResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "Unknown email or wrong password", body = ErrorResponse),
    ),
    tag = "auth"
)]
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<AuthRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state
        .service
        .authenticate_user(&body.email, &body.password)
        .await?;
    Ok(axum::Json(AuthResponse { token }))
}
