use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use accounts_core::models::{NewUser, User, UserUpdate};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 3, max = 50, message = "username must be 3 to 50 characters"),
        custom(function = "alphanumeric")
    )]
    #[schema(example = "diego", min_length = 3, max_length = 50)]
    pub username: String,

    #[validate(
        email(message = "email must be a valid address"),
        length(max = 100, message = "email must be at most 100 characters")
    )]
    #[schema(example = "diego@mail.com", max_length = 100)]
    pub email: String,

    #[validate(
        length(min = 8, max = 72, message = "password must be 8 to 72 characters"),
        custom(function = "ascii")
    )]
    #[schema(min_length = 8, max_length = 72)]
    pub password: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        NewUser {
            username: req.username,
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 3, max = 50, message = "username must be 3 to 50 characters"),
        custom(function = "alphanumeric")
    )]
    #[schema(example = "dieguito", min_length = 3, max_length = 50)]
    pub username: Option<String>,
}

impl From<UpdateUserRequest> for UserUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        UserUpdate {
            username: req.username,
        }
    }
}

/// A user as returned by the API. The password hash is never exposed.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate, utoipa::ToSchema)]
pub struct AuthRequest {
    #[validate(
        email(message = "email must be a valid address"),
        length(max = 100, message = "email must be at most 100 characters")
    )]
    pub email: String,

    #[validate(
        length(min = 8, max = 72, message = "password must be 8 to 72 characters"),
        custom(function = "ascii")
    )]
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    /// EdDSA-signed JWT
    pub token: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

fn alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric")
            .with_message("username may only contain ASCII letters and digits".into()))
    }
}

fn ascii(value: &str) -> Result<(), ValidationError> {
    if value.is_ascii() {
        Ok(())
    } else {
        Err(ValidationError::new("ascii")
            .with_message("password may only contain ASCII characters".into()))
    }
}
