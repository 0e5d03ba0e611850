use thiserror::Error;

/// Application-wide error type for the accounts service.
///
/// Every variant carries a classification usable both for logging and for
/// picking an HTTP status (see [`AppError::status_code`]).
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or out-of-range input (request body, path, password length, cost).
    #[error("{0}")]
    ValidationError(String),

    /// Email/password pair did not match a stored account.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate email, or a row-count anomaly detected inside a transaction.
    #[error("{0}")]
    Conflict(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Password hashing failed for a reason other than invalid input.
    #[error("Hashing error: {0}")]
    HashingError(String),

    /// Token signing failed.
    #[error("Token error: {0}")]
    TokenError(String),

    /// The token seed did not decode to exactly 32 bytes.
    #[error("Invalid token seed length: expected 32 bytes, got {0}")]
    InvalidSeedLength(usize),

    /// Settings could not be loaded or are inconsistent.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic internal failure (e.g. a blocking task panicked).
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// HTTP-style status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::ValidationError(_) => 400,
            AppError::InvalidCredentials => 401,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::DatabaseError(_)
            | AppError::HashingError(_)
            | AppError::TokenError(_)
            | AppError::InvalidSeedLength(_)
            | AppError::ConfigError(_)
            | AppError::Internal(_) => 500,
        }
    }

    /// Returns true for errors caused by the server rather than the caller.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
