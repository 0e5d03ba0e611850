//! bcrypt password hashing.

use crate::error::AppError;

/// bcrypt only reads the first 72 bytes of its input; longer passwords are rejected
/// instead of being silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Hash a password with the given bcrypt cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    validate_cost(cost)?;
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::ValidationError(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes, got {}",
            password.len()
        )));
    }

    bcrypt::hash(password, cost).map_err(|e| AppError::HashingError(e.to_string()))
}

/// Check a password against a stored bcrypt hash.
///
/// A mismatch is `Ok(false)`; only a malformed hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Ok(false);
    }
    bcrypt::verify(password, hash).map_err(|e| AppError::HashingError(e.to_string()))
}

fn validate_cost(cost: u32) -> Result<(), AppError> {
    if !(MIN_COST..=MAX_COST).contains(&cost) {
        return Err(AppError::ValidationError(format!(
            "bcrypt cost must be between {MIN_COST} and {MAX_COST}, got {cost}"
        )));
    }
    Ok(())
}

/// Password hasher bound to a cost factor validated at construction.
#[derive(Debug, Clone, Copy)]
pub struct CredentialHasher {
    cost: u32,
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Result<Self, AppError> {
        validate_cost(cost)?;
        Ok(Self { cost })
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password(password, self.cost)
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        verify_password(password, hash)
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}
