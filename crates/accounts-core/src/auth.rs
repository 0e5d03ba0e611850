//! Ed25519-signed JWT issuance and verification.
//!
//! The keypair is derived deterministically from a 32-byte seed held in
//! configuration. Tokens use the compact `header.payload.signature` form with
//! `alg = EdDSA`; verification accepts no other algorithm.

use std::fmt;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use chrono::{Duration, Utc};
use ed25519_dalek::SigningKey;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AppError;

/// Required seed length for Ed25519 key derivation.
pub const SEED_LENGTH: usize = ed25519_dalek::SECRET_KEY_LENGTH;

/// Standard alphabet, padded or not. Seeds are usually written without padding.
const SEED_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// RFC 8410 PKCS#8 v1 prefix for a bare Ed25519 private key; the 32 seed bytes follow.
const PKCS8_ED25519_PREFIX: [u8; 16] = [
    0x30, 0x2e, 0x02, 0x01, 0x00, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x04, 0x22, 0x04, 0x20,
];

/// Claim set carried by every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: i32,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Issues and verifies authentication tokens for one process-lifetime keypair.
#[derive(Clone)]
pub struct TokenAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    public_key: [u8; 32],
    ttl: Duration,
}

impl fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("public_key", &self.public_key_base64())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenAuthenticator {
    /// Derive the signing keypair from raw seed bytes.
    ///
    /// Fails with [`AppError::InvalidSeedLength`] unless the seed is exactly
    /// [`SEED_LENGTH`] bytes, and with [`AppError::ConfigError`] when `ttl` is
    /// not positive or would push `exp` past the representable date range.
    pub fn from_seed(seed: &[u8], ttl: Duration) -> Result<Self, AppError> {
        if ttl <= Duration::zero() || Utc::now().checked_add_signed(ttl).is_none() {
            return Err(AppError::ConfigError(format!(
                "Token lifetime of {}s is out of range",
                ttl.num_seconds()
            )));
        }

        let seed: [u8; SEED_LENGTH] = seed
            .try_into()
            .map_err(|_| AppError::InvalidSeedLength(seed.len()))?;

        let public_key = SigningKey::from_bytes(&seed).verifying_key().to_bytes();

        let mut pkcs8 = Vec::with_capacity(PKCS8_ED25519_PREFIX.len() + SEED_LENGTH);
        pkcs8.extend_from_slice(&PKCS8_ED25519_PREFIX);
        pkcs8.extend_from_slice(&seed);

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_exp = true;

        Ok(Self {
            encoding_key: EncodingKey::from_ed_der(&pkcs8),
            decoding_key: DecodingKey::from_ed_der(&public_key),
            validation,
            public_key,
            ttl,
        })
    }

    /// Build from settings: base64-decode the seed, then derive.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        let seed = SEED_ENGINE
            .decode(config.base64_token_seed.trim())
            .map_err(|e| AppError::ConfigError(format!("Token seed is not valid base64: {e}")))?;

        let ttl_secs = i64::try_from(config.token_ttl_secs).map_err(|_| {
            AppError::ConfigError(format!(
                "token_ttl_secs {} is too large",
                config.token_ttl_secs
            ))
        })?;
        if ttl_secs == 0 {
            return Err(AppError::ConfigError(
                "token_ttl_secs must be at least 1".into(),
            ));
        }

        let ttl = Duration::try_seconds(ttl_secs).ok_or_else(|| {
            AppError::ConfigError(format!("token_ttl_secs {ttl_secs} is too large"))
        })?;

        Self::from_seed(&seed, ttl)
    }

    /// Public half of the keypair, base64url without padding.
    pub fn public_key_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.public_key)
    }

    /// Issue a token binding a user id and email.
    pub fn generate_token(&self, id: i32, email: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::TokenError("Token expiry out of range".into()))?;
        let claims = Claims {
            id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::EdDSA), claims, &self.encoding_key)
            .map_err(|e| AppError::TokenError(e.to_string()))
    }

    /// Decode and validate a token, returning its claims.
    ///
    /// `None` for malformed input, any algorithm other than EdDSA, a bad
    /// signature, a tampered payload, or a missing/past `exp`.
    pub fn claims(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected token");
                None
            }
        }
    }

    pub fn verify_token(&self, token: &str) -> bool {
        self.claims(token).is_some()
    }
}
