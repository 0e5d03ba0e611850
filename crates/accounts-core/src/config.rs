use serde::Deserialize;

/// Authentication settings: token seed, bcrypt cost and token lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Standard-alphabet base64 (padding optional) of the 32-byte Ed25519 seed.
    pub base64_token_seed: String,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

fn default_token_ttl_secs() -> u64 {
    3600
}
