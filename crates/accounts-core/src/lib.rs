pub mod auth;
pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod password;
pub mod service;
pub mod traits;

pub use auth::{Claims, TokenAuthenticator};
pub use config::AuthConfig;
pub use error::AppError;
pub use memory::InMemoryUserStore;
pub use models::{NewUser, User, UserUpdate, UserWithHash};
pub use password::CredentialHasher;
pub use service::UserService;
pub use traits::UserStore;
