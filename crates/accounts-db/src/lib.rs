pub mod config;
pub mod database;
pub mod repository;

pub use config::{Backend, DatabaseConfig};
pub use database::Database;
pub use repository::UserRepository;
