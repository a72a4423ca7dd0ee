//! PostgreSQL persistence adapters using Diesel with `diesel-async` and
//! `bb8` pooling.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private; repositories translate them into domain types and map every
//! database failure onto the port's error enum.
//!
//! ```ignore
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/assistant")).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! let history = DieselHistoryRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_history_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_history_repository::DieselHistoryRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
