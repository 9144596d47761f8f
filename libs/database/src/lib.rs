//! Database library providing the PostgreSQL connector used by the API.
//!
//! # Example
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{connect_from_config, run_migrations, PostgresConfig};
//! use migration::Migrator;
//!
//! let config = PostgresConfig::from_env()?;
//! let db = connect_from_config(config).await?;
//! run_migrations::<Migrator>(&db, "products_api").await?;
//! ```

pub mod postgres;

pub use postgres::{connect, connect_from_config, run_migrations, PostgresConfig};
