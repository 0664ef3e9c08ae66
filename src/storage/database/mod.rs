//! Database layer
//!
//! SeaORM-backed durable store holding the media delivery cache and the
//! user/event/download telemetry tables. SQLite by default, Postgres behind
//! the `postgres` feature.

pub mod cache_ops;
mod connection;
pub mod entities;
pub mod migration;
pub mod telemetry_ops;


pub use connection::MediaDatabase;
pub use migration::Migrator;
