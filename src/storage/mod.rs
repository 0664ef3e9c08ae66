//! Durable storage: the delivery cache and telemetry tables

pub mod database;
