pub mod auth;
pub mod config;
pub mod error;
pub mod providers;
pub mod repository;
pub mod telemetry;
pub mod validation;
